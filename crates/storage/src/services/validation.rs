use std::fmt;

const MIN_LENGTH: usize = 15;
const MIN_WORDS: usize = 3;
const MAX_REPEATED_RUN: usize = 10;

/// Why a question's text was rejected before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionIssue {
    TooShort,
    RepeatedCharacters,
    TooFewWords,
}

impl fmt::Display for QuestionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(
                f,
                "Question must be at least {} characters long",
                MIN_LENGTH
            ),
            Self::RepeatedCharacters => {
                write!(f, "Question contains too many repeated characters")
            }
            Self::TooFewWords => write!(f, "Question must contain at least {} words", MIN_WORDS),
        }
    }
}

/// Cheap spam heuristics applied to question text.
pub fn validate_question(content: &str) -> Result<(), QuestionIssue> {
    let trimmed = content.trim();

    if trimmed.chars().count() < MIN_LENGTH {
        return Err(QuestionIssue::TooShort);
    }

    if longest_repeated_run(trimmed) > MAX_REPEATED_RUN {
        return Err(QuestionIssue::RepeatedCharacters);
    }

    if trimmed.split_whitespace().count() < MIN_WORDS {
        return Err(QuestionIssue::TooFewWords);
    }

    Ok(())
}

pub fn is_valid_question(content: &str) -> bool {
    validate_question(content).is_ok()
}

/// Length of the longest run of one repeated character. Line terminators
/// never form a run.
fn longest_repeated_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<char> = None;

    for c in text.chars() {
        if is_line_terminator(c) {
            previous = None;
            current = 0;
            continue;
        }

        if previous == Some(c) {
            current += 1;
        } else {
            previous = Some(c);
            current = 1;
        }
        longest = longest.max(current);
    }

    longest
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_reasonable_question() {
        assert!(is_valid_question("What is a hash map?"));
        assert!(is_valid_question("  How would you design a rate limiter?  "));
    }

    #[test]
    fn test_rejects_short_content() {
        assert_eq!(validate_question("What is Rust?"), Err(QuestionIssue::TooShort));
        assert!(!is_valid_question("   a b c   "));
    }

    #[test]
    fn test_rejects_keyboard_spam() {
        assert!(!is_valid_question("aaaaaaaaaaaaaa"));
        assert_eq!(
            validate_question("why is this sooooooooooooo slow"),
            Err(QuestionIssue::RepeatedCharacters)
        );
    }

    #[test]
    fn test_ten_repeats_are_allowed() {
        // ten in a row is fine, eleven is spam
        assert!(is_valid_question("what does zzzzzzzzzz mean here"));
        assert!(!is_valid_question("what does zzzzzzzzzzz mean here"));
    }

    #[test]
    fn test_newlines_do_not_count_as_repeats() {
        let content = format!("first question here{}second question", "\n".repeat(12));
        assert!(is_valid_question(&content));
    }

    #[test]
    fn test_rejects_too_few_words() {
        assert_eq!(
            validate_question("Supercalifragilistic expialidocious"),
            Err(QuestionIssue::TooFewWords)
        );
    }

    #[test]
    fn test_issue_messages() {
        assert_eq!(
            QuestionIssue::TooFewWords.to_string(),
            "Question must contain at least 3 words"
        );
    }
}
