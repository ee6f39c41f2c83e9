/// Question text in the form used for duplicate detection: trimmed and
/// lowercased, so "  How do I X?" and "how do i x?" compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContent(String);

impl NormalizedContent {
    pub fn new(content: &str) -> Self {
        Self(content.trim().to_lowercase())
    }

    /// Wraps text that was normalized before it was persisted.
    pub fn from_normalized(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-separated words of the content
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_lowercases() {
        let content = NormalizedContent::new("  How Do You Reverse A List?\n");
        assert_eq!(content.as_str(), "how do you reverse a list?");
    }

    #[test]
    fn test_words_skip_repeated_whitespace() {
        let content = NormalizedContent::new("what  is\ta   hash map");
        let words: Vec<&str> = content.words().collect();
        assert_eq!(words, vec!["what", "is", "a", "hash", "map"]);
    }

    #[test]
    fn test_equal_after_normalization() {
        assert_eq!(
            NormalizedContent::new("Explain CAP theorem"),
            NormalizedContent::new("  explain cap THEOREM ")
        );
    }
}
