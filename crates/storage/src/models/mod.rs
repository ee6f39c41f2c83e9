mod confidence;
mod normalized_content;
mod question;
mod submission;

pub use confidence::ConfidenceLevel;
pub use normalized_content::NormalizedContent;
pub use question::{Question, format_questions};
pub use submission::SubmissionRecord;
