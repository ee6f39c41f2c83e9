pub mod ranking;
pub mod submission_guard;
pub mod validation;
