pub mod attachments;
pub mod feedback;
pub mod grading;
pub mod submissions;

pub use grading::{GradingPolicy, GradingWorkflow};
pub use submissions::SubmissionLifecycle;
pub use submissions::content::SubmissionDraft;
