//! Asynchronous job categorization.
//!
//! A new job is stored under the placeholder category and handed to the
//! [`CategorizationQueue`]. The [`CategorizationWorkflow`] then asks the
//! classifier for a category, creates or extends it, and moves the job there.

mod queue;
mod workflow;

pub use queue::CategorizationQueue;
pub use workflow::{
    CategorizationOutcome, CategorizationRequest, CategorizationTrigger, CategorizationWorkflow,
    WorkflowError,
};
