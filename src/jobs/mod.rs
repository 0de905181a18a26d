//! Job postings: lifecycle rules and the operations that drive them.

mod manager;
mod status;

pub use manager::{ApplicantAction, JobError, JobManager, NewJob};
pub use status::{JobStatus, JobTransition, TransitionError};
