//! Upload-and-pin workflow
//!
//! ```text
//! Received -> Staged -> Submitting -> Pinned | Failed -> Cleaned
//! ```
//!
//! A staged file is released exactly once whichever branch is taken.

mod types;
mod workflow;

pub use types::{ReceivedFile, UploadState, WorkflowConfig};
pub use workflow::UploadWorkflow;
