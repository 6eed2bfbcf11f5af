//! PinBridge Storage Library
//!
//! This crate provides the staging area: a server-local directory where an
//! incoming upload is written before it is forwarded to the pinning service.
//!
//! # Staged file names
//!
//! Every staged file gets a generated name of the form
//! `{unix_millis}-{8 hex chars}-{sanitized original name}`. Names are unique
//! across concurrent requests and files are created with `create_new`, so an
//! existing entry is never overwritten. Name generation lives in the `keys`
//! module.

pub(crate) mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use keys::sanitize_filename;
pub use local::LocalStagingArea;
pub use traits::{StagedFile, StagedReader, StagingArea, StorageError, StorageResult};
