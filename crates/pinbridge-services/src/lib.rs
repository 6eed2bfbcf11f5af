//! PinBridge Services Layer
//!
//! Hosts the clients for remote services the API depends on. Today that is
//! the pinning service; the API crate only sees the [`PinningClient`] trait
//! and receives a concrete client at startup.

pub mod pinning;

#[cfg(any(test, feature = "test-utils"))]
pub use pinning::mock::{MockPinningClient, RecordedPin};
pub use pinning::pinata::PinataClient;
pub use pinning::{PinResponse, PinUpload, PinningClient, PinningError};
