//! In-memory accounts and signed session tokens.
//!
//! Nothing here is consulted by the upload flow.

pub mod credentials;
pub mod token;

pub use credentials::{hash_password, verify_password, CredentialStore};
pub use token::{Claims, TokenIssuer};
