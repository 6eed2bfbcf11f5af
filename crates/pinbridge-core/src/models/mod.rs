//! Data models shared between the server, the pinning client and the API client.

mod pin;
mod user;

pub use pin::*;
pub use user::*;
