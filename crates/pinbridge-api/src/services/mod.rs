//! Business services orchestrated by the HTTP handlers.

pub mod upload;
