//! HTTP front door.
//!
//! - [`api`]: Request/response types and route handlers
//! - [`streaming`]: upstream delta stream → plain-text response body

pub mod api;
pub mod streaming;
