//! Conversation domain types.
//!
//! - [`message`]: chat roles, messages, and the system-message filter
//! - [`profile`]: model selector → {model id, sampling parameters} resolution

pub mod message;
pub mod profile;
