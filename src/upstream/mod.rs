//! Client for the upstream OpenAI-compatible completions API.
//!
//! - [`client`]: reqwest-based streaming client and the [`client::CompletionBackend`] seam

pub mod client;
