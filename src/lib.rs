//! chat-relay: streaming chat relay for a hosted completions API.
//!
//! Forwards conversations from a browser UI to an OpenAI-compatible
//! inference endpoint (NVIDIA integrate) with streaming enabled, and
//! re-emits each text delta to the client as it arrives:
//!   browser → front door → relay → upstream API → relay → browser
//!
//! Exposes two routes: `GET /` (static chat page) and `POST /api/chat`.

pub mod chat;
pub mod config;
pub mod server;
pub mod upstream;
