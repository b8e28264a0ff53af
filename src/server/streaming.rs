//! Adapts the upstream delta stream into the plain-text response body.
//!
//! Each delta's text fragment is written to the open response channel as it
//! arrives, in order, with no framing. Deltas without content contribute
//! nothing; deltas whose role is "system" are dropped, mirroring the filter
//! applied to the inbound conversation.

use std::convert::Infallible;

use bytes::Bytes;
use futures::{future, Stream, StreamExt};
use tracing::warn;
use uuid::Uuid;

use crate::upstream::client::{DeltaStream, StreamDelta};

/// Extract the emitted text of one delta, if any.
fn fragment_text(delta: StreamDelta) -> Option<String> {
    if delta.role.as_deref() == Some("system") {
        return None;
    }
    match delta.content {
        Some(content) if !content.is_empty() => Some(content),
        _ => None,
    }
}

/// Convert a delta stream into a response body stream.
///
/// A mid-stream upstream error cannot be surfaced to the client once
/// plain-text output has begun; the body simply ends early. The error is
/// logged with the request id so truncations remain visible to operators.
pub fn delta_body_stream(
    deltas: DeltaStream,
    request_id: Uuid,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    deltas
        .take_while(move |item| {
            if let Err(e) = item {
                warn!(%request_id, error = %e, "Upstream stream failed mid-response, truncating body");
            }
            future::ready(item.is_ok())
        })
        .filter_map(|item| {
            future::ready(
                item.ok()
                    .and_then(fragment_text)
                    .map(|text| Ok(Bytes::from(text))),
            )
        })
}
