//! # Error Types
//!
//! Errors raised while decoding or encoding wire frames.

use thiserror::Error;

/// Reasons a frame is rejected at the edge.
///
/// Callers discard the frame and log; nothing is reported to the sender.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Not valid JSON, or JSON that does not match any inbound kind's shape.
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Kind understood, but the payload violates a field constraint.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}
