//! Error types for the protocol layer.

/// Errors raised while encoding or decoding wire messages.
///
/// A `Decode` error on an inbound frame means the command was malformed;
/// the server logs it and drops the frame without replying.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The bytes were not valid JSON, had an unknown `commandType`, or
    /// were missing a required field.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
