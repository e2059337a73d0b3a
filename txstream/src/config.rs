//! Decoder configuration.

use txstream_common::{MAX_INT256_LENGTH, MAX_TX_SIZE};

/// Runtime limits for a stream decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Largest accepted length for the data, `r` and `s` fields.
    pub max_payload_length: usize,
}

impl StreamConfig {
    /// Creates a configuration with the given payload limit.
    ///
    /// The limit is never lowered below the 32 bytes a signature
    /// component needs.
    pub fn with_max_payload_length(max_payload_length: usize) -> Self {
        Self {
            max_payload_length: max_payload_length.max(MAX_INT256_LENGTH),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_payload_length: MAX_TX_SIZE,
        }
    }
}
