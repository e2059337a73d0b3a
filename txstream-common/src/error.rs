//! Error types for the transaction stream decoder.
//!
//! Every error is terminal for the parse that produced it. Codes are stable
//! so they can be reported over IPC without carrying the message text.

use core::fmt;
use num_derive::{FromPrimitive, ToPrimitive};
use rkyv::{Archive, Deserialize, Serialize};

/// Reasons a streamed transaction was rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[archive(check_bytes)]
#[repr(u32)]
pub enum StreamError {
    /// The length prefix did not become decodable within the scratch buffer.
    ScratchOverflow = 0x01,

    /// The length prefix is ill-formed.
    InvalidEncoding = 0x02,

    /// More payload was consumed than the envelope declared.
    EnvelopeOverrun = 0x03,

    /// The input ended before the transaction was complete.
    Truncated = 0x04,

    /// A field declares more bytes than its destination can hold.
    FieldTooLarge = 0x10,

    /// The field must be a list but a scalar was found.
    ExpectedList = 0x20,

    /// The field must be a scalar but a list was found.
    ExpectedScalar = 0x21,

    /// The schema position is outside the known field set.
    UnknownField = 0x22,

    /// Called with an empty input buffer.
    EmptyBuffer = 0x30,

    /// The stream is finished, faulted or was never initialized.
    InvalidState = 0x31,
}

/// Coarse grouping of [`StreamError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The byte stream is not a valid length-prefixed encoding.
    Malformed,
    /// A declared length exceeds the destination capacity.
    Capacity,
    /// The encoding is valid but does not follow the transaction schema.
    Schema,
    /// The caller broke a calling convention.
    Precondition,
}

impl StreamError {
    /// Returns the error code as a u32 for scalar responses.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Returns the fault category.
    pub fn kind(self) -> FaultKind {
        match self {
            StreamError::ScratchOverflow
            | StreamError::InvalidEncoding
            | StreamError::EnvelopeOverrun
            | StreamError::Truncated => FaultKind::Malformed,
            StreamError::FieldTooLarge => FaultKind::Capacity,
            StreamError::ExpectedList | StreamError::ExpectedScalar | StreamError::UnknownField => {
                FaultKind::Schema
            }
            StreamError::EmptyBuffer | StreamError::InvalidState => FaultKind::Precondition,
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::ScratchOverflow => write!(f, "Length prefix too long"),
            StreamError::InvalidEncoding => write!(f, "Invalid encoding"),
            StreamError::EnvelopeOverrun => write!(f, "Envelope overrun"),
            StreamError::Truncated => write!(f, "Truncated transaction"),
            StreamError::FieldTooLarge => write!(f, "Field too large"),
            StreamError::ExpectedList => write!(f, "Expected list"),
            StreamError::ExpectedScalar => write!(f, "Expected scalar"),
            StreamError::UnknownField => write!(f, "Unknown field"),
            StreamError::EmptyBuffer => write!(f, "Empty buffer"),
            StreamError::InvalidState => write!(f, "Invalid state"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StreamError {}
