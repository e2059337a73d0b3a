//! Common types for the streaming transaction decoder.
//!
//! This crate provides the destination record, processing flags and error
//! codes shared between the decoder and the signing flow that consumes its
//! output. Types are serializable with rkyv so the decoded record can cross
//! an IPC boundary.
//!
//! # Security Note
//!
//! A decoded [`Transaction`] is only as trustworthy as the bytes that were
//! streamed in. Display and signing code must not assume any field is
//! semantically valid.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod types;

pub use error::{FaultKind, StreamError};
pub use types::*;

/// Capacity of numeric fields (256-bit big-endian integers).
pub const MAX_INT256_LENGTH: usize = 32;

/// Capacity of the recipient address field.
pub const MAX_ADDRESS_LENGTH: usize = 20;

/// Scratch bytes available for a length prefix: one tag byte plus up to
/// four big-endian length bytes.
pub const RLP_LENGTH_BUFFER_SIZE: usize = 5;

/// Default limit for payload and signature fields (64KB).
pub const MAX_TX_SIZE: usize = 65536;
