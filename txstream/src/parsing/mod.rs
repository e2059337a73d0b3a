//! Streaming transaction parsing.
//!
//! This module provides:
//! - RLP length prefix detection and decoding
//! - The fixed transaction field schema
//! - The resumable stream decoder
//!
//! # Security
//!
//! All parsing happens on untrusted input. Parsers must:
//! - Validate all length fields before access
//! - Fail closed on any malformed data
//! - Avoid unbounded allocations

pub mod rlp;
pub mod schema;
pub mod stream;

pub use rlp::RlpHeader;
pub use schema::{FieldLimit, FieldRule, TxField};
pub use stream::{decode_transaction, StreamStatus, TxStreamContext};
