//! Streaming decoder for RLP-encoded Ethereum transactions.
//!
//! Constrained signers receive a transaction in small command chunks and
//! cannot hold it whole. [`TxStreamContext`] decodes the fixed legacy
//! transaction layout chunk by chunk, copying the fields the signing flow
//! displays into a [`Transaction`] and feeding every byte into a running
//! hash, so the digest to sign is ready when the last chunk arrives.
//!
//! ```text
//! chunk -> TxStreamContext::process -> length prefix -> schema rule
//!                                    -> accumulate into Transaction
//!                                    -> TxHasher::update
//! ```
//!
//! # Security Model
//!
//! - No allocation while decoding; every destination has a fixed capacity
//! - Declared lengths are checked before payload is consumed
//! - Fail closed: any error poisons the context

#![no_std]

extern crate alloc;

pub mod config;
pub mod crypto;
pub mod parsing;

pub use config::StreamConfig;
pub use crypto::{keccak256, Keccak256Hasher, TxHasher};
pub use parsing::{decode_transaction, StreamStatus, TxField, TxStreamContext};
pub use txstream_common::{
    FaultKind, ProcessingFlags, StreamError, Transaction, TxAddress, TxInt256,
};
