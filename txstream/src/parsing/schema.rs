//! The fixed field layout of a streamed transaction.
//!
//! ```text
//! envelope [ type?, nonce, gasPrice, startGas, to, value, data, v, r, s ]
//! ```
//!
//! Each position maps to a [`FieldRule`] describing whether the payload is
//! kept, where it goes and how large it may be.

use txstream_common::{TxSlot, MAX_ADDRESS_LENGTH, MAX_INT256_LENGTH};

/// Position in the transaction schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum TxField {
    /// Not initialized.
    None = 0,
    Envelope,
    Type,
    Nonce,
    GasPrice,
    StartGas,
    Recipient,
    Value,
    Data,
    V,
    R,
    S,
    /// All fields consumed.
    Done,
}

impl TxField {
    /// Returns the following schema position. `Done` is absorbing.
    pub fn next(self) -> Self {
        match self {
            TxField::None => TxField::Envelope,
            TxField::Envelope => TxField::Type,
            TxField::Type => TxField::Nonce,
            TxField::Nonce => TxField::GasPrice,
            TxField::GasPrice => TxField::StartGas,
            TxField::StartGas => TxField::Recipient,
            TxField::Recipient => TxField::Value,
            TxField::Value => TxField::Data,
            TxField::Data => TxField::V,
            TxField::V => TxField::R,
            TxField::R => TxField::S,
            TxField::S | TxField::Done => TxField::Done,
        }
    }
}

/// Size bound applied to a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLimit {
    /// A 256-bit integer.
    Int256,
    /// A 20-byte address.
    Address,
    /// Arbitrary payload, bounded by `StreamConfig::max_payload_length`.
    Payload,
}

impl FieldLimit {
    /// Resolves the bound in bytes.
    pub fn max_length(self, max_payload_length: usize) -> usize {
        match self {
            FieldLimit::Int256 => MAX_INT256_LENGTH,
            FieldLimit::Address => MAX_ADDRESS_LENGTH,
            FieldLimit::Payload => max_payload_length,
        }
    }
}

/// How the decoder handles one schema position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// The outer list. Only its header is consumed.
    Envelope,
    /// A byte string copied into `slot`, or hashed and dropped when `None`.
    Scalar {
        slot: Option<TxSlot>,
        limit: FieldLimit,
    },
}

const fn scalar(slot: Option<TxSlot>, limit: FieldLimit) -> FieldRule {
    FieldRule::Scalar { slot, limit }
}

/// Rule table indexed by [`TxField`] discriminant.
const SCHEMA: [Option<FieldRule>; 13] = [
    None,                                                 // None
    Some(FieldRule::Envelope),                            // Envelope
    Some(scalar(None, FieldLimit::Int256)),               // Type
    Some(scalar(None, FieldLimit::Int256)),               // Nonce
    Some(scalar(Some(TxSlot::GasPrice), FieldLimit::Int256)),
    Some(scalar(Some(TxSlot::StartGas), FieldLimit::Int256)),
    Some(scalar(Some(TxSlot::Recipient), FieldLimit::Address)),
    Some(scalar(Some(TxSlot::Value), FieldLimit::Int256)),
    Some(scalar(None, FieldLimit::Payload)),              // Data
    Some(scalar(Some(TxSlot::V), FieldLimit::Int256)),
    Some(scalar(None, FieldLimit::Payload)),              // R
    Some(scalar(None, FieldLimit::Payload)),              // S
    None,                                                 // Done
];

/// Looks up the rule for `field`; `None` for positions outside the schema.
pub fn rule_for(field: TxField) -> Option<FieldRule> {
    SCHEMA.get(field as usize).copied().flatten()
}
