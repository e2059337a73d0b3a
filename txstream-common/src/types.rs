//! Destination record and per-parse flags.
//!
//! The decoder fills a [`Transaction`] in place while the encoded bytes
//! stream through it. Only the fields the signing flow displays are kept;
//! everything else is hashed and dropped.

use rkyv::{Archive, Deserialize, Serialize};
use zeroize::Zeroize;

use crate::{MAX_ADDRESS_LENGTH, MAX_INT256_LENGTH};

/// Ethereum address (20 bytes).
pub type EthAddress = [u8; 20];

/// Keccak256 hash (32 bytes).
pub type Hash256 = [u8; 32];

// =============================================================================
// Field slots
// =============================================================================

/// A fixed-capacity destination the decoder can copy a field into.
///
/// The decoder writes `buffer_mut()[offset..]` as payload arrives and sets
/// the final length once the field is complete.
pub trait FieldSlot {
    /// Maximum number of bytes the slot can hold.
    fn capacity(&self) -> usize;

    /// Backing storage, `capacity()` bytes long.
    fn buffer_mut(&mut self) -> &mut [u8];

    /// Records how many bytes of the buffer are meaningful.
    fn set_length(&mut self, length: usize);
}

/// Big-endian integer of up to 256 bits, stored without leading padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Archive, Serialize, Deserialize, Zeroize)]
#[archive(check_bytes)]
pub struct TxInt256 {
    /// Raw bytes; only the first `length` are valid.
    pub value: [u8; MAX_INT256_LENGTH],
    /// Number of valid bytes.
    pub length: u8,
}

impl TxInt256 {
    /// Returns the decoded bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.value[..self.length as usize]
    }

    /// Returns true if no bytes were decoded (encoded zero or absent).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Interprets the bytes as a big-endian u64.
    ///
    /// Returns None when the value does not fit.
    pub fn as_u64(&self) -> Option<u64> {
        let data = self.as_slice();
        if data.len() > 8 {
            return None;
        }
        let mut value = 0u64;
        for &byte in data {
            value = value << 8 | byte as u64;
        }
        Some(value)
    }
}

impl FieldSlot for TxInt256 {
    fn capacity(&self) -> usize {
        MAX_INT256_LENGTH
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.value
    }

    fn set_length(&mut self, length: usize) {
        debug_assert!(length <= MAX_INT256_LENGTH);
        self.length = length as u8;
    }
}

/// Recipient address slot.
///
/// An empty recipient means contract creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Archive, Serialize, Deserialize, Zeroize)]
#[archive(check_bytes)]
pub struct TxAddress {
    /// Raw bytes; only the first `length` are valid.
    pub value: EthAddress,
    /// Number of valid bytes (0 or 20 for well-formed transactions).
    pub length: u8,
}

impl TxAddress {
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.value[..self.length as usize]
    }

    /// Returns the full address, if all 20 bytes were present.
    pub fn address(&self) -> Option<EthAddress> {
        if self.length as usize == MAX_ADDRESS_LENGTH {
            Some(self.value)
        } else {
            None
        }
    }

    /// Returns true if this is a contract creation.
    #[inline]
    pub fn is_contract_creation(&self) -> bool {
        self.length == 0
    }
}

impl FieldSlot for TxAddress {
    fn capacity(&self) -> usize {
        MAX_ADDRESS_LENGTH
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.value
    }

    fn set_length(&mut self, length: usize) {
        debug_assert!(length <= MAX_ADDRESS_LENGTH);
        self.length = length as u8;
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Retained fields of a streamed transaction.
///
/// Nonce, type, data, `r` and `s` are hashed but never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize, Zeroize)]
#[archive(check_bytes)]
pub struct Transaction {
    /// Gas price in wei.
    pub gas_price: TxInt256,
    /// Gas limit.
    pub start_gas: TxInt256,
    /// Recipient; empty for contract creation.
    pub recipient: TxAddress,
    /// Value in wei.
    pub value: TxInt256,
    /// Signature `v`, carrying the chain id for EIP-155 transactions.
    /// Zero length for legacy transactions without trailing fields.
    pub v: TxInt256,
}

/// Identifies one of the retained slots of a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxSlot {
    GasPrice,
    StartGas,
    Recipient,
    Value,
    V,
}

impl Transaction {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows the slot named by `slot`.
    pub fn slot_mut(&mut self, slot: TxSlot) -> &mut dyn FieldSlot {
        match slot {
            TxSlot::GasPrice => &mut self.gas_price,
            TxSlot::StartGas => &mut self.start_gas,
            TxSlot::Recipient => &mut self.recipient,
            TxSlot::Value => &mut self.value,
            TxSlot::V => &mut self.v,
        }
    }
}

// =============================================================================
// Processing flags
// =============================================================================

/// Per-parse flags shaping which optional fields are expected.
///
/// Latched by the decoder on the first chunk of a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProcessingFlags(u32);

impl ProcessingFlags {
    /// No optional fields.
    pub const NONE: Self = Self(0);

    /// The envelope carries an explicit type field before the nonce.
    pub const TYPE: Self = Self(0x01);

    /// Returns true if all bits of `other` are set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if the type field is expected.
    #[inline]
    pub fn has_type(self) -> bool {
        self.contains(Self::TYPE)
    }
}
