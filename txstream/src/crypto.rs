//! Hashing for streamed transactions.
//!
//! The decoder never finalizes a hash; it only feeds bytes into whatever
//! accumulator the caller hands it through [`TxHasher`]. Ethereum signing
//! uses Keccak256, provided here by [`Keccak256Hasher`].
//!
//! # Security
//!
//! Uses tiny-keccak which has a constant-time Keccak-f[1600] permutation.
//! Memory access pattern is fixed regardless of input content.

use tiny_keccak::{Hasher as KeccakHasher, Keccak};
use txstream_common::Hash256;

/// Running hash fed by the stream decoder.
///
/// Implementations must treat successive `update` calls as one
/// contiguous message.
pub trait TxHasher {
    /// Absorbs `data` into the running state.
    fn update(&mut self, data: &[u8]);
}

impl TxHasher for Keccak {
    fn update(&mut self, data: &[u8]) {
        KeccakHasher::update(self, data);
    }
}

impl<H: TxHasher + ?Sized> TxHasher for &mut H {
    fn update(&mut self, data: &[u8]) {
        (**self).update(data);
    }
}

/// Keccak256 hash function as used by Ethereum.
pub fn keccak256(data: &[u8]) -> Hash256 {
    let mut hasher = Keccak::v256();
    KeccakHasher::update(&mut hasher, data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Streaming Keccak256 hasher.
#[derive(Clone)]
pub struct Keccak256Hasher {
    inner: Keccak,
}

impl Keccak256Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self {
            inner: Keccak::v256(),
        }
    }

    /// Finalizes and returns the hash.
    pub fn finalize(self) -> Hash256 {
        let mut output = [0u8; 32];
        self.inner.finalize(&mut output);
        output
    }
}

impl TxHasher for Keccak256Hasher {
    fn update(&mut self, data: &[u8]) {
        KeccakHasher::update(&mut self.inner, data);
    }
}

impl Default for Keccak256Hasher {
    fn default() -> Self {
        Self::new()
    }
}
