//! Streaming transaction decoder.
//!
//! A transaction arrives as a sequence of chunks of arbitrary size. The
//! decoder keeps everything it needs to resume in [`TxStreamContext`], so a
//! length prefix or a payload may be split anywhere between two calls to
//! [`TxStreamContext::process`].
//!
//! Every consumed byte is fed to the caller's hasher exactly once, in
//! stream order:
//! - prefix bytes are hashed from the scratch buffer once the prefix
//!   decodes;
//! - payload bytes are hashed by the accumulator as they are copied or
//!   skipped.
//!
//! A self-encoded byte (0x00..=0x7f) decodes with a zero-length prefix. It is
//! left out of the prefix hash, the cursor is stepped back over it and the
//! accumulator reads it again as the field payload, which is where it gets
//! hashed.
//!
//! # Security
//!
//! - Declared lengths are checked against the destination before any
//!   payload byte is consumed
//! - Inner fields may not extend past the envelope
//! - A fault poisons the context; the caller must start over

use txstream_common::{
    FieldSlot, Hash256, ProcessingFlags, StreamError, Transaction, RLP_LENGTH_BUFFER_SIZE,
};

use super::rlp::{self, RlpHeader};
use super::schema::{rule_for, FieldRule, TxField};
use crate::config::StreamConfig;
use crate::crypto::{Keccak256Hasher, TxHasher};

/// Result of a successful call to [`TxStreamContext::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// The chunk was consumed; more data is expected.
    Processing,
    /// All fields were decoded.
    Finished,
}

/// Read position within the chunk of a single call.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Takes up to `len` bytes.
    fn take(&mut self, len: usize) -> &'a [u8] {
        let end = self.pos + len.min(self.remaining());
        let span = &self.data[self.pos..end];
        self.pos = end;
        span
    }

    /// Steps back over the byte just read.
    fn unread(&mut self) {
        debug_assert!(self.pos > 0);
        self.pos = self.pos.saturating_sub(1);
    }
}

/// Resumable decoder state for one transaction.
///
/// The context holds no reference to the destination or the hasher; the
/// caller passes the same [`Transaction`] and hasher to every call.
#[derive(Debug, Clone)]
pub struct TxStreamContext {
    config: StreamConfig,
    current_field: TxField,
    /// Latched on the first call.
    flags: Option<ProcessingFlags>,

    processing_field: bool,
    field_length: usize,
    field_pos: usize,
    field_is_list: bool,
    field_single_byte: bool,

    rlp_buffer: [u8; RLP_LENGTH_BUFFER_SIZE],
    rlp_buffer_pos: usize,

    envelope_length: Option<usize>,
    envelope_consumed: usize,

    faulted: bool,
}

impl TxStreamContext {
    /// Creates a context waiting for the envelope, with default limits.
    pub fn new() -> Self {
        Self::with_config(StreamConfig::default())
    }

    /// Creates a context waiting for the envelope.
    pub fn with_config(config: StreamConfig) -> Self {
        Self {
            config,
            current_field: TxField::Envelope,
            flags: None,
            processing_field: false,
            field_length: 0,
            field_pos: 0,
            field_is_list: false,
            field_single_byte: false,
            rlp_buffer: [0u8; RLP_LENGTH_BUFFER_SIZE],
            rlp_buffer_pos: 0,
            envelope_length: None,
            envelope_consumed: 0,
            faulted: false,
        }
    }

    /// Returns the schema position the decoder is at.
    #[inline]
    pub fn current_field(&self) -> TxField {
        self.current_field
    }

    /// Returns true once all fields have been decoded.
    #[inline]
    pub fn is_finished(&self) -> bool {
        !self.faulted && self.current_field == TxField::Done
    }

    /// Returns true if a call has failed. The context is then unusable.
    #[inline]
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Payload length declared by the envelope, once it has been read.
    pub fn envelope_length(&self) -> Option<usize> {
        self.envelope_length
    }

    /// Flags latched by the first call.
    pub fn flags(&self) -> Option<ProcessingFlags> {
        self.flags
    }

    /// Limits this context was created with.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Feeds one chunk of the encoded transaction.
    ///
    /// `flags` is only read on the first call; later values are ignored.
    /// Returns [`StreamStatus::Processing`] when the chunk is exhausted before
    /// the transaction is complete. Any error is terminal: later calls fail
    /// with [`StreamError::InvalidState`].
    pub fn process<H: TxHasher + ?Sized>(
        &mut self,
        tx: &mut Transaction,
        hasher: &mut H,
        buffer: &[u8],
        flags: ProcessingFlags,
    ) -> Result<StreamStatus, StreamError> {
        let result = self.run(tx, hasher, buffer, flags);
        if let Err(e) = result {
            log::warn!("txstream: fault at {:?}: {}", self.current_field, e);
            self.faulted = true;
        }
        result
    }

    fn run<H: TxHasher + ?Sized>(
        &mut self,
        tx: &mut Transaction,
        hasher: &mut H,
        buffer: &[u8],
        flags: ProcessingFlags,
    ) -> Result<StreamStatus, StreamError> {
        if buffer.is_empty() {
            return Err(StreamError::EmptyBuffer);
        }
        if self.faulted
            || self.current_field <= TxField::None
            || self.current_field >= TxField::Done
        {
            return Err(StreamError::InvalidState);
        }

        let flags = *self.flags.get_or_insert(flags);
        let mut cursor = Cursor::new(buffer);
        self.parse(&mut cursor, tx, hasher, flags)
    }

    fn parse<H: TxHasher + ?Sized>(
        &mut self,
        cursor: &mut Cursor<'_>,
        tx: &mut Transaction,
        hasher: &mut H,
        flags: ProcessingFlags,
    ) -> Result<StreamStatus, StreamError> {
        loop {
            if self.current_field == TxField::Done {
                return Ok(StreamStatus::Finished);
            }

            // Legacy transactions stop after the data field.
            if self.current_field == TxField::V && self.at_field_boundary() && self.envelope_complete()
            {
                tx.v.set_length(0);
                self.current_field = TxField::Done;
                log::debug!("txstream: no signature fields");
                return Ok(StreamStatus::Finished);
            }

            if cursor.is_empty() {
                return Ok(StreamStatus::Processing);
            }

            if !self.processing_field {
                let header = match self.detect_field(cursor)? {
                    Some(header) => header,
                    None => return Ok(StreamStatus::Processing),
                };
                self.begin_field(header, cursor, hasher)?;
            }

            self.dispatch(cursor, tx, hasher, flags)?;
        }
    }

    #[inline]
    fn at_field_boundary(&self) -> bool {
        !self.processing_field && self.rlp_buffer_pos == 0
    }

    fn envelope_complete(&self) -> bool {
        self.envelope_length == Some(self.envelope_consumed)
    }

    /// Feeds bytes into the scratch buffer until a prefix decodes.
    ///
    /// Returns `None` if the chunk ran out first.
    fn detect_field(&mut self, cursor: &mut Cursor<'_>) -> Result<Option<RlpHeader>, StreamError> {
        while let Some(byte) = cursor.read_byte() {
            self.rlp_buffer[self.rlp_buffer_pos] = byte;
            self.rlp_buffer_pos += 1;

            let prefix = &self.rlp_buffer[..self.rlp_buffer_pos];
            match rlp::can_decode(prefix) {
                Some(true) => {
                    return rlp::decode_length(prefix)
                        .map(Some)
                        .ok_or(StreamError::InvalidEncoding);
                }
                Some(false) => return Err(StreamError::InvalidEncoding),
                None if self.rlp_buffer_pos == RLP_LENGTH_BUFFER_SIZE => {
                    return Err(StreamError::ScratchOverflow);
                }
                None => {}
            }
        }
        Ok(None)
    }

    fn begin_field<H: TxHasher + ?Sized>(
        &mut self,
        header: RlpHeader,
        cursor: &mut Cursor<'_>,
        hasher: &mut H,
    ) -> Result<(), StreamError> {
        if self.current_field != TxField::Envelope {
            self.charge_envelope(header.offset + header.length)?;
        }

        self.field_single_byte = header.offset == 0;
        if self.field_single_byte {
            // The prefix byte is the value; read it again as payload.
            cursor.unread();
        } else {
            hasher.update(&self.rlp_buffer[..self.rlp_buffer_pos]);
        }
        self.rlp_buffer_pos = 0;

        self.field_length = header.length;
        self.field_is_list = header.is_list;
        self.field_pos = 0;
        self.processing_field = true;
        Ok(())
    }

    /// Accounts for an inner field of `size` bytes against the envelope.
    fn charge_envelope(&mut self, size: usize) -> Result<(), StreamError> {
        let total = self.envelope_length.ok_or(StreamError::InvalidState)?;
        let used = self
            .envelope_consumed
            .checked_add(size)
            .filter(|&used| used <= total)
            .ok_or(StreamError::EnvelopeOverrun)?;
        self.envelope_consumed = used;
        Ok(())
    }

    fn dispatch<H: TxHasher + ?Sized>(
        &mut self,
        cursor: &mut Cursor<'_>,
        tx: &mut Transaction,
        hasher: &mut H,
        flags: ProcessingFlags,
    ) -> Result<(), StreamError> {
        match rule_for(self.current_field) {
            Some(FieldRule::Envelope) => self.process_envelope(flags),
            Some(FieldRule::Scalar { slot, limit }) => {
                let max_length = limit.max_length(self.config.max_payload_length);
                let dest = match slot {
                    Some(slot) => Some(tx.slot_mut(slot)),
                    None => None,
                };
                self.accumulate(cursor, hasher, dest, max_length)
            }
            None => Err(StreamError::UnknownField),
        }
    }

    fn process_envelope(&mut self, flags: ProcessingFlags) -> Result<(), StreamError> {
        if !self.field_is_list {
            return Err(StreamError::ExpectedList);
        }

        self.envelope_length = Some(self.field_length);
        self.envelope_consumed = 0;
        self.advance();

        if !flags.has_type() {
            self.advance();
        }
        Ok(())
    }

    /// Copies (or skips) as much of the current field as the chunk holds.
    fn accumulate<H: TxHasher + ?Sized>(
        &mut self,
        cursor: &mut Cursor<'_>,
        hasher: &mut H,
        mut dest: Option<&mut dyn FieldSlot>,
        max_length: usize,
    ) -> Result<(), StreamError> {
        if self.field_is_list {
            return Err(StreamError::ExpectedScalar);
        }

        let capacity = dest
            .as_ref()
            .map_or(max_length, |slot| slot.capacity().min(max_length));
        if self.field_length > capacity {
            return Err(StreamError::FieldTooLarge);
        }

        let span = cursor.take(self.field_length - self.field_pos);
        if !span.is_empty() {
            if let Some(slot) = dest.as_deref_mut() {
                let start = self.field_pos;
                slot.buffer_mut()[start..start + span.len()].copy_from_slice(span);
            }
            hasher.update(span);
            self.field_pos += span.len();
        }

        if self.field_pos == self.field_length {
            if let Some(slot) = dest {
                slot.set_length(self.field_length);
            }
            log::debug!(
                "txstream: {:?} complete, {} bytes",
                self.current_field,
                self.field_length
            );
            self.advance();
        }
        Ok(())
    }

    fn advance(&mut self) {
        self.current_field = self.current_field.next();
        self.processing_field = false;
    }
}

impl Default for TxStreamContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a transaction held in one contiguous buffer.
///
/// Returns the decoded fields and the Keccak256 digest of `data`.
pub fn decode_transaction(
    data: &[u8],
    flags: ProcessingFlags,
) -> Result<(Transaction, Hash256), StreamError> {
    let mut ctx = TxStreamContext::new();
    let mut tx = Transaction::new();
    let mut hasher = Keccak256Hasher::new();

    match ctx.process(&mut tx, &mut hasher, data, flags)? {
        StreamStatus::Finished => Ok((tx, hasher.finalize())),
        StreamStatus::Processing => Err(StreamError::Truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keccak256;
    use crate::parsing::rlp::{encode_bytes, encode_list, encode_u64};
    use alloc::vec;
    use alloc::vec::Vec;

    /// Records every byte it is fed.
    #[derive(Default)]
    struct RecordingHasher(Vec<u8>);

    impl TxHasher for RecordingHasher {
        fn update(&mut self, data: &[u8]) {
            self.0.extend_from_slice(data);
        }
    }

    const RECIPIENT: [u8; 20] = [0x35; 20];

    fn legacy_fields(gas_price: u64, data: &[u8]) -> Vec<u8> {
        let mut fields = Vec::new();
        fields.extend_from_slice(&encode_u64(9)); // nonce
        fields.extend_from_slice(&encode_u64(gas_price));
        fields.extend_from_slice(&encode_u64(21000)); // startGas
        fields.extend_from_slice(&encode_bytes(&RECIPIENT));
        fields.extend_from_slice(&encode_u64(1_000_000_000_000_000_000)); // value
        fields.extend_from_slice(&encode_bytes(data));
        fields
    }

    fn signed_tx(gas_price: u64, data: &[u8]) -> Vec<u8> {
        let mut fields = legacy_fields(gas_price, data);
        fields.extend_from_slice(&encode_u64(37)); // v
        fields.extend_from_slice(&encode_bytes(&[0x28; 32])); // r
        fields.extend_from_slice(&encode_bytes(&[0x67; 32])); // s
        encode_list(&fields)
    }

    fn feed(
        bytes: &[u8],
        chunk: usize,
        flags: ProcessingFlags,
    ) -> (Result<StreamStatus, StreamError>, Transaction, RecordingHasher) {
        let mut ctx = TxStreamContext::new();
        let mut tx = Transaction::new();
        let mut hasher = RecordingHasher::default();
        let mut status = Ok(StreamStatus::Processing);
        for part in bytes.chunks(chunk) {
            status = ctx.process(&mut tx, &mut hasher, part, flags);
            if status != Ok(StreamStatus::Processing) {
                break;
            }
        }
        (status, tx, hasher)
    }

    #[test]
    fn test_single_chunk() {
        let bytes = signed_tx(20_000_000_000, &[]);
        let (status, tx, hasher) = feed(&bytes, bytes.len(), ProcessingFlags::NONE);

        assert_eq!(status, Ok(StreamStatus::Finished));
        assert_eq!(tx.gas_price.as_u64(), Some(20_000_000_000));
        assert_eq!(tx.start_gas.as_u64(), Some(21000));
        assert_eq!(tx.recipient.address(), Some(RECIPIENT));
        assert_eq!(tx.value.as_u64(), Some(1_000_000_000_000_000_000));
        assert_eq!(tx.v.as_u64(), Some(37));
        assert_eq!(hasher.0, bytes);
    }

    #[test]
    fn test_byte_at_a_time_matches_single_chunk() {
        let bytes = signed_tx(20_000_000_000, &[0xab; 70]);
        let (whole_status, whole_tx, whole_hash) = feed(&bytes, bytes.len(), ProcessingFlags::NONE);
        let (status, tx, hasher) = feed(&bytes, 1, ProcessingFlags::NONE);

        assert_eq!(whole_status, Ok(StreamStatus::Finished));
        assert_eq!(status, Ok(StreamStatus::Finished));
        assert_eq!(tx, whole_tx);
        assert_eq!(hasher.0, whole_hash.0);
        assert_eq!(hasher.0, bytes);
    }

    #[test]
    fn test_self_encoded_byte_hashed_once() {
        let bytes = signed_tx(5, &[]);
        for chunk in [1, 2, 3, bytes.len()] {
            let (status, tx, hasher) = feed(&bytes, chunk, ProcessingFlags::NONE);
            assert_eq!(status, Ok(StreamStatus::Finished));
            assert_eq!(tx.gas_price.length, 1);
            assert_eq!(tx.gas_price.as_slice(), &[0x05]);
            assert_eq!(hasher.0, bytes, "chunk size {}", chunk);
        }
    }

    #[test]
    fn test_self_encoded_byte_at_chunk_start() {
        let bytes = signed_tx(5, &[]);
        // envelope prefix (2) and nonce (1) end right before the gas price byte
        let (head, tail) = bytes.split_at(3);
        assert_eq!(tail[0], 0x05);

        let mut ctx = TxStreamContext::new();
        let mut tx = Transaction::new();
        let mut hasher = RecordingHasher::default();
        assert_eq!(
            ctx.process(&mut tx, &mut hasher, head, ProcessingFlags::NONE),
            Ok(StreamStatus::Processing)
        );
        assert_eq!(ctx.current_field(), TxField::GasPrice);
        assert_eq!(
            ctx.process(&mut tx, &mut hasher, tail, ProcessingFlags::NONE),
            Ok(StreamStatus::Finished)
        );
        assert_eq!(tx.gas_price.as_slice(), &[0x05]);
        assert_eq!(hasher.0, bytes);
    }

    #[test]
    fn test_oversized_field_faults_before_payload() {
        let mut fields = Vec::new();
        fields.extend_from_slice(&encode_u64(9));
        fields.extend_from_slice(&encode_bytes(&[0x11; 33])); // gas price too wide
        let bytes = encode_list(&fields);

        let (status, _, hasher) = feed(&bytes, bytes.len(), ProcessingFlags::NONE);
        assert_eq!(status, Err(StreamError::FieldTooLarge));
        // envelope prefix, nonce and the gas price prefix only
        assert_eq!(hasher.0, &bytes[..3]);
    }

    #[test]
    fn test_recipient_capacity() {
        let mut fields = Vec::new();
        for value in [9u64, 1, 21000] {
            fields.extend_from_slice(&encode_u64(value));
        }
        fields.extend_from_slice(&encode_bytes(&[0x35; 21]));
        let bytes = encode_list(&fields);

        let (status, tx, _) = feed(&bytes, 4, ProcessingFlags::NONE);
        assert_eq!(status, Err(StreamError::FieldTooLarge));
        assert_eq!(tx.recipient.length, 0);
    }

    #[test]
    fn test_legacy_without_signature() {
        let bytes = encode_list(&legacy_fields(1, &[0xde, 0xad]));
        let (status, tx, hasher) = feed(&bytes, bytes.len(), ProcessingFlags::NONE);

        assert_eq!(status, Ok(StreamStatus::Finished));
        assert_eq!(tx.v.length, 0);
        assert_eq!(tx.recipient.length, 20);
        assert_eq!(hasher.0, bytes);
    }

    #[test]
    fn test_chunk_ending_before_v_waits_for_signature() {
        let bytes = signed_tx(1, &[]);
        let v_offset = bytes.len() - 1 - 33 - 33;
        assert_eq!(bytes[v_offset], 37);

        let mut ctx = TxStreamContext::new();
        let mut tx = Transaction::new();
        let mut hasher = RecordingHasher::default();
        let (head, tail) = bytes.split_at(v_offset);
        assert_eq!(
            ctx.process(&mut tx, &mut hasher, head, ProcessingFlags::NONE),
            Ok(StreamStatus::Processing)
        );
        assert_eq!(ctx.current_field(), TxField::V);
        assert_eq!(
            ctx.process(&mut tx, &mut hasher, tail, ProcessingFlags::NONE),
            Ok(StreamStatus::Finished)
        );
        assert_eq!(tx.v.as_u64(), Some(37));
    }

    #[test]
    fn test_envelope_must_be_list() {
        let bytes = encode_bytes(&[0x01, 0x02]);
        let (status, _, _) = feed(&bytes, bytes.len(), ProcessingFlags::NONE);
        assert_eq!(status, Err(StreamError::ExpectedList));

        let (status, _, _) = feed(&[0x05], 1, ProcessingFlags::NONE);
        assert_eq!(status, Err(StreamError::ExpectedList));
    }

    #[test]
    fn test_list_in_scalar_position() {
        let bytes = encode_list(&[0xc0]);
        let (status, _, _) = feed(&bytes, bytes.len(), ProcessingFlags::NONE);
        assert_eq!(status, Err(StreamError::ExpectedScalar));
    }

    #[test]
    fn test_scratch_overflow() {
        // five length bytes announced, four fit after the tag
        let (status, _, _) = feed(&[0xfc, 0x01, 0x00, 0x00, 0x00, 0x00], 6, ProcessingFlags::NONE);
        assert_eq!(status, Err(StreamError::ScratchOverflow));
    }

    #[test]
    fn test_ill_formed_prefix() {
        let (status, _, _) = feed(&[0xf9, 0x00, 0x40], 1, ProcessingFlags::NONE);
        assert_eq!(status, Err(StreamError::InvalidEncoding));
    }

    #[test]
    fn test_envelope_overrun() {
        let mut fields = legacy_fields(1, &[]);
        fields.extend_from_slice(&encode_u64(37));
        // envelope declares two bytes fewer than the fields use
        let mut bytes = vec![0xc0 + (fields.len() - 2) as u8];
        bytes.extend_from_slice(&fields);

        let (status, _, _) = feed(&bytes, bytes.len(), ProcessingFlags::NONE);
        assert_eq!(status, Err(StreamError::EnvelopeOverrun));
    }

    #[test]
    fn test_payload_limit() {
        let bytes = signed_tx(1, &[0u8; 100]);
        let mut ctx = TxStreamContext::with_config(StreamConfig::with_max_payload_length(64));
        let mut tx = Transaction::new();
        let mut hasher = RecordingHasher::default();
        assert_eq!(ctx.config().max_payload_length, 64);
        assert_eq!(TxStreamContext::new().config(), &StreamConfig::default());

        assert_eq!(
            ctx.process(&mut tx, &mut hasher, &bytes, ProcessingFlags::NONE),
            Err(StreamError::FieldTooLarge)
        );
        assert!(ctx.is_faulted());
        assert_eq!(ctx.current_field(), TxField::Data);
    }

    #[test]
    fn test_type_field() {
        let mut fields = encode_u64(1);
        fields.extend_from_slice(&legacy_fields(3, &[]));
        let bytes = encode_list(&fields);

        let (status, tx, _) = feed(&bytes, 3, ProcessingFlags::TYPE);
        assert_eq!(status, Ok(StreamStatus::Finished));
        assert_eq!(tx.gas_price.as_u64(), Some(3));
        assert_eq!(tx.start_gas.as_u64(), Some(21000));
    }

    #[test]
    fn test_flags_latched_on_first_call() {
        let mut fields = encode_u64(1);
        fields.extend_from_slice(&legacy_fields(3, &[]));
        let bytes = encode_list(&fields);
        let (head, tail) = bytes.split_at(4);

        let mut ctx = TxStreamContext::new();
        let mut tx = Transaction::new();
        let mut hasher = RecordingHasher::default();
        ctx.process(&mut tx, &mut hasher, head, ProcessingFlags::TYPE)
            .unwrap();
        let status = ctx
            .process(&mut tx, &mut hasher, tail, ProcessingFlags::NONE)
            .unwrap();

        assert_eq!(status, StreamStatus::Finished);
        assert_eq!(ctx.flags(), Some(ProcessingFlags::TYPE));
        assert_eq!(tx.gas_price.as_u64(), Some(3));
    }

    #[test]
    fn test_preconditions() {
        let mut ctx = TxStreamContext::new();
        let mut tx = Transaction::new();
        let mut hasher = RecordingHasher::default();
        assert_eq!(
            ctx.process(&mut tx, &mut hasher, &[], ProcessingFlags::NONE),
            Err(StreamError::EmptyBuffer)
        );
        assert!(ctx.is_faulted());
        assert_eq!(
            ctx.process(&mut tx, &mut hasher, &[0xc0], ProcessingFlags::NONE),
            Err(StreamError::InvalidState)
        );
    }

    #[test]
    fn test_finished_context_rejects_more_data() {
        let bytes = signed_tx(1, &[]);
        let mut ctx = TxStreamContext::new();
        let mut tx = Transaction::new();
        let mut hasher = RecordingHasher::default();

        assert_eq!(
            ctx.process(&mut tx, &mut hasher, &bytes, ProcessingFlags::NONE),
            Ok(StreamStatus::Finished)
        );
        assert!(ctx.is_finished());
        assert_eq!(ctx.envelope_length(), Some(bytes.len() - 2));
        assert_eq!(
            ctx.process(&mut tx, &mut hasher, &bytes, ProcessingFlags::NONE),
            Err(StreamError::InvalidState)
        );
        assert!(!ctx.is_finished());
    }

    #[test]
    fn test_long_prefix_split_across_chunks() {
        let bytes = signed_tx(1, &[0x42; 300]);
        let data_prefix = bytes
            .windows(3)
            .position(|w| w == [0xb9, 0x01, 0x2c])
            .unwrap();

        let mut ctx = TxStreamContext::new();
        let mut tx = Transaction::new();
        let mut hasher = RecordingHasher::default();
        for part in [
            &bytes[..data_prefix + 1],
            &bytes[data_prefix + 1..data_prefix + 2],
            &bytes[data_prefix + 2..],
        ] {
            ctx.process(&mut tx, &mut hasher, part, ProcessingFlags::NONE)
                .unwrap();
        }

        assert!(ctx.is_finished());
        assert_eq!(hasher.0, bytes);
    }

    #[test]
    fn test_decode_transaction() {
        let bytes = signed_tx(20_000_000_000, &[]);
        let (tx, digest) = decode_transaction(&bytes, ProcessingFlags::NONE).unwrap();
        assert_eq!(digest, keccak256(&bytes));
        assert_eq!(tx.v.as_u64(), Some(37));

        assert_eq!(
            decode_transaction(&bytes[..bytes.len() - 5], ProcessingFlags::NONE),
            Err(StreamError::Truncated)
        );
    }
}
