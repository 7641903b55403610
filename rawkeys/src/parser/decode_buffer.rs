// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words resync

//! Incremental tokenizer for terminal input bytes.
//!
//! Bytes arrive from the tty in arbitrary chunks: an escape sequence can be split
//! across two reads, and so can a multi-byte UTF-8 character. [`DecodeBuffer`] holds the
//! bytes that haven't formed a complete token yet, and [`decode_token()`] decides, for
//! the current buffer contents, whether a token is complete.
//!
//! ## Decision order
//!
//! ```text
//! buffer contents                      outcome
//! ───────────────────────────────────  ─────────────────────────────────────────────
//! [ESC]            (more == true)      NeedMore, the rest of a sequence may follow
//! [b]              (b is ASCII)        Byte(b) for control bytes, else Char(b)     1
//! ESC [ A|B|C|D|Z  ...                 Arrow / BackTab                             3
//! ESC [ ... F      (F in 0x40..=0x7E)  EscapeSequence("ESC [ ... F")               i+1
//! ESC [ ...        (no final byte)     NeedMore
//! ESC ESC ...                          Byte(ESC), the 2nd ESC starts a new token   1
//! ESC O F                              EscapeSequence("ESC O F")                   3
//! ESC c                                EscapeSequence("ESC c"), eg: Alt+b          2+
//! text                                 first UTF-8 scalar                          1-4
//! ```
//!
//! Anything that is still `NeedMore` when the buffer is full is discarded, as is UTF-8
//! that can never become valid. Both are silent resyncs, not errors: terminal input is
//! noisy (paste floods, sequences torn apart by scheduling gaps) and the decoder must
//! keep going.

use super::{ANSI_CSI_BRACKET, ANSI_ESC, ANSI_SS3_O, CSI_FINAL_BYTE_RANGE, InputUnit,
            is_control_unit_byte};
use crate::Direction;
use smallvec::{SmallVec, smallvec};

/// Default size of the decode window.
pub const DEFAULT_BUFFER_CAPACITY: usize = 32;

/// Smallest decode window allowed. The longest sequence the classifier understands
/// (`ESC [ 1 ; 16 D`) fits with plenty of room.
pub const MIN_BUFFER_CAPACITY: usize = 32;

/// Inline storage, so the default capacity never touches the heap.
const INLINE_CAPACITY: usize = 64;

/// Result of looking at the current buffer contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A complete token starts the buffer and spans `consumed` bytes.
    Token { unit: InputUnit, consumed: usize },
    /// Can't decide yet. Retry after the next read.
    NeedMore,
    /// The contents can never form a token. The whole buffer must be dropped.
    Discard(DiscardReason),
}

/// Why the buffer was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum DiscardReason {
    /// The buffer filled up without a token, eg: an unterminated CSI sequence.
    Overflow,
    /// The bytes aren't UTF-8 and more bytes won't fix that.
    InvalidUtf8,
}

/// Decode the first token of `filled`.
///
/// - `capacity`: size of the window `filled` lives in; `filled.len() == capacity` means
///   the buffer is full and undecidable content gets discarded.
/// - `more`: whether more bytes may be on their way. Only matters for prefixes that are
///   complete tokens on their own but also the start of a longer sequence (a lone
///   `ESC`, or `ESC O`).
///
/// Never blocks, and never reports consuming bytes that aren't part of the token.
#[must_use]
pub fn decode_token(filled: &[u8], capacity: usize, more: bool) -> DecodeOutcome {
    let outcome = match filled {
        [] => DecodeOutcome::NeedMore,

        // Lone ESC: the Escape key, or the start of a sequence.
        [ANSI_ESC] if more => DecodeOutcome::NeedMore,
        [byte] if byte.is_ascii() => token(single_byte_unit(*byte), 1),

        // Fixed 3 byte sequences.
        [ANSI_ESC, ANSI_CSI_BRACKET, b'A', ..] => token(InputUnit::Arrow(Direction::Up), 3),
        [ANSI_ESC, ANSI_CSI_BRACKET, b'B', ..] => {
            token(InputUnit::Arrow(Direction::Down), 3)
        }
        [ANSI_ESC, ANSI_CSI_BRACKET, b'C', ..] => {
            token(InputUnit::Arrow(Direction::Right), 3)
        }
        [ANSI_ESC, ANSI_CSI_BRACKET, b'D', ..] => {
            token(InputUnit::Arrow(Direction::Left), 3)
        }
        [ANSI_ESC, ANSI_CSI_BRACKET, b'Z', ..] => token(InputUnit::BackTab, 3),

        // Variable length CSI.
        [ANSI_ESC, ANSI_CSI_BRACKET, ..] => decode_csi(filled),

        [ANSI_ESC, ANSI_ESC, ..] => token(InputUnit::Byte(ANSI_ESC), 1),

        // SS3, or Alt+O.
        [ANSI_ESC, ANSI_SS3_O] if more => DecodeOutcome::NeedMore,
        [ANSI_ESC, ANSI_SS3_O, final_byte, ..]
            if CSI_FINAL_BYTE_RANGE.contains(final_byte) =>
        {
            escape_sequence_token(&filled[..3])
        }

        [ANSI_ESC, rest @ ..] => match decode_first_char(rest) {
            FirstChar::Complete { len, .. } => escape_sequence_token(&filled[..=len]),
            FirstChar::Incomplete => DecodeOutcome::NeedMore,
            FirstChar::Invalid => DecodeOutcome::Discard(DiscardReason::InvalidUtf8),
        },

        _ => match decode_first_char(filled) {
            FirstChar::Complete { len: 1, .. } => token(single_byte_unit(filled[0]), 1),
            FirstChar::Complete { ch, len } => token(InputUnit::Char(ch), len),
            FirstChar::Incomplete => DecodeOutcome::NeedMore,
            FirstChar::Invalid => DecodeOutcome::Discard(DiscardReason::InvalidUtf8),
        },
    };

    match outcome {
        DecodeOutcome::NeedMore if filled.len() >= capacity => {
            DecodeOutcome::Discard(DiscardReason::Overflow)
        }
        it => it,
    }
}

fn token(unit: InputUnit, consumed: usize) -> DecodeOutcome {
    DecodeOutcome::Token { unit, consumed }
}

fn single_byte_unit(byte: u8) -> InputUnit {
    if is_control_unit_byte(byte) {
        InputUnit::Byte(byte)
    } else {
        InputUnit::Char(char::from(byte))
    }
}

fn escape_sequence_token(sequence: &[u8]) -> DecodeOutcome {
    match std::str::from_utf8(sequence) {
        Ok(text) => token(InputUnit::EscapeSequence(text.to_owned()), sequence.len()),
        Err(_) => DecodeOutcome::Discard(DiscardReason::InvalidUtf8),
    }
}

/// `filled` starts with `ESC [`. Scan for the final byte from index 2 onwards.
fn decode_csi(filled: &[u8]) -> DecodeOutcome {
    match filled
        .iter()
        .skip(2)
        .position(|byte| CSI_FINAL_BYTE_RANGE.contains(byte))
    {
        Some(offset) => escape_sequence_token(&filled[..2 + offset + 1]),
        None => DecodeOutcome::NeedMore,
    }
}

enum FirstChar {
    Complete { ch: char, len: usize },
    /// A valid prefix of a multi-byte scalar; the rest hasn't arrived yet.
    Incomplete,
    Invalid,
}

fn decode_first_char(bytes: &[u8]) -> FirstChar {
    let valid = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) if error.valid_up_to() > 0 => {
            match std::str::from_utf8(&bytes[..error.valid_up_to()]) {
                Ok(text) => text,
                Err(_) => return FirstChar::Invalid,
            }
        }
        Err(error) if error.error_len().is_none() => return FirstChar::Incomplete,
        Err(_) => return FirstChar::Invalid,
    };
    match valid.chars().next() {
        Some(ch) => FirstChar::Complete {
            ch,
            len: ch.len_utf8(),
        },
        None => FirstChar::Incomplete,
    }
}

/// Fixed capacity byte window that the reader appends to and the decoder consumes from.
///
/// ```text
/// ┌───────────────────────────────────────────────┐
/// │ data: [pending bytes ...][zeroes ...........] │
/// │                          ^                    │
/// │                          fill                 │
/// └───────────────────────────────────────────────┘
/// ```
///
/// - Bytes before `fill` are waiting to be decoded.
/// - Bytes from `fill` onward are logically absent and are kept zeroed.
/// - Consuming `n` bytes shifts the remainder to the front, so a consumed byte is never
///   looked at again.
///
/// It has a single owner (the reader thread) and no interior mutability.
#[derive(Debug, Clone)]
pub struct DecodeBuffer {
    data: SmallVec<[u8; INLINE_CAPACITY]>,
    fill: usize,
}

impl Default for DecodeBuffer {
    fn default() -> Self { Self::new() }
}

impl DecodeBuffer {
    /// Buffer with [`DEFAULT_BUFFER_CAPACITY`].
    #[must_use]
    pub fn new() -> Self { Self::with_capacity(DEFAULT_BUFFER_CAPACITY) }

    /// Buffer with the given capacity, raised to [`MIN_BUFFER_CAPACITY`] if smaller.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: smallvec![0; capacity.max(MIN_BUFFER_CAPACITY)],
            fill: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize { self.data.len() }

    /// Number of pending bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.fill }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.fill == 0 }

    #[must_use]
    pub fn is_full(&self) -> bool { self.fill == self.capacity() }

    /// The pending bytes.
    #[must_use]
    pub fn filled(&self) -> &[u8] { &self.data[..self.fill] }

    /// The free tail of the window, for reading into directly. Follow up with
    /// [`Self::commit()`].
    pub fn spare_capacity_mut(&mut self) -> &mut [u8] {
        let fill = self.fill;
        &mut self.data[fill..]
    }

    /// Mark `count` bytes written into [`Self::spare_capacity_mut()`] as pending.
    pub fn commit(&mut self, count: usize) {
        debug_assert!(self.fill + count <= self.capacity());
        self.fill = (self.fill + count).min(self.capacity());
    }

    /// Copy as much of `bytes` as fits. Returns how many bytes were taken.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let spare = self.spare_capacity_mut();
        let count = bytes.len().min(spare.len());
        spare[..count].copy_from_slice(&bytes[..count]);
        self.fill += count;
        count
    }

    /// Drop the first `count` pending bytes, shift the rest to the front, and zero the
    /// vacated tail.
    pub fn consume(&mut self, count: usize) {
        let count = count.min(self.fill);
        let old_fill = self.fill;
        self.data.copy_within(count..old_fill, 0);
        self.fill = old_fill - count;
        self.data[self.fill..old_fill].fill(0);
    }

    /// Drop every pending byte.
    pub fn clear(&mut self) {
        let old_fill = self.fill;
        self.data[..old_fill].fill(0);
        self.fill = 0;
    }

    /// The pending bytes are a complete token only if nothing else follows (a lone
    /// `ESC`, or `ESC O`). The reader waits a little before deciding.
    #[must_use]
    pub fn has_ambiguous_prefix(&self) -> bool {
        matches!(self.filled(), [ANSI_ESC] | [ANSI_ESC, ANSI_SS3_O])
    }

    /// Cut the next token out of the buffer, if there is one. Call repeatedly until it
    /// returns [`None`]. See [`decode_token()`] for `more`.
    pub fn decode(&mut self, more: bool) -> Option<InputUnit> {
        match decode_token(self.filled(), self.capacity(), more) {
            DecodeOutcome::Token { unit, consumed } => {
                self.consume(consumed);
                Some(unit)
            }
            DecodeOutcome::NeedMore => None,
            DecodeOutcome::Discard(reason) => {
                tracing::warn!(
                    message = "decode buffer: discarding undecodable input",
                    %reason,
                    bytes_dropped = self.fill
                );
                self.clear();
                None
            }
        }
    }
}
