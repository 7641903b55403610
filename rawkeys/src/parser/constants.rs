// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Byte values that terminals send in raw mode.

use std::ops::RangeInclusive;

/// `ESC`, the first byte of every escape sequence (and the Escape key itself).
pub const ANSI_ESC: u8 = 0x1B;
/// `[`, second byte of a Control Sequence Introducer (`ESC [`).
pub const ANSI_CSI_BRACKET: u8 = b'[';
/// `O`, second byte of a Single Shift 3 sequence (`ESC O`), used for `F1`-`F4`.
pub const ANSI_SS3_O: u8 = b'O';

/// A CSI sequence ends at the first byte in this range.
pub const CSI_FINAL_BYTE_RANGE: RangeInclusive<u8> = 0x40..=0x7E;

pub const CTRL_A: u8 = 0x01;
pub const CTRL_C: u8 = 0x03;
pub const CTRL_D: u8 = 0x04;
pub const CTRL_E: u8 = 0x05;
pub const ASCII_TAB: u8 = 0x09;
pub const CTRL_K: u8 = 0x0B;
/// Enter sends CR in raw mode (the `ICRNL` translation to LF is off).
pub const ASCII_CR: u8 = 0x0D;
pub const CTRL_T: u8 = 0x14;
pub const CTRL_U: u8 = 0x15;
pub const CTRL_Z: u8 = 0x1A;
/// Backspace sends `DEL`, not `BS` (`0x08`). A VT100 leftover.
pub const ASCII_DEL: u8 = 0x7F;

/// Single bytes the decoder turns into [`InputUnit::Byte`] instead of a character.
///
/// [`InputUnit::Byte`]: super::InputUnit::Byte
#[must_use]
pub fn is_control_unit_byte(byte: u8) -> bool {
    matches!(
        byte,
        CTRL_A
            | CTRL_C..=CTRL_E
            | ASCII_TAB
            | CTRL_K
            | ASCII_CR
            | CTRL_T..=CTRL_U
            | CTRL_Z..=ANSI_ESC
            | 0x1C..=0x1F
            | ASCII_DEL
    )
}
