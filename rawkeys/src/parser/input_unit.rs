// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Direction;

/// One token cut out of the byte buffer by [`DecodeBuffer::decode()`]. This is the
/// low level vocabulary; [`crate::classify()`] turns it into a [`crate::KeyCommand`].
///
/// [`DecodeBuffer::decode()`]: super::DecodeBuffer::decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputUnit {
    /// A control byte from the fixed set in [`super::is_control_unit_byte()`].
    Byte(u8),
    /// One Unicode scalar, 1 to 4 bytes of UTF-8 in the source.
    Char(char),
    /// `ESC [ A` / `B` / `C` / `D`, no modifier information.
    Arrow(Direction),
    /// `ESC [ Z`.
    BackTab,
    /// Any other escape sequence, complete text including the leading `ESC`.
    EscapeSequence(String),
}
