// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Map [`InputUnit`]s (tokens from the decoder) onto [`KeyCommand`]s. This doesn't
//! care how the bytes were read, so it is a total, pure function.

use super::KeyCommand;
use crate::parser::{ANSI_ESC, ASCII_CR, ASCII_DEL, ASCII_TAB, CTRL_A, CTRL_C, CTRL_D,
                    CTRL_E, CTRL_K, CTRL_T, CTRL_U, CTRL_Z, InputUnit,
                    parse_escape_sequence};

/// Classify one token from the decoder.
#[must_use]
pub fn classify(unit: InputUnit) -> KeyCommand {
    match unit {
        InputUnit::Byte(byte) => classify_control_byte(byte),
        InputUnit::Char(ch) => KeyCommand::Char(ch),
        InputUnit::Arrow(direction) => KeyCommand::arrow(direction),
        InputUnit::BackTab => KeyCommand::BackTab,
        InputUnit::EscapeSequence(sequence) => parse_escape_sequence(&sequence),
    }
}

/// Named command for a single control byte. Bytes without a name (eg: `0x1C` to
/// `0x1F`) become plain characters.
#[must_use]
pub fn classify_control_byte(byte: u8) -> KeyCommand {
    match byte {
        CTRL_A => KeyCommand::MoveToStart,
        CTRL_C => KeyCommand::Terminate,
        CTRL_D => KeyCommand::Delete,
        CTRL_E => KeyCommand::MoveToEnd,
        ASCII_TAB => KeyCommand::Tab,
        CTRL_K => KeyCommand::DeleteToEnd,
        ASCII_CR => KeyCommand::Return,
        CTRL_T => KeyCommand::Transpose,
        CTRL_U => KeyCommand::DeleteToStart,
        CTRL_Z => KeyCommand::Suspend,
        ANSI_ESC => KeyCommand::Escape,
        ASCII_DEL => KeyCommand::Backspace,
        _ => KeyCommand::Char(char::from(byte)),
    }
}
