// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words xterm

//! Turn one complete escape sequence into a [`KeyCommand`].
//!
//! | Sequence                | Command                                   |
//! |:------------------------|:------------------------------------------|
//! | `ESC b`, `ESC f`        | Left / Right with Alt (word movement)     |
//! | `ESC O P` .. `ESC O S`  | `F1` .. `F4`                              |
//! | `ESC O A` .. `ESC O D`  | arrows, application cursor mode           |
//! | `ESC O H`, `ESC O F`    | Home / End, application cursor mode       |
//! | `CSI [n ;] m A..D`      | arrows with modifier code `m`             |
//! | `CSI [n ;] m P..S`      | `F1` .. `F4` with modifier code `m`       |
//! | `CSI H`, `CSI F`        | Home / End                                |
//! | `CSI n [; m] ~`         | `F5` .. `F12`, `Home`, `End`, `Delete`    |
//!
//! The modifier code `m` follows the xterm convention, see
//! [`ModifierKeysMask::from_xterm_code()`]. A sequence that is well formed but not in
//! this table is never an error; it comes back as [`KeyCommand::RawEscapeSequence`] with
//! its text unchanged.

use super::{ANSI_CSI_BRACKET, ANSI_ESC, ANSI_SS3_O};
use crate::{Direction, KeyCommand, ModifierKeysMask};

const CSI_PARAM_SEPARATOR: u8 = b';';

/// Decode a complete escape sequence (including its leading `ESC`). Total: every input
/// maps to some command.
#[must_use]
pub fn parse_escape_sequence(sequence: &str) -> KeyCommand {
    try_parse_escape_sequence(sequence)
        .unwrap_or_else(|| KeyCommand::RawEscapeSequence(sequence.to_owned()))
}

fn try_parse_escape_sequence(sequence: &str) -> Option<KeyCommand> {
    match sequence.as_bytes() {
        [ANSI_ESC, b'b'] => Some(KeyCommand::arrow_with(
            Direction::Left,
            ModifierKeysMask::new().with_alt(),
        )),
        [ANSI_ESC, b'f'] => Some(KeyCommand::arrow_with(
            Direction::Right,
            ModifierKeysMask::new().with_alt(),
        )),
        [ANSI_ESC, ANSI_SS3_O, final_byte] => parse_ss3(*final_byte),
        [ANSI_ESC, ANSI_CSI_BRACKET, params @ .., final_byte] => {
            parse_csi(params, *final_byte)
        }
        _ => None,
    }
}

fn parse_ss3(final_byte: u8) -> Option<KeyCommand> {
    let plain = ModifierKeysMask::new();
    if let Some(direction) = arrow_direction(final_byte) {
        return Some(KeyCommand::arrow(direction));
    }
    if let Some(number) = low_function_key_number(final_byte) {
        return Some(KeyCommand::Function {
            number,
            modifiers: plain,
        });
    }
    match final_byte {
        b'H' => Some(KeyCommand::MoveToStart),
        b'F' => Some(KeyCommand::MoveToEnd),
        _ => None,
    }
}

fn parse_csi(params: &[u8], final_byte: u8) -> Option<KeyCommand> {
    let params = CsiParams::parse(params)?;

    if let Some(direction) = arrow_direction(final_byte) {
        let modifiers = params.trailing_modifiers()?;
        return Some(KeyCommand::arrow_with(direction, modifiers));
    }
    if let Some(number) = low_function_key_number(final_byte) {
        let modifiers = params.trailing_modifiers()?;
        return Some(KeyCommand::Function { number, modifiers });
    }

    match final_byte {
        b'H' if params.is_empty() => Some(KeyCommand::MoveToStart),
        b'F' if params.is_empty() => Some(KeyCommand::MoveToEnd),
        b'~' => parse_tilde_key(&params),
        _ => None,
    }
}

/// `CSI n ~` and `CSI n ; m ~`. This is how VT220 style terminals encode the editing
/// keypad and `F5` and up.
fn parse_tilde_key(params: &CsiParams) -> Option<KeyCommand> {
    let code = params.first?;
    let modifiers = match (params.has_separator, params.second) {
        (false, _) => ModifierKeysMask::new(),
        (true, Some(1)) => ModifierKeysMask::new(),
        (true, Some(modifier_code)) => ModifierKeysMask::from_xterm_code(modifier_code)?,
        (true, None) => return None,
    };

    let function_key_number = match code {
        11..=15 => Some(code - 10),
        17..=21 => Some(code - 11),
        23..=24 => Some(code - 12),
        _ => None,
    };
    if let Some(number) = function_key_number {
        return Some(KeyCommand::Function {
            number: u8::try_from(number).ok()?,
            modifiers,
        });
    }

    // Editing keys don't carry modifiers.
    if !modifiers.is_empty() {
        return None;
    }
    match code {
        1 | 7 => Some(KeyCommand::MoveToStart),
        3 => Some(KeyCommand::Delete),
        4 | 8 => Some(KeyCommand::MoveToEnd),
        _ => None,
    }
}

fn arrow_direction(final_byte: u8) -> Option<Direction> {
    match final_byte {
        b'A' => Some(Direction::Up),
        b'B' => Some(Direction::Down),
        b'C' => Some(Direction::Right),
        b'D' => Some(Direction::Left),
        _ => None,
    }
}

/// `F1` to `F4` are sent with the final bytes `P` to `S`.
fn low_function_key_number(final_byte: u8) -> Option<u8> {
    match final_byte {
        b'P'..=b'S' => Some(final_byte - b'P' + 1),
        _ => None,
    }
}

/// The numeric parameters between `ESC [` and the final byte: at most two decimal
/// numbers, separated by `;`. Either may be absent (eg: `CSI ; 5 D`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct CsiParams {
    first: Option<u16>,
    second: Option<u16>,
    has_separator: bool,
}

impl CsiParams {
    /// [`None`] if there is anything other than digits and one `;` (eg: the `?` of a
    /// private mode report), or if a number doesn't fit `u16`.
    fn parse(bytes: &[u8]) -> Option<Self> {
        let mut parts = bytes.split(|byte| *byte == CSI_PARAM_SEPARATOR);
        let first = parse_number(parts.next()?)?;
        let second = match parts.next() {
            Some(part) => Some(parse_number(part)?),
            None => None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(CsiParams {
            first,
            has_separator: second.is_some(),
            second: second.flatten(),
        })
    }

    fn is_empty(&self) -> bool { *self == Self::default() }

    /// Modifiers for arrow and `F1`-`F4` sequences. With a `;` the first number is
    /// skipped and the second is the modifier code; without one, the only number is the
    /// modifier code. A missing code, or code `1`, isn't recognized.
    fn trailing_modifiers(&self) -> Option<ModifierKeysMask> {
        let code = if self.has_separator {
            self.second
        } else {
            self.first
        };
        ModifierKeysMask::from_xterm_code(code?)
    }
}

/// `Some(None)` for an empty part, `None` if the part isn't a number.
fn parse_number(part: &[u8]) -> Option<Option<u16>> {
    if part.is_empty() {
        return Some(None);
    }
    if !part.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(part).ok()?.parse().ok().map(Some)
}
