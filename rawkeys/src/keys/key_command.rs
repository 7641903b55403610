// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::ModifierKeysMask;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic key command decoded from terminal input. This is what consumers of the
/// [`crate::KeyCommandStream`] receive.
///
/// The named variants follow the emacs style line editing bindings that terminals send
/// as single control bytes (eg: `Ctrl+A` is [`KeyCommand::MoveToStart`]). Escape
/// sequences that are well formed but not understood are never dropped; they arrive
/// verbatim as [`KeyCommand::RawEscapeSequence`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    /// `Ctrl+C`.
    Terminate,
    /// `Ctrl+D`, or the `Delete` key (`CSI 3 ~`).
    Delete,
    /// `Ctrl+U`.
    DeleteToStart,
    /// `Ctrl+K`.
    DeleteToEnd,
    /// `Ctrl+A`, or the `Home` key.
    MoveToStart,
    /// `Ctrl+E`, or the `End` key.
    MoveToEnd,
    /// `Ctrl+T`.
    Transpose,
    Tab,
    /// `Shift+Tab` (`CSI Z`).
    BackTab,
    Return,
    Escape,
    /// The backspace key sends `DEL` (`0x7F`) in raw mode.
    Backspace,
    /// `Ctrl+Z`.
    Suspend,
    /// Arrow key, possibly with modifiers. `Alt+Left` and `Alt+Right` double as word
    /// movement, see [`KeyCommand::word_movement()`].
    Arrow {
        direction: Direction,
        modifiers: ModifierKeysMask,
    },
    /// Function keys `F1` to `F12`.
    Function {
        number: u8,
        modifiers: ModifierKeysMask,
    },
    /// A typed character.
    Char(char),
    /// An escape sequence that isn't recognized, passed through unchanged.
    RawEscapeSequence(String),
}

impl KeyCommand {
    #[must_use]
    pub fn arrow(direction: Direction) -> Self {
        KeyCommand::Arrow {
            direction,
            modifiers: ModifierKeysMask::new(),
        }
    }

    #[must_use]
    pub fn arrow_with(direction: Direction, modifiers: ModifierKeysMask) -> Self {
        KeyCommand::Arrow {
            direction,
            modifiers,
        }
    }

    /// If this command moves the caret by a whole word, return the direction.
    ///
    /// Terminals report word movement as `Alt+Left`/`Alt+Right` (`ESC b`, `ESC f`, or
    /// `CSI 1;3D`), and many also send `Ctrl+Left`/`Ctrl+Right` for it.
    #[must_use]
    pub fn word_movement(&self) -> Option<Direction> {
        match self {
            KeyCommand::Arrow {
                direction: direction @ (Direction::Left | Direction::Right),
                modifiers,
            } if (modifiers.alt() || modifiers.ctrl())
                && !modifiers.shift()
                && !modifiers.meta() =>
            {
                Some(*direction)
            }
            _ => None,
        }
    }
}

impl Display for KeyCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            KeyCommand::Arrow {
                direction,
                modifiers,
            } => {
                if modifiers.is_empty() {
                    write!(f, "{direction}")
                } else {
                    write!(f, "{modifiers}+{direction}")
                }
            }
            KeyCommand::Function { number, modifiers } => {
                if modifiers.is_empty() {
                    write!(f, "F{number}")
                } else {
                    write!(f, "{modifiers}+F{number}")
                }
            }
            KeyCommand::Char(ch) => write!(f, "Char({ch:?})"),
            KeyCommand::RawEscapeSequence(seq) => write!(f, "RawEscapeSequence({seq:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        assert_eq!(KeyCommand::Return.to_string(), "Return");
        assert_eq!(KeyCommand::Char('a').to_string(), "Char('a')");
        assert_eq!(KeyCommand::arrow(Direction::Up).to_string(), "Up");
        assert_eq!(
            KeyCommand::arrow_with(Direction::Left, ModifierKeysMask::new().with_ctrl())
                .to_string(),
            "Ctrl+Left"
        );
        assert_eq!(
            KeyCommand::Function {
                number: 5,
                modifiers: ModifierKeysMask::new().with_shift()
            }
            .to_string(),
            "Shift+F5"
        );
        assert_eq!(
            KeyCommand::RawEscapeSequence("\x1b[99x".into()).to_string(),
            r#"RawEscapeSequence("\u{1b}[99x")"#
        );
    }

    #[test]
    fn test_word_movement() {
        let alt = ModifierKeysMask::new().with_alt();
        let ctrl = ModifierKeysMask::new().with_ctrl();
        assert_eq!(
            KeyCommand::arrow_with(Direction::Left, alt).word_movement(),
            Some(Direction::Left)
        );
        assert_eq!(
            KeyCommand::arrow_with(Direction::Right, ctrl).word_movement(),
            Some(Direction::Right)
        );
        assert_eq!(KeyCommand::arrow(Direction::Left).word_movement(), None);
        assert_eq!(KeyCommand::arrow_with(Direction::Up, alt).word_movement(), None);
        assert_eq!(
            KeyCommand::arrow_with(Direction::Right, alt.with_shift()).word_movement(),
            None
        );
    }
}
