// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words xterm

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Whether a single modifier key was held down when a key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyState {
    Pressed,
    #[default]
    NotPressed,
}

impl From<bool> for KeyState {
    fn from(other: bool) -> Self {
        if other {
            KeyState::Pressed
        } else {
            KeyState::NotPressed
        }
    }
}

/// The set of modifier keys (Shift, Ctrl, Alt, Meta) held down for a key command. Any
/// combination is allowed, including none.
///
/// Modifiers only ever come from two places in terminal input:
/// 1. The modifier parameter of a CSI sequence, eg: `ESC [ 1 ; 5 D` is Ctrl+Left. See
///    [`ModifierKeysMask::from_xterm_code()`].
/// 2. A bare `ESC` prefix in front of `b` or `f`, which terminals send for Alt+b and
///    Alt+f (word movement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierKeysMask {
    pub shift_key_state: KeyState,
    pub ctrl_key_state: KeyState,
    pub alt_key_state: KeyState,
    pub meta_key_state: KeyState,
}

impl ModifierKeysMask {
    #[must_use]
    pub fn new() -> Self {
        ModifierKeysMask {
            shift_key_state: KeyState::NotPressed,
            ctrl_key_state: KeyState::NotPressed,
            alt_key_state: KeyState::NotPressed,
            meta_key_state: KeyState::NotPressed,
        }
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn shift(&self) -> bool { self.shift_key_state == KeyState::Pressed }

    #[must_use]
    pub fn ctrl(&self) -> bool { self.ctrl_key_state == KeyState::Pressed }

    #[must_use]
    pub fn alt(&self) -> bool { self.alt_key_state == KeyState::Pressed }

    #[must_use]
    pub fn meta(&self) -> bool { self.meta_key_state == KeyState::Pressed }

    /// No modifier key is pressed.
    #[must_use]
    pub fn is_empty(&self) -> bool { *self == Self::new() }

    /// Decode the xterm modifier parameter of a CSI sequence.
    ///
    /// The parameter is `1 + bitfield`, where the bitfield is `Shift(1) | Alt(2) |
    /// Ctrl(4) | Meta(8)`:
    ///
    /// | code | modifiers          | code | modifiers                 |
    /// |:-----|:-------------------|:-----|:--------------------------|
    /// | 2    | Shift              | 9    | Meta                      |
    /// | 3    | Alt                | 10   | Meta+Shift                |
    /// | 4    | Shift+Alt          | 11   | Meta+Alt                  |
    /// | 5    | Ctrl               | 12   | Meta+Alt+Shift            |
    /// | 6    | Shift+Ctrl         | 13   | Meta+Ctrl                 |
    /// | 7    | Alt+Ctrl           | 14   | Meta+Ctrl+Shift           |
    /// | 8    | Shift+Alt+Ctrl     | 15   | Meta+Ctrl+Alt             |
    /// |      |                    | 16   | Meta+Ctrl+Alt+Shift       |
    ///
    /// Returns [`None`] for anything outside `2..=16`. Code `1` (no modifiers) is
    /// rejected too, terminals omit the parameter in that case.
    #[must_use]
    pub fn from_xterm_code(code: u16) -> Option<Self> {
        if !(2..=16).contains(&code) {
            return None;
        }
        let bits = code - 1;
        Some(ModifierKeysMask {
            shift_key_state: (bits & 1 != 0).into(),
            alt_key_state: (bits & 2 != 0).into(),
            ctrl_key_state: (bits & 4 != 0).into(),
            meta_key_state: (bits & 8 != 0).into(),
        })
    }
}

/// Renders as `Shift+Ctrl+Alt+Meta` (only the pressed ones), or the empty string.
impl Display for ModifierKeysMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let names = [
            (self.shift(), "Shift"),
            (self.ctrl(), "Ctrl"),
            (self.alt(), "Alt"),
            (self.meta(), "Meta"),
        ];
        let mut first = true;
        for (_, name) in names.iter().filter(|(pressed, _)| *pressed) {
            if !first {
                f.write_str("+")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(2, ModifierKeysMask::new().with_shift())]
    #[test_case(3, ModifierKeysMask::new().with_alt())]
    #[test_case(4, ModifierKeysMask::new().with_shift().with_alt())]
    #[test_case(5, ModifierKeysMask::new().with_ctrl())]
    #[test_case(6, ModifierKeysMask::new().with_shift().with_ctrl())]
    #[test_case(7, ModifierKeysMask::new().with_alt().with_ctrl())]
    #[test_case(8, ModifierKeysMask::new().with_shift().with_alt().with_ctrl())]
    #[test_case(9, ModifierKeysMask::new().with_meta())]
    #[test_case(10, ModifierKeysMask::new().with_meta().with_shift())]
    #[test_case(11, ModifierKeysMask::new().with_meta().with_alt())]
    #[test_case(12, ModifierKeysMask::new().with_meta().with_alt().with_shift())]
    #[test_case(13, ModifierKeysMask::new().with_meta().with_ctrl())]
    #[test_case(14, ModifierKeysMask::new().with_meta().with_ctrl().with_shift())]
    #[test_case(15, ModifierKeysMask::new().with_meta().with_ctrl().with_alt())]
    #[test_case(
        16,
        ModifierKeysMask::new().with_meta().with_ctrl().with_alt().with_shift()
    )]
    fn test_xterm_code_table(code: u16, expected: ModifierKeysMask) {
        assert_eq!(ModifierKeysMask::from_xterm_code(code), Some(expected));
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(17)]
    #[test_case(255)]
    fn test_xterm_code_out_of_range(code: u16) {
        assert_eq!(ModifierKeysMask::from_xterm_code(code), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ModifierKeysMask::new().to_string(), "");
        assert_eq!(
            ModifierKeysMask::new().with_alt().with_shift().to_string(),
            "Shift+Alt"
        );
        assert_eq!(
            ModifierKeysMask::new()
                .with_meta()
                .with_ctrl()
                .with_alt()
                .with_shift()
                .to_string(),
            "Shift+Ctrl+Alt+Meta"
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(ModifierKeysMask::default().is_empty());
        assert!(!ModifierKeysMask::new().with_meta().is_empty());
    }
}
