// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios BRKINT ICRNL INPCK ISTRIP IXON OPOST CSIZE ICANON IEXTEN ISIG VMIN
// cspell:words VTIME cfmakeraw

use rustix::termios::{ControlModes, InputModes, LocalModes, OutputModes,
                      SpecialCodeIndex, Termios};
use std::{fmt::{Display, Formatter, Result as FmtResult},
          io};

/// Identifies a terminal device independently of the descriptor used to reach it: two
/// descriptors for the same tty (eg: stdin and a fresh `/dev/tty`) have the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceKey {
    pub dev: u64,
    pub ino: u64,
}

impl Display for DeviceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "dev:{}/ino:{}", self.dev, self.ino)
    }
}

/// Terminal attributes that know how to derive their raw mode version.
pub trait RawModeAttributes: Clone {
    /// A copy of `self` with raw mode applied.
    #[must_use]
    fn to_raw(&self) -> Self;
}

/// Raw mode as `cfmakeraw(3)` defines it, minus the flags that don't affect input.
impl RawModeAttributes for Termios {
    fn to_raw(&self) -> Self {
        let mut it = self.clone();
        it.input_modes.remove(
            InputModes::BRKINT
                | InputModes::ICRNL
                | InputModes::INPCK
                | InputModes::ISTRIP
                | InputModes::IXON,
        );
        it.output_modes.remove(OutputModes::OPOST);
        it.control_modes.remove(ControlModes::CSIZE);
        it.control_modes.insert(ControlModes::CS8);
        it.local_modes.remove(
            LocalModes::ECHO | LocalModes::ICANON | LocalModes::IEXTEN | LocalModes::ISIG,
        );
        it.special_codes[SpecialCodeIndex::VMIN] = 1;
        it.special_codes[SpecialCodeIndex::VTIME] = 0;
        it
    }
}

/// A terminal whose attributes can be read and written. [`crate::TtyDevice`] is the
/// real one; tests use a mock.
pub trait TerminalDevice {
    type Attributes: RawModeAttributes;

    fn device_key(&self) -> DeviceKey;

    /// # Errors
    ///
    /// The OS error from `tcgetattr`, eg: `ENOTTY` if this isn't a terminal.
    fn get_attributes(&self) -> io::Result<Self::Attributes>;

    /// Applies immediately (`TCSANOW`).
    ///
    /// # Errors
    ///
    /// The OS error from `tcsetattr`.
    fn set_attributes(&self, attributes: &Self::Attributes) -> io::Result<()>;
}
