// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios isatty fstat

use super::{DeviceKey, TerminalDevice};
use crate::{ReaderError, TtyByteSource};
use rustix::{fd::{AsFd, BorrowedFd},
             termios::{self, OptionalActions, Termios}};
use std::{fs::File,
          io::{self, IsTerminal}};

const DEV_TTY_PATH: &str = "/dev/tty";

/// How a [`TtyDevice`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TtyOrigin {
    /// A duplicate of stdin, which is a terminal.
    Stdin,
    /// `/dev/tty`, because stdin is redirected (eg: `echo data | app`).
    DevTty,
    /// Supplied by the caller via [`TtyDevice::from_file()`].
    Other,
}

/// A terminal, owned through its own file descriptor.
#[derive(Debug)]
pub struct TtyDevice {
    file: File,
    origin: TtyOrigin,
    key: DeviceKey,
}

impl TtyDevice {
    /// The controlling terminal: stdin if it is a tty, else `/dev/tty`.
    ///
    /// # Errors
    ///
    /// If stdin isn't a tty and `/dev/tty` can't be opened (eg: no controlling
    /// terminal), or if `fstat` fails on the descriptor.
    pub fn open() -> io::Result<Self> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            let file = File::from(stdin.as_fd().try_clone_to_owned()?);
            Self::with_origin(file, TtyOrigin::Stdin)
        } else {
            let file = File::options().read(true).write(true).open(DEV_TTY_PATH)?;
            Self::with_origin(file, TtyOrigin::DevTty)
        }
    }

    /// Wrap an already open terminal, eg: the follower side of a pty. Whether it really
    /// is a terminal is only checked when attributes are read.
    ///
    /// # Errors
    ///
    /// If `fstat` fails on the descriptor.
    pub fn from_file(file: File) -> io::Result<Self> {
        Self::with_origin(file, TtyOrigin::Other)
    }

    fn with_origin(file: File, origin: TtyOrigin) -> io::Result<Self> {
        let stat = rustix::fs::fstat(&file)?;
        // The field types differ between platforms.
        #[allow(
            trivial_numeric_casts,
            clippy::cast_sign_loss,
            clippy::unnecessary_cast
        )]
        let key = DeviceKey {
            dev: stat.st_dev as u64,
            ino: stat.st_ino as u64,
        };
        tracing::debug!(message = "tty device opened", %origin, %key);
        Ok(Self { file, origin, key })
    }

    #[must_use]
    pub fn origin(&self) -> TtyOrigin { self.origin }

    #[must_use]
    pub fn as_file(&self) -> &File { &self.file }

    /// A [`crate::ByteSource`] reading from this terminal, for
    /// [`crate::start_reading()`].
    ///
    /// # Errors
    ///
    /// See [`TtyByteSource::new()`].
    pub fn byte_source(&self) -> Result<TtyByteSource, ReaderError> {
        TtyByteSource::new(self.as_fd())
    }
}

impl AsFd for TtyDevice {
    fn as_fd(&self) -> BorrowedFd<'_> { self.file.as_fd() }
}

impl TerminalDevice for TtyDevice {
    type Attributes = Termios;

    fn device_key(&self) -> DeviceKey { self.key }

    fn get_attributes(&self) -> io::Result<Termios> {
        Ok(termios::tcgetattr(&self.file)?)
    }

    fn set_attributes(&self, attributes: &Termios) -> io::Result<()> {
        Ok(termios::tcsetattr(
            &self.file,
            OptionalActions::Now,
            attributes,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_regular_file_is_not_a_terminal() {
        let file = tempfile::tempfile().expect("create temp file");
        let device = TtyDevice::from_file(file).expect("fstat temp file");
        assert_eq!(device.origin(), TtyOrigin::Other);

        let error = device.get_attributes().expect_err("a file has no termios");
        assert_eq!(error.raw_os_error(), Some(rustix::io::Errno::NOTTY.raw_os_error()));
    }

    #[test]
    fn test_same_file_same_key() {
        let file = tempfile::tempfile().expect("create temp file");
        let clone = file.try_clone().expect("dup");
        let first = TtyDevice::from_file(file).expect("fstat");
        let second = TtyDevice::from_file(clone).expect("fstat");
        assert_eq!(first.device_key(), second.device_key());
    }
}
