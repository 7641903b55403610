// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words errno termios

use super::DeviceKey;
use miette::Diagnostic;
use std::{fmt::{Debug, Display, Formatter, Result as FmtResult},
          io};

/// Which terminal attribute syscall failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum AttributeOp {
    /// `tcgetattr`.
    Get,
    /// `tcsetattr`.
    Set,
}

/// Where in the raw mode session a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionPhase {
    /// Capturing the original attributes and installing raw mode. Nothing is left to
    /// undo when this fails.
    Enter,
    /// Putting the original attributes back after the body ran. The terminal may still
    /// be in raw mode when this fails.
    Restore,
}

/// Failure to enter or leave raw mode.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum RawModeError {
    #[error("Failed to read terminal attributes during {phase} (errno {errno:?})")]
    #[diagnostic(
        code(r3bl_rawkeys::raw_mode::attribute_read_failed),
        help("Raw mode needs a terminal. Is the descriptor a pipe or a regular file?")
    )]
    AttributeReadFailed {
        phase: SessionPhase,
        errno: Option<i32>,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write terminal attributes during {phase} (errno {errno:?})")]
    #[diagnostic(
        code(r3bl_rawkeys::raw_mode::attribute_write_failed),
        help(
            "If this happened during restore the terminal may still be in raw mode - \
             run `reset` or `stty sane` to recover it"
        )
    )]
    AttributeWriteFailed {
        phase: SessionPhase,
        errno: Option<i32>,
        #[source]
        source: io::Error,
    },

    #[error("A raw mode session is already active for terminal {device_key}")]
    #[diagnostic(
        code(r3bl_rawkeys::raw_mode::session_already_active),
        help("Only one raw mode session per terminal is supported, end the other first")
    )]
    SessionAlreadyActive { device_key: DeviceKey },
}

impl RawModeError {
    pub(crate) fn read_failed(phase: SessionPhase, source: io::Error) -> Self {
        RawModeError::AttributeReadFailed {
            phase,
            errno: source.raw_os_error(),
            source,
        }
    }

    pub(crate) fn write_failed(phase: SessionPhase, source: io::Error) -> Self {
        RawModeError::AttributeWriteFailed {
            phase,
            errno: source.raw_os_error(),
            source,
        }
    }

    /// The syscall that failed, [`None`] for [`RawModeError::SessionAlreadyActive`].
    #[must_use]
    pub fn operation(&self) -> Option<AttributeOp> {
        match self {
            RawModeError::AttributeReadFailed { .. } => Some(AttributeOp::Get),
            RawModeError::AttributeWriteFailed { .. } => Some(AttributeOp::Set),
            RawModeError::SessionAlreadyActive { .. } => None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self {
            RawModeError::AttributeReadFailed { phase, .. }
            | RawModeError::AttributeWriteFailed { phase, .. } => *phase,
            RawModeError::SessionAlreadyActive { .. } => SessionPhase::Enter,
        }
    }

    #[must_use]
    pub fn errno(&self) -> Option<i32> {
        match self {
            RawModeError::AttributeReadFailed { errno, .. }
            | RawModeError::AttributeWriteFailed { errno, .. } => *errno,
            RawModeError::SessionAlreadyActive { .. } => None,
        }
    }
}

/// Failure of a [`with_raw_mode()`] scope. `T` and `E` are the body's success and error
/// types.
///
/// | Variant     | Body ran? | Terminal restored? |
/// |:------------|:----------|:-------------------|
/// | `Enter`     | no        | nothing to restore |
/// | `Body`      | yes       | yes                |
/// | `Restore`   | yes       | no                 |
///
/// A restore failure never hides what the body did: `body_outcome` holds the body's
/// result, success or error.
///
/// [`with_raw_mode()`]: super::with_raw_mode
pub enum RawModeScopeError<T, E> {
    Enter(RawModeError),
    Body(E),
    Restore {
        body_outcome: Result<T, E>,
        restore_error: RawModeError,
    },
}

impl<T, E> RawModeScopeError<T, E> {
    /// The attribute error, if this isn't a plain body error.
    #[must_use]
    pub fn raw_mode_error(&self) -> Option<&RawModeError> {
        match self {
            RawModeScopeError::Enter(error)
            | RawModeScopeError::Restore {
                restore_error: error,
                ..
            } => Some(error),
            RawModeScopeError::Body(_) => None,
        }
    }

    /// The body's error, whether or not restore succeeded.
    #[must_use]
    pub fn body_error(&self) -> Option<&E> {
        match self {
            RawModeScopeError::Body(error)
            | RawModeScopeError::Restore {
                body_outcome: Err(error),
                ..
            } => Some(error),
            _ => None,
        }
    }
}

impl<T, E: Debug> Debug for RawModeScopeError<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RawModeScopeError::Enter(error) => f.debug_tuple("Enter").field(error).finish(),
            RawModeScopeError::Body(error) => f.debug_tuple("Body").field(error).finish(),
            RawModeScopeError::Restore {
                body_outcome,
                restore_error,
            } => f
                .debug_struct("Restore")
                .field("body_outcome", &body_outcome.as_ref().map(|_| "Ok(..)"))
                .field("restore_error", restore_error)
                .finish(),
        }
    }
}

impl<T, E: Display> Display for RawModeScopeError<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RawModeScopeError::Enter(error) => write!(f, "Could not enter raw mode: {error}"),
            RawModeScopeError::Body(error) => write!(f, "{error}"),
            RawModeScopeError::Restore {
                body_outcome: Ok(_),
                restore_error,
            } => write!(f, "Could not restore terminal: {restore_error}"),
            RawModeScopeError::Restore {
                body_outcome: Err(body_error),
                restore_error,
            } => write!(
                f,
                "{body_error}; additionally could not restore terminal: {restore_error}"
            ),
        }
    }
}

impl<T, E> std::error::Error for RawModeScopeError<T, E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RawModeScopeError::Enter(error)
            | RawModeScopeError::Restore {
                restore_error: error,
                ..
            } => Some(error),
            RawModeScopeError::Body(error) => Some(error),
        }
    }
}
