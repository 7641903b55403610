// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Scoped raw mode: enter, run a body, always restore.
//!
//! ```text
//! claim device ─▶ get attrs ─▶ set raw attrs ─▶ body ─▶ set original attrs ─▶ release
//!      │              │              │            │              │
//!      ▼              ▼              ▼            │              ▼
//!  SessionAlready  AttributeRead  AttributeWrite  │        AttributeWrite
//!  Active          Failed         Failed (Enter)  │        Failed (Restore)
//!  (Enter)         (Enter)                        ▼        + body outcome
//!                                        panic / cancelled future:
//!                                        restored on drop, error logged
//! ```
//!
//! Nothing is mutated before raw attributes are successfully installed, so an `Enter`
//! failure leaves the terminal exactly as it was.

use super::{RawModeAttributes, RawModeError, RawModeScopeError, SessionClaim,
            SessionPhase, TerminalDevice};
use crate::DeviceKey;
use std::future::Future;

/// Handle given to the body of a raw mode scope. Only valid while the body runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawModeSession {
    device_key: DeviceKey,
}

impl RawModeSession {
    #[must_use]
    pub fn device_key(&self) -> DeviceKey { self.device_key }
}

/// Run `body` with `device` in raw mode. The original attributes are restored
/// afterwards, whether the body returns `Ok`, returns `Err`, or panics.
///
/// # Errors
///
/// See [`RawModeScopeError`]. A restore failure is reported together with the body's
/// outcome, never instead of it.
pub fn with_raw_mode<D, T, E>(
    device: &D,
    body: impl FnOnce(&RawModeSession) -> Result<T, E>,
) -> Result<T, RawModeScopeError<T, E>>
where
    D: TerminalDevice,
{
    let guard = RawModeGuard::enter(device).map_err(RawModeScopeError::Enter)?;
    let body_outcome = body(&guard.session);
    combine(guard.restore(), body_outcome)
}

/// Async version of [`with_raw_mode()`], for bodies that consume a
/// [`crate::KeyCommandStream`]. If the returned future is dropped before it completes,
/// the attributes are restored on drop.
///
/// # Errors
///
/// See [`with_raw_mode()`].
pub async fn with_raw_mode_async<D, T, E, Fut>(
    device: &D,
    body: impl FnOnce(RawModeSession) -> Fut,
) -> Result<T, RawModeScopeError<T, E>>
where
    D: TerminalDevice,
    Fut: Future<Output = Result<T, E>>,
{
    let guard = RawModeGuard::enter(device).map_err(RawModeScopeError::Enter)?;
    let body_outcome = body(guard.session).await;
    combine(guard.restore(), body_outcome)
}

fn combine<T, E>(
    restore_result: Result<(), RawModeError>,
    body_outcome: Result<T, E>,
) -> Result<T, RawModeScopeError<T, E>> {
    match (restore_result, body_outcome) {
        (Ok(()), Ok(value)) => Ok(value),
        (Ok(()), Err(error)) => Err(RawModeScopeError::Body(error)),
        (Err(restore_error), body_outcome) => Err(RawModeScopeError::Restore {
            body_outcome,
            restore_error,
        }),
    }
}

/// Holds the original attributes while raw mode is on. [`RawModeGuard::restore()`] is
/// the normal exit; [`Drop`] covers panics and cancelled futures.
struct RawModeGuard<'a, D: TerminalDevice> {
    device: &'a D,
    original: Option<D::Attributes>,
    session: RawModeSession,
    /// Declared last: released after `drop()` has restored the attributes.
    _claim: SessionClaim,
}

impl<'a, D: TerminalDevice> RawModeGuard<'a, D> {
    fn enter(device: &'a D) -> Result<Self, RawModeError> {
        let device_key = device.device_key();

        let claim = SessionClaim::acquire(device_key)
            .ok_or(RawModeError::SessionAlreadyActive { device_key })?;

        let original = device
            .get_attributes()
            .map_err(|error| RawModeError::read_failed(SessionPhase::Enter, error))?;

        device
            .set_attributes(&original.to_raw())
            .map_err(|error| RawModeError::write_failed(SessionPhase::Enter, error))?;

        tracing::debug!(message = "raw mode entered", %device_key);

        Ok(Self {
            device,
            original: Some(original),
            session: RawModeSession { device_key },
            _claim: claim,
        })
    }

    fn restore(mut self) -> Result<(), RawModeError> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        let device_key = self.session.device_key;
        match self.device.set_attributes(&original) {
            Ok(()) => {
                tracing::debug!(message = "raw mode exited", %device_key);
                Ok(())
            }
            Err(error) => {
                let error = RawModeError::write_failed(SessionPhase::Restore, error);
                tracing::error!(message = "terminal not restored", %device_key, %error);
                Err(error)
            }
        }
    }
}

impl<D: TerminalDevice> Drop for RawModeGuard<'_, D> {
    fn drop(&mut self) {
        let Some(original) = self.original.take() else {
            return;
        };
        let device_key = self.session.device_key;
        tracing::warn!(
            message = "raw mode scope exited abnormally, restoring terminal",
            %device_key
        );
        if let Err(error) = self.device.set_attributes(&original) {
            tracing::error!(
                message = "terminal not restored after abnormal exit",
                %device_key,
                %error
            );
        }
    }
}
