// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Process wide record of the terminals that are currently in a raw mode session.
//! Entering raw mode twice on one terminal would capture the raw attributes as the
//! "original" ones, and the terminal could never be restored.

use super::DeviceKey;
use std::{collections::HashSet,
          sync::{LazyLock, Mutex, MutexGuard, PoisonError}};

static ACTIVE_SESSIONS: LazyLock<Mutex<HashSet<DeviceKey>>> =
    LazyLock::new(|| Mutex::new(HashSet::new()));

/// The set is only ever inserted into and removed from, so it stays consistent even if
/// a holder panicked.
fn active_sessions() -> MutexGuard<'static, HashSet<DeviceKey>> {
    ACTIVE_SESSIONS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Is a raw mode session active for this terminal right now?
#[must_use]
pub fn is_session_active(key: DeviceKey) -> bool { active_sessions().contains(&key) }

/// Exclusive claim on a terminal. Released on drop.
#[derive(Debug)]
pub(crate) struct SessionClaim {
    key: DeviceKey,
}

impl SessionClaim {
    /// [`None`] if another session holds the terminal.
    pub(crate) fn acquire(key: DeviceKey) -> Option<Self> {
        // The lock must be released before a claim exists, its drop locks again.
        let inserted = active_sessions().insert(key);
        inserted.then(|| SessionClaim { key })
    }
}

impl Drop for SessionClaim {
    fn drop(&mut self) { active_sessions().remove(&self.key); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_exclusive_until_dropped() {
        let key = DeviceKey {
            dev: u64::MAX,
            ino: 7_000_001,
        };
        let claim = SessionClaim::acquire(key);
        assert!(claim.is_some());
        assert!(is_session_active(key));
        assert!(SessionClaim::acquire(key).is_none());

        drop(claim);
        assert!(!is_session_active(key));
        assert!(SessionClaim::acquire(key).is_some());
    }

    #[test]
    fn test_rejected_claim_returns_promptly_and_keeps_holder() {
        let key = DeviceKey {
            dev: u64::MAX,
            ino: 7_000_002,
        };
        let held = SessionClaim::acquire(key).expect("first claim");

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let second = SessionClaim::acquire(key);
            tx.send(second.is_none()).unwrap();
        });
        let rejected = rx
            .recv_timeout(std::time::Duration::from_secs(2))
            .expect("second acquire didn't return");

        assert!(rejected);
        // The rejected attempt must not release the holder's key.
        assert!(is_session_active(key));
        drop(held);
        assert!(!is_session_active(key));
    }
}
