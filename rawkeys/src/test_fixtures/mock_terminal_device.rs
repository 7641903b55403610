// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DeviceKey, RawModeAttributes, TerminalDevice};
use std::{io,
          sync::{Mutex,
                 atomic::{AtomicU64, Ordering}}};

/// Every mock gets its own device key, so tests running in parallel never contend for
/// the same raw mode session.
static NEXT_MOCK_INODE: AtomicU64 = AtomicU64::new(1);

/// Stands in for a termios struct.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MockAttributes {
    pub raw: bool,
    pub echo: bool,
}

impl RawModeAttributes for MockAttributes {
    fn to_raw(&self) -> Self {
        MockAttributes {
            raw: true,
            echo: false,
        }
    }
}

/// In memory terminal with injectable failures. Every `set_attributes()` call is
/// recorded, including the ones that fail.
#[derive(Debug)]
pub struct MockTerminalDevice {
    key: DeviceKey,
    current: Mutex<MockAttributes>,
    fail_get: bool,
    /// Zero based index of the `set_attributes()` call that fails.
    fail_set_call: Option<usize>,
    set_calls: Mutex<Vec<MockAttributes>>,
}

impl Default for MockTerminalDevice {
    fn default() -> Self { Self::new() }
}

impl MockTerminalDevice {
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: DeviceKey {
                dev: 0,
                ino: NEXT_MOCK_INODE.fetch_add(1, Ordering::Relaxed),
            },
            current: Mutex::new(MockAttributes {
                raw: false,
                echo: true,
            }),
            fail_get: false,
            fail_set_call: None,
            set_calls: Mutex::new(vec![]),
        }
    }

    #[must_use]
    pub fn with_failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    /// Call `0` is entering raw mode, call `1` is restoring.
    #[must_use]
    pub fn with_failing_set_call(mut self, index: usize) -> Self {
        self.fail_set_call = Some(index);
        self
    }

    pub fn current(&self) -> MockAttributes { self.current.lock().unwrap().clone() }

    pub fn set_calls(&self) -> Vec<MockAttributes> { self.set_calls.lock().unwrap().clone() }
}

impl TerminalDevice for MockTerminalDevice {
    type Attributes = MockAttributes;

    fn device_key(&self) -> DeviceKey { self.key }

    fn get_attributes(&self) -> io::Result<MockAttributes> {
        if self.fail_get {
            return Err(rustix::io::Errno::NOTTY.into());
        }
        Ok(self.current())
    }

    fn set_attributes(&self, attributes: &MockAttributes) -> io::Result<()> {
        let mut set_calls = self.set_calls.lock().unwrap();
        let index = set_calls.len();
        set_calls.push(attributes.clone());
        if self.fail_set_call == Some(index) {
            return Err(rustix::io::Errno::IO.into());
        }
        *self.current.lock().unwrap() = attributes.clone();
        Ok(())
    }
}
