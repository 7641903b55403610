// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEFAULT_BUFFER_CAPACITY, MIN_BUFFER_CAPACITY};
use std::time::Duration;

/// How long a lone `ESC` may wait for the rest of an escape sequence before it is
/// reported as the Escape key. Terminals send a whole sequence in one write, so a short
/// pause is plenty.
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

pub const DEFAULT_READER_THREAD_NAME: &str = "rawkeys-reader";

/// Settings for [`crate::start_reading_with()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Size of the decode buffer. Values below [`MIN_BUFFER_CAPACITY`] are raised.
    pub buffer_capacity: usize,
    pub escape_timeout: Duration,
    pub thread_name: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
            thread_name: DEFAULT_READER_THREAD_NAME.into(),
        }
    }
}

impl ReaderConfig {
    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(MIN_BUFFER_CAPACITY);
        self
    }

    #[must_use]
    pub fn with_escape_timeout(mut self, timeout: Duration) -> Self {
        self.escape_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
