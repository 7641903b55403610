// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io, sync::Arc, time::Duration};

/// Where the reader thread gets its bytes from. [`crate::TtyByteSource`] reads a real
/// terminal; tests script the chunks.
///
/// | `read_bytes()` returns            | Meaning                                       |
/// |:----------------------------------|:----------------------------------------------|
/// | `Ok(n)`, `n > 0`                  | `n` bytes were written to the front of `buf`  |
/// | `Ok(0)`                           | nothing yet (timeout, wake up, `EINTR`)       |
/// | `Err(e)`, `e.kind()` is `UnexpectedEof` | end of input, eg: the terminal hung up  |
/// | any other `Err`                   | fatal, the reader stops                       |
pub trait ByteSource: Send + 'static {
    /// Block until at least one byte is available, `timeout` elapses, or the read is
    /// interrupted. Never writes more than `buf.len()` bytes.
    ///
    /// # Errors
    ///
    /// See the table above.
    fn read_bytes(&mut self, buf: &mut [u8], timeout: Option<Duration>) -> io::Result<usize>;

    /// Handle that makes a blocked [`ByteSource::read_bytes()`] return `Ok(0)` early.
    /// Used on cancellation. Sources that never block for long can return [`None`].
    fn interrupter(&self) -> Option<ReadInterrupter> { None }
}

/// Wakes up a reader thread that is blocked polling its [`ByteSource`].
#[derive(Debug, Clone)]
pub struct ReadInterrupter(Arc<mio::Waker>);

impl ReadInterrupter {
    #[must_use]
    pub fn new(waker: Arc<mio::Waker>) -> Self { Self(waker) }

    /// # Errors
    ///
    /// If the underlying [`mio::Waker`] can't be signaled.
    pub fn interrupt(&self) -> io::Result<()> { self.0.wake() }
}
