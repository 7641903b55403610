// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words FIONREAD EINTR epoll kqueue

//! [`ByteSource`] for a real terminal, built on [`mio`].
//!
//! The terminal descriptor and a [`mio::Waker`] are registered with one [`Poll`]. A
//! read blocks in [`Poll::poll()`] until the terminal is readable, the timeout elapses,
//! or the waker fires (cancellation).
//!
//! [`mio`] is edge triggered: a readiness event is reported once per arrival of new
//! data, not while data is waiting. Because a read may take fewer bytes than are
//! available (the decode buffer is small), the pending byte count is checked with
//! `FIONREAD` first and polling is skipped while bytes are already waiting.

use super::{ByteSource, ReadInterrupter};
use crate::ReaderError;
use mio::{Events, Interest, Poll, Token, Waker, unix::SourceFd};
use rustix::fd::{AsRawFd, BorrowedFd};
use std::{fs::File,
          io::{self, ErrorKind, Read as _},
          sync::Arc,
          time::Duration};

const TTY_TOKEN: Token = Token(0);
const WAKER_TOKEN: Token = Token(1);
const EVENTS_CAPACITY: usize = 4;

/// Reads a terminal through its own duplicate of the descriptor.
#[derive(Debug)]
pub struct TtyByteSource {
    file: File,
    poll_handle: Poll,
    ready_events_buffer: Events,
    waker: Arc<Waker>,
}

impl TtyByteSource {
    /// # Errors
    ///
    /// If the descriptor can't be duplicated, or mio can't create its poll instance or
    /// waker, or can't register the descriptor.
    pub fn new(fd: BorrowedFd<'_>) -> Result<Self, ReaderError> {
        let file = File::from(fd.try_clone_to_owned().map_err(ReaderError::DuplicateFd)?);

        // epoll on Linux, kqueue on macOS.
        let poll_handle = Poll::new().map_err(ReaderError::PollCreation)?;

        let waker = Waker::new(poll_handle.registry(), WAKER_TOKEN)
            .map_err(ReaderError::WakerCreation)?;

        poll_handle
            .registry()
            .register(
                &mut SourceFd(&file.as_raw_fd()),
                TTY_TOKEN,
                Interest::READABLE,
            )
            .map_err(ReaderError::Registration)?;

        Ok(Self {
            file,
            poll_handle,
            ready_events_buffer: Events::with_capacity(EVENTS_CAPACITY),
            waker: Arc::new(waker),
        })
    }

    fn pending_byte_count(&self) -> io::Result<u64> {
        Ok(rustix::io::ioctl_fionread(&self.file)?)
    }

    /// `true` if a read won't block: bytes are waiting, or the terminal hung up (the
    /// read then reports it).
    fn wait_until_readable(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        if self.pending_byte_count()? > 0 {
            return Ok(true);
        }

        match self.poll_handle.poll(&mut self.ready_events_buffer, timeout) {
            Ok(()) => {}
            // EINTR, the caller loops.
            Err(error) if error.kind() == ErrorKind::Interrupted => return Ok(false),
            Err(error) => return Err(error),
        }

        let mut tty_ready = false;
        let mut tty_closed = false;
        for event in &self.ready_events_buffer {
            if event.token() == TTY_TOKEN {
                tty_ready = true;
                tty_closed |= event.is_read_closed() || event.is_error();
            }
        }

        // A stale edge from data that an earlier read already consumed must not lead
        // to a blocking read.
        Ok(tty_closed || (tty_ready && self.pending_byte_count()? > 0))
    }
}

impl ByteSource for TtyByteSource {
    fn read_bytes(&mut self, buf: &mut [u8], timeout: Option<Duration>) -> io::Result<usize> {
        if buf.is_empty() || !self.wait_until_readable(timeout)? {
            return Ok(0);
        }
        match (&self.file).read(buf) {
            Ok(0) => Err(ErrorKind::UnexpectedEof.into()),
            Ok(count) => Ok(count),
            Err(error)
                if matches!(error.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) =>
            {
                Ok(0)
            }
            Err(error) => Err(error),
        }
    }

    fn interrupter(&self) -> Option<ReadInterrupter> {
        Some(ReadInterrupter::new(Arc::clone(&self.waker)))
    }
}
