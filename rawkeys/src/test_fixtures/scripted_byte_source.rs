// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::ByteSource;
use std::{collections::VecDeque,
          io::{self, ErrorKind},
          sync::{Arc,
                 atomic::{AtomicUsize, Ordering}},
          time::Duration};

/// Longest an idle read sleeps, keeps cancellation tests fast.
const IDLE_READ_DURATION: Duration = Duration::from_millis(5);

/// What a [`ScriptedByteSource`] does once every step has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenExhausted {
    EndOfInput,
    /// Keep returning `Ok(0)` after a short sleep, like a terminal nobody types into.
    Idle,
    Fail(ErrorKind),
}

/// One scripted read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Bytes(Vec<u8>),
    /// Nothing arrives: sleeps for the whole timeout, then `Ok(0)`.
    TimedOut,
    /// `Ok(0)` right away, like `EINTR` or a stale readiness event.
    WokeEarly,
}

/// An empty chunk is a read that timed out.
impl From<Vec<u8>> for ScriptStep {
    fn from(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            ScriptStep::TimedOut
        } else {
            ScriptStep::Bytes(bytes)
        }
    }
}

/// Replays [`ScriptStep`]s, one per read. A chunk larger than the caller's buffer is
/// split across reads.
#[derive(Debug)]
pub struct ScriptedByteSource {
    steps: VecDeque<ScriptStep>,
    when_exhausted: WhenExhausted,
    read_count: Arc<AtomicUsize>,
}

impl ScriptedByteSource {
    pub fn new(steps: impl IntoIterator<Item = impl Into<ScriptStep>>) -> Self {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
            when_exhausted: WhenExhausted::EndOfInput,
            read_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn idle_when_exhausted(mut self) -> Self {
        self.when_exhausted = WhenExhausted::Idle;
        self
    }

    #[must_use]
    pub fn failing_when_exhausted(mut self, kind: ErrorKind) -> Self {
        self.when_exhausted = WhenExhausted::Fail(kind);
        self
    }

    /// Number of `read_bytes()` calls so far, readable after the source moved into
    /// the reader thread.
    pub fn read_counter(&self) -> Arc<AtomicUsize> { Arc::clone(&self.read_count) }
}

impl ByteSource for ScriptedByteSource {
    fn read_bytes(&mut self, buf: &mut [u8], timeout: Option<Duration>) -> io::Result<usize> {
        self.read_count.fetch_add(1, Ordering::SeqCst);

        match self.steps.pop_front() {
            Some(ScriptStep::Bytes(mut chunk)) => {
                let count = chunk.len().min(buf.len());
                buf[..count].copy_from_slice(&chunk[..count]);
                if count < chunk.len() {
                    self.steps
                        .push_front(ScriptStep::Bytes(chunk.split_off(count)));
                }
                Ok(count)
            }
            Some(ScriptStep::TimedOut) => {
                if let Some(timeout) = timeout {
                    std::thread::sleep(timeout);
                }
                Ok(0)
            }
            Some(ScriptStep::WokeEarly) => Ok(0),
            None => match self.when_exhausted {
                WhenExhausted::EndOfInput => Err(ErrorKind::UnexpectedEof.into()),
                WhenExhausted::Idle => {
                    std::thread::sleep(
                        timeout.map_or(IDLE_READ_DURATION, |it| it.min(IDLE_READ_DURATION)),
                    );
                    Ok(0)
                }
                WhenExhausted::Fail(kind) => Err(kind.into()),
            },
        }
    }
}
