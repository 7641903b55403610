// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Start the reader thread and consume its output as an async [`Stream`].
//!
//! ```text
//! ┌───────────────────────────┐        ┌──────────────────────────────┐
//! │ reader thread             │        │ async consumer               │
//! │ (std::thread, blocking)   │        │                              │
//! │                           │ mpsc   │ while let Some(cmd) =        │
//! │ read ─▶ decode ─▶ classify│───────▶│     stream.next().await { }  │
//! │ checks the cancel flag    │        │                              │
//! └───────────────────────────┘        └──────────────────────────────┘
//!             ▲                                       │
//!             └──── cancel flag + read interrupter ───┘
//! ```
//!
//! The thread is the only owner of the decode buffer. The async side never blocks: it
//! just awaits the unbounded channel, which is cancel safe in `tokio::select!`.

use super::{ByteSource, DEBUG_RAWKEYS_SHOW_READER, KeyCommandReceiver, ReadInterrupter,
            ReadLoopExit, ReaderConfig, run_read_loop};
use crate::{KeyCommand, ReaderError};
use futures_core::Stream;
use std::{pin::Pin,
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}},
          task::{Context, Poll},
          thread::JoinHandle};

/// Start reading with [`ReaderConfig::default()`].
///
/// # Errors
///
/// If the reader thread can't be spawned.
pub fn start_reading(source: impl ByteSource) -> Result<KeyCommandStream, ReaderError> {
    start_reading_with(source, ReaderConfig::default())
}

/// Spawn a reader thread that owns `source` and publishes [`KeyCommand`]s, in the
/// order their bytes arrived, to the returned stream.
///
/// # Errors
///
/// If the reader thread can't be spawned.
pub fn start_reading_with(
    source: impl ByteSource,
    config: ReaderConfig,
) -> Result<KeyCommandStream, ReaderError> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let cancel_handle = CancelHandle {
        cancelled: Arc::new(AtomicBool::new(false)),
        interrupter: source.interrupter(),
    };
    let cancelled = Arc::clone(&cancel_handle.cancelled);

    let thread_name = config.thread_name.clone();
    let reader_thread = std::thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            let exit = run_read_loop(source, &config, &cancelled, &tx);
            tracing::debug!(message = "reader thread exited", ?exit);
            exit
        })
        .map_err(ReaderError::ThreadSpawn)?;

    DEBUG_RAWKEYS_SHOW_READER.then(|| {
        tracing::debug!(message = "reader thread started", %thread_name);
    });

    Ok(KeyCommandStream {
        rx,
        cancel_handle,
        reader_thread: Some(reader_thread),
    })
}

/// Stops a reader from anywhere, eg: a signal handler task. Cloneable.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    interrupter: Option<ReadInterrupter>,
}

impl CancelHandle {
    /// Idempotent. The reader stops at its next check; a read that is blocked waiting
    /// for input is woken up if the source supports it.
    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(interrupter) = &self.interrupter
            && let Err(error) = interrupter.interrupt()
        {
            tracing::warn!(message = "failed to wake reader thread", %error);
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool { self.cancelled.load(Ordering::Acquire) }
}

/// Live, ordered sequence of [`KeyCommand`]s from a reader thread.
///
/// Ends (yields [`None`]) when the input ends, or as soon as it is cancelled: commands
/// that were already queued are not delivered after cancellation. Dropping the stream
/// cancels the reader.
#[derive(Debug)]
pub struct KeyCommandStream {
    rx: KeyCommandReceiver,
    cancel_handle: CancelHandle,
    reader_thread: Option<JoinHandle<ReadLoopExit>>,
}

impl KeyCommandStream {
    pub fn cancel(&mut self) {
        self.cancel_handle.cancel();
        self.rx.close();
    }

    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle { self.cancel_handle.clone() }

    #[must_use]
    pub fn is_cancelled(&self) -> bool { self.cancel_handle.is_cancelled() }

    /// Has the reader thread exited?
    #[must_use]
    pub fn is_reader_finished(&self) -> bool {
        self.reader_thread
            .as_ref()
            .is_none_or(JoinHandle::is_finished)
    }

    /// Block until the reader thread exits and return why it did. [`None`] if it was
    /// already joined, or panicked. Cancel first, unless the input is known to end.
    pub fn join_reader(&mut self) -> Option<ReadLoopExit> {
        self.reader_thread.take()?.join().ok()
    }
}

impl Stream for KeyCommandStream {
    type Item = KeyCommand;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<KeyCommand>> {
        let this = self.get_mut();
        if this.cancel_handle.is_cancelled() {
            return Poll::Ready(None);
        }
        this.rx.poll_recv(cx)
    }
}

impl Drop for KeyCommandStream {
    fn drop(&mut self) { self.cancel_handle.cancel(); }
}
