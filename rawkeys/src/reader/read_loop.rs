// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The body of the reader thread.
//!
//! ```text
//! ┌──▶ cancelled? ── yes ──▶ exit
//! │       │ no
//! │       ▼
//! │    read into the buffer's free tail   (timeout only while ESC is ambiguous)
//! │       │
//! │       ▼
//! │    decode ─▶ classify ─▶ send   (repeat until the decoder needs more bytes,
//! │       │                          cancellation is checked before every send)
//! └───────┘
//! ```
//!
//! End of input and read errors flush the buffer with `more == false` (so a pending
//! `ESC` becomes the Escape key) before the loop exits.

use super::{ByteSource, DEBUG_RAWKEYS_SHOW_READER, ReaderConfig};
use crate::{DecodeBuffer, KeyCommand, classify};
use std::{io::ErrorKind,
          sync::atomic::{AtomicBool, Ordering},
          time::Instant};

pub type KeyCommandSender = tokio::sync::mpsc::UnboundedSender<KeyCommand>;
pub type KeyCommandReceiver = tokio::sync::mpsc::UnboundedReceiver<KeyCommand>;

/// Why the reader thread stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadLoopExit {
    Cancelled,
    /// The [`crate::KeyCommandStream`] was dropped.
    ReceiverDropped,
    EndOfInput,
    ReadError(ErrorKind),
}

pub(crate) fn run_read_loop(
    mut source: impl ByteSource,
    config: &ReaderConfig,
    cancelled: &AtomicBool,
    tx: &KeyCommandSender,
) -> ReadLoopExit {
    let mut buffer = DecodeBuffer::with_capacity(config.buffer_capacity);
    // Set when an ambiguous prefix first shows up, kept across reads that return early.
    let mut escape_deadline: Option<Instant> = None;

    loop {
        if cancelled.load(Ordering::Acquire) {
            return ReadLoopExit::Cancelled;
        }

        escape_deadline = if buffer.has_ambiguous_prefix() {
            Some(escape_deadline.unwrap_or_else(|| Instant::now() + config.escape_timeout))
        } else {
            None
        };
        let timeout =
            escape_deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()));

        match source.read_bytes(buffer.spare_capacity_mut(), timeout) {
            Ok(count) => {
                DEBUG_RAWKEYS_SHOW_READER.then(|| {
                    tracing::debug!(message = "reader: read bytes", bytes_read = count);
                });
                buffer.commit(count);
                // The pending prefix is complete as it is only once the deadline has
                // passed. An empty read can also be `EINTR` or a spurious wake up.
                let more = count > 0
                    || escape_deadline.is_none_or(|deadline| Instant::now() < deadline);
                if let Some(exit) = publish_tokens(&mut buffer, more, cancelled, tx) {
                    return exit;
                }
            }
            Err(error) => {
                let exit = if error.kind() == ErrorKind::UnexpectedEof {
                    tracing::debug!(message = "reader: end of input");
                    ReadLoopExit::EndOfInput
                } else {
                    tracing::warn!(message = "reader: read failed", %error);
                    ReadLoopExit::ReadError(error.kind())
                };
                return publish_tokens(&mut buffer, false, cancelled, tx).unwrap_or(exit);
            }
        }
    }
}

/// Decode and send every complete token in `buffer`. Returns an exit reason if the
/// loop must stop.
fn publish_tokens(
    buffer: &mut DecodeBuffer,
    more: bool,
    cancelled: &AtomicBool,
    tx: &KeyCommandSender,
) -> Option<ReadLoopExit> {
    while let Some(unit) = buffer.decode(more) {
        if cancelled.load(Ordering::Acquire) {
            return Some(ReadLoopExit::Cancelled);
        }
        let command = classify(unit);
        DEBUG_RAWKEYS_SHOW_READER.then(|| {
            tracing::debug!(message = "reader: key command", %command);
        });
        if tx.send(command).is_err() {
            return Some(ReadLoopExit::ReceiverDropped);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_BUFFER_CAPACITY, Direction, ModifierKeysMask,
                test_fixtures::{ScriptStep, ScriptedByteSource}};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn run(source: ScriptedByteSource) -> (ReadLoopExit, Vec<KeyCommand>) {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let cancelled = AtomicBool::new(false);
        let exit = run_read_loop(source, &ReaderConfig::default(), &cancelled, &tx);
        drop(tx);
        let mut commands = vec![];
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        (exit, commands)
    }

    #[test]
    fn test_end_of_input() {
        let (exit, commands) = run(ScriptedByteSource::new([b"ab\r".to_vec()]));
        assert_eq!(exit, ReadLoopExit::EndOfInput);
        assert_eq!(
            commands,
            vec![
                KeyCommand::Char('a'),
                KeyCommand::Char('b'),
                KeyCommand::Return
            ]
        );
    }

    #[test]
    fn test_every_split_of_ctrl_left() {
        let bytes = b"\x1b[1;5D";
        let ctrl_left =
            KeyCommand::arrow_with(Direction::Left, ModifierKeysMask::new().with_ctrl());
        for split in 1..bytes.len() {
            let source =
                ScriptedByteSource::new([bytes[..split].to_vec(), bytes[split..].to_vec()]);
            let (_, commands) = run(source);
            assert_eq!(commands, vec![ctrl_left.clone()], "split at {split}");
        }
    }

    #[test]
    fn test_escape_resolved_by_quiet_read() {
        // The empty chunk is a read that timed out with nothing.
        let source = ScriptedByteSource::new([vec![0x1B], vec![], b"x".to_vec()]);
        let (_, commands) = run(source);
        assert_eq!(commands, vec![KeyCommand::Escape, KeyCommand::Char('x')]);
    }

    #[test]
    fn test_early_empty_reads_keep_escape_pending() {
        let source = ScriptedByteSource::new([
            ScriptStep::Bytes(vec![0x1B]),
            ScriptStep::WokeEarly,
            ScriptStep::WokeEarly,
            ScriptStep::Bytes(b"[A".to_vec()),
        ]);
        let (_, commands) = run(source);
        assert_eq!(commands, vec![KeyCommand::arrow(Direction::Up)]);
    }

    #[test]
    fn test_deadline_survives_early_empty_reads() {
        let source = ScriptedByteSource::new([
            ScriptStep::Bytes(vec![0x1B]),
            ScriptStep::WokeEarly,
            ScriptStep::TimedOut,
            ScriptStep::Bytes(b"x".to_vec()),
        ]);
        let started = Instant::now();
        let (_, commands) = run(source);
        assert_eq!(commands, vec![KeyCommand::Escape, KeyCommand::Char('x')]);
        // One escape timeout in total, not one per read.
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(started.elapsed() >= ReaderConfig::default().escape_timeout);
    }

    #[test]
    fn test_escape_followed_by_sequence_in_next_read() {
        let source = ScriptedByteSource::new([vec![0x1B], b"[A".to_vec()]);
        let (_, commands) = run(source);
        assert_eq!(commands, vec![KeyCommand::arrow(Direction::Up)]);
    }

    #[test]
    fn test_pending_escape_flushed_at_end_of_input() {
        let (exit, commands) = run(ScriptedByteSource::new([vec![0x1B]]));
        assert_eq!(exit, ReadLoopExit::EndOfInput);
        assert_eq!(commands, vec![KeyCommand::Escape]);
    }

    #[test]
    fn test_read_error_ends_loop_after_flush() {
        let source = ScriptedByteSource::new([b"q".to_vec()])
            .failing_when_exhausted(ErrorKind::PermissionDenied);
        let (exit, commands) = run(source);
        assert_eq!(exit, ReadLoopExit::ReadError(ErrorKind::PermissionDenied));
        assert_eq!(commands, vec![KeyCommand::Char('q')]);
    }

    #[test]
    fn test_overflow_resyncs() {
        // Exactly fills the buffer, and never terminates.
        let mut flood = b"\x1b[".to_vec();
        flood.resize(DEFAULT_BUFFER_CAPACITY, b'9');
        let source = ScriptedByteSource::new([flood, b"\x1b[B".to_vec()]);
        let (_, commands) = run(source);
        assert_eq!(commands, vec![KeyCommand::arrow(Direction::Down)]);
    }

    #[test]
    fn test_split_multi_byte_char() {
        let heart = "♥".as_bytes();
        let source = ScriptedByteSource::new([heart[..1].to_vec(), heart[1..].to_vec()]);
        let (_, commands) = run(source);
        assert_eq!(commands, vec![KeyCommand::Char('♥')]);
    }

    #[test]
    fn test_cancelled_before_first_read() {
        let source = ScriptedByteSource::new([b"abc".to_vec()]);
        let reads = source.read_counter();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let cancelled = AtomicBool::new(true);

        let exit = run_read_loop(source, &ReaderConfig::default(), &cancelled, &tx);

        assert_eq!(exit, ReadLoopExit::Cancelled);
        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_receiver_dropped() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let cancelled = AtomicBool::new(false);
        let exit = run_read_loop(
            ScriptedByteSource::new([b"a".to_vec()]),
            &ReaderConfig::default(),
            &cancelled,
            &tx,
        );
        assert_eq!(exit, ReadLoopExit::ReceiverDropped);
    }
}
