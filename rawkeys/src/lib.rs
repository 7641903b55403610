// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios xterm

//! # `r3bl_rawkeys`
//!
//! Turn the raw byte stream coming from an interactive terminal into a sequence of
//! typed [`KeyCommand`]s, and manage the terminal's raw mode while you do it.
//!
//! ## Pipeline
//!
//! ```text
//! tty fd bytes
//!    │
//!    ▼
//! reader thread  (mio poll on the fd + a cancellation waker)
//!    │ appends into a fixed capacity DecodeBuffer
//!    ▼
//! DecodeBuffer::decode()      ──▶ InputUnit   (one token per call)
//!    │
//!    ▼
//! classify()                  ──▶ KeyCommand  (CSI payloads go to parse_escape_sequence)
//!    │
//!    ▼
//! KeyCommandStream            (async, in order, cancellable)
//! ```
//!
//! [`with_raw_mode()`] and [`with_raw_mode_async()`] wrap all of this. They capture the
//! terminal attributes, put the terminal in raw mode, run your body, and always attempt
//! to restore the original attributes afterwards.
//!
//! ## Example
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use miette::IntoDiagnostic;
//! use r3bl_rawkeys::{KeyCommand, TtyDevice, start_reading, with_raw_mode_async};
//!
//! # async fn run() -> miette::Result<()> {
//! let device = TtyDevice::open().into_diagnostic()?;
//! let device_ref = &device;
//! with_raw_mode_async(device_ref, |_session| async move {
//!     let mut stream = start_reading(device_ref.byte_source()?)?;
//!     while let Some(command) = stream.next().await {
//!         if command == KeyCommand::Terminate {
//!             break;
//!         }
//!         print!("{command}\r\n");
//!     }
//!     Ok::<_, miette::Report>(())
//! })
//! .await
//! .map_err(|error| miette::miette!("{error}"))?;
//! # Ok(())
//! # }
//! ```
//!
//! See `src/bin/rawkeys.rs` for a complete program.

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod keys;
pub mod log;
pub mod parser;
pub mod raw_mode;
pub mod reader;

#[cfg(test)]
pub mod test_fixtures;

// Re-export.
pub use keys::*;
pub use log::*;
pub use parser::*;
pub use raw_mode::*;
pub use reader::*;
