// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios

//! Put a terminal in raw mode for the duration of a scope, and always put it back.
//!
//! In raw mode the terminal delivers every byte as soon as it is typed: no line
//! buffering, no echo, and `Ctrl+C` arrives as byte `0x03` instead of `SIGINT`. A
//! program that leaves the terminal in raw mode (crash, skipped cleanup) leaves the
//! user with a shell that doesn't echo, so restoring is the part that matters most.
//!
//! - [`with_raw_mode()`] and [`with_raw_mode_async()`] are the entry points.
//! - [`TerminalDevice`] abstracts `tcgetattr` / `tcsetattr`; [`TtyDevice`] implements
//!   it with [`rustix::termios`].

// Attach sources.
pub mod raw_mode_error;
pub mod raw_mode_scope;
pub mod session_registry;
pub mod terminal_device;
pub mod tty_device;

// Re-export.
pub use raw_mode_error::*;
pub use raw_mode_scope::*;
pub use session_registry::*;
pub use terminal_device::*;
pub use tty_device::*;
