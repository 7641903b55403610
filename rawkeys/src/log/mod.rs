// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Opt in [`tracing`] setup for programs built on this crate. The library only emits
//! events; it never installs a subscriber by itself.
//!
//! While the terminal is in raw mode, stdout belongs to the program's own output (and
//! `\n` no longer returns the carriage), so logging to a file is usually what you want.

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
pub use tracing_init::*;
