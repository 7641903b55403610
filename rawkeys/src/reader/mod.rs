// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Continuous reading: a background thread turns terminal bytes into a
//! [`KeyCommandStream`].

// Attach sources.
pub mod byte_source;
pub mod key_command_stream;
pub mod read_loop;
pub mod reader_config;
pub mod reader_error;
pub mod tty_byte_source;

// Re-export.
pub use byte_source::*;
pub use key_command_stream::*;
pub use read_loop::*;
pub use reader_config::*;
pub use reader_error::*;
pub use tty_byte_source::*;

/// Log every read and every published command. Very noisy, so off by default.
pub const DEBUG_RAWKEYS_SHOW_READER: bool = false;
