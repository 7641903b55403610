// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Test doubles for the two boundaries the crate talks to: the terminal's attributes
//! ([`MockTerminalDevice`]) and its bytes ([`ScriptedByteSource`]).

// Attach sources.
pub mod mock_terminal_device;
pub mod scripted_byte_source;

// Re-export.
pub use mock_terminal_device::*;
pub use scripted_byte_source::*;
