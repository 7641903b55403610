// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Bytes to tokens. [`DecodeBuffer`] cuts [`InputUnit`]s out of the raw byte stream, and
//! [`parse_escape_sequence()`] makes sense of the escape sequence tokens.

// Attach sources.
pub mod constants;
pub mod decode_buffer;
pub mod escape_sequence;
pub mod input_unit;

// Re-export.
pub use constants::*;
pub use decode_buffer::*;
pub use escape_sequence::*;
pub use input_unit::*;
