// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod classifier;
pub mod key_command;
pub mod modifier_keys_mask;

// Re-export.
pub use classifier::*;
pub use key_command::*;
pub use modifier_keys_mask::*;
