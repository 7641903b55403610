// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;
use std::io;

/// Failure to start reading. Once the reader thread runs, problems end the stream
/// instead (see [`crate::ReadLoopExit`]).
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ReaderError {
    #[error("Failed to duplicate the terminal file descriptor")]
    #[diagnostic(
        code(r3bl_rawkeys::reader::duplicate_fd),
        help("This usually means the process ran out of file descriptors")
    )]
    DuplicateFd(#[source] io::Error),

    #[error("Failed to create mio::Poll")]
    #[diagnostic(
        code(r3bl_rawkeys::reader::poll_creation),
        help("This usually means the system ran out of file descriptors")
    )]
    PollCreation(#[source] io::Error),

    #[error("Failed to create mio::Waker")]
    #[diagnostic(
        code(r3bl_rawkeys::reader::waker_creation),
        help("Check OS resource limits - use `ulimit -n` for file descriptors")
    )]
    WakerCreation(#[source] io::Error),

    #[error("Failed to register the terminal with mio")]
    #[diagnostic(
        code(r3bl_rawkeys::reader::registration),
        help("Ensure the descriptor is an open terminal, not a regular file")
    )]
    Registration(#[source] io::Error),

    #[error("Failed to spawn the reader thread")]
    #[diagnostic(
        code(r3bl_rawkeys::reader::thread_spawn),
        help(
            "The system may have reached its thread limit - \
             check `ulimit -u` for per-user limit"
        )
    )]
    ThreadSpawn(#[source] io::Error),
}
