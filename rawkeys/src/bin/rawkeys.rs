// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Prints every key command decoded from the terminal until `Q` is pressed.
//!
//! ```text
//! cargo run --bin rawkeys -- --log-level trace
//! tail -f rawkeys.log
//! ```

use clap::{Parser, ValueEnum};
use futures_util::StreamExt;
use miette::IntoDiagnostic;
use r3bl_rawkeys::{DEFAULT_LOG_FILE_PATH, KeyCommand, ReaderConfig, TracingConfig,
                   TtyDevice, start_reading_with, with_raw_mode_async};
use std::{io::Write as _, time::Duration};
use tracing_core::LevelFilter;

const EXIT_CHAR: char = 'Q';

#[derive(Debug, Parser)]
#[command(bin_name = "rawkeys")]
#[command(about = "⌨️  Show the key commands your terminal sends, press `Q` to quit")]
#[command(version)]
#[command(next_line_help = true)]
/// More info: <https://docs.rs/clap/latest/clap/_derive/#overview>
pub struct CLIArg {
    #[arg(
        long,
        short = 'f',
        default_value = DEFAULT_LOG_FILE_PATH,
        help = "File to log to, the terminal itself is busy"
    )]
    pub log_file: String,

    #[arg(long, short = 'l', value_enum, default_value_t = LogLevel::Debug)]
    pub log_level: LogLevel,

    #[arg(long, short = 'n', help = "Don't log at all")]
    pub no_log: bool,

    #[arg(
        long,
        value_name = "MILLIS",
        default_value_t = 50,
        help = "How long a lone ESC waits for the rest of an escape sequence"
    )]
    pub escape_timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();

    let tracing_config = if cli_arg.no_log {
        TracingConfig::disabled()
    } else {
        TracingConfig::new_file(Some(cli_arg.log_file.clone()), cli_arg.log_level.into())
    };
    tracing_config.install_global()?;

    let device = TtyDevice::open().into_diagnostic()?;
    tracing::info!(message = "starting", origin = %device.origin(), ?cli_arg);

    let reader_config = ReaderConfig::default()
        .with_escape_timeout(Duration::from_millis(cli_arg.escape_timeout));

    println!("Type away. Press `{EXIT_CHAR}` to quit.");

    let device_ref = &device;
    let key_count = with_raw_mode_async(device_ref, |_session| async move {
        let mut stream = start_reading_with(device_ref.byte_source()?, reader_config)?;
        let mut stdout = std::io::stdout();
        let mut key_count = 0_usize;

        while let Some(command) = stream.next().await {
            if command == KeyCommand::Char(EXIT_CHAR) {
                break;
            }
            key_count += 1;
            // Raw mode: `\n` doesn't return the carriage.
            let written = match command.word_movement() {
                Some(direction) => write!(stdout, "{command} (word {direction})\r\n"),
                None => write!(stdout, "{command}\r\n"),
            };
            written.into_diagnostic()?;
            stdout.flush().into_diagnostic()?;
        }

        stream.cancel();
        Ok::<_, miette::Report>(key_count)
    })
    .await
    .map_err(|error| miette::miette!("{error}"))?;

    println!("Read {key_count} key commands.");
    Ok(())
}
