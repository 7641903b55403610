// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig, WriterConfig, rolling_file_appender_impl};
use miette::IntoDiagnostic;
use tracing::dispatcher::DefaultGuard;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_thread_names(true)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

impl TracingConfig {
    /// Install as the global default subscriber. Once set, it can't be changed, so this
    /// is for programs, not tests. Does nothing for [`WriterConfig::None`].
    ///
    /// # Errors
    ///
    /// If the log file can't be created, or a global subscriber is already set.
    pub fn install_global(self) -> miette::Result<()> {
        match try_create_layers(self)? {
            Some(layers) => tracing_subscriber::registry()
                .with(layers)
                .try_init()
                .into_diagnostic(),
            None => Ok(()),
        }
    }

    /// Install for the current thread only, until the returned guard is dropped. For
    /// tests. [`None`] for [`WriterConfig::None`].
    ///
    /// # Errors
    ///
    /// If the log file can't be created.
    pub fn install_thread_local(self) -> miette::Result<Option<DefaultGuard>> {
        Ok(try_create_layers(self)?
            .map(|layers| tracing_subscriber::registry().with(layers).set_default()))
    }
}

/// Returns the layers, without installing them. [`None`] if nothing should be logged.
///
/// # Errors
///
/// If the log file can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    if tracing_config.writer_config == WriterConfig::None {
        return Ok(None);
    }

    let level_filter = tracing_config.get_level_filter();
    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

    // Needed if layers without their own level filter are added.
    return_it.push(Box::new(level_filter));

    if let Some(layer) =
        try_create_display_layer(level_filter, tracing_config.get_writer_config())
    {
        return_it.push(layer);
    }

    if let Some(layer) =
        try_create_file_layer(level_filter, tracing_config.get_writer_config())?
    {
        return_it.push(layer);
    }

    Ok(Some(return_it))
}

#[must_use]
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> Option<Box<DynLayer<S>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!().with_ansi(true);

    match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _)
        | WriterConfig::Display(display_pref) => match display_pref {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
        },
        WriterConfig::None | WriterConfig::File(_) => None,
    }
}

/// # Errors
///
/// If the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!().with_ansi(false);

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, log_file_path)
        | WriterConfig::File(log_file_path) => {
            let file = rolling_file_appender_impl::try_create(log_file_path.as_str())?;
            Some(Box::new(
                fmt_layer.with_writer(file).with_filter(level_filter),
            ))
        }
        WriterConfig::None | WriterConfig::Display(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_none_creates_no_layers() {
        let layers = try_create_layers(TracingConfig::disabled()).unwrap();
        assert!(layers.is_none());
        assert!(
            TracingConfig::disabled()
                .install_thread_local()
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_display_and_file_layers() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("both.log").to_str().unwrap().to_string();

        let tracing_config = TracingConfig {
            writer_config: WriterConfig::DisplayAndFile(DisplayPreference::Stderr, file_path),
            level_filter: LevelFilter::DEBUG,
        };

        // Level filter, display, file.
        let layers = try_create_layers(tracing_config).unwrap().unwrap();
        assert_eq!(layers.len(), 3);
    }

    #[test]
    fn test_thread_local_file_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thread_local.log");

        let guard = TracingConfig::new_file(
            Some(path.to_str().unwrap().to_string()),
            LevelFilter::INFO,
        )
        .install_thread_local()
        .unwrap();

        tracing::info!(message = "logged to file", answer = 42);
        tracing::debug!(message = "filtered out");
        drop(guard);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("logged to file"), "{contents}");
        assert!(contents.contains("answer=42"), "{contents}");
        assert!(!contents.contains("filtered out"), "{contents}");
    }
}
