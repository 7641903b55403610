// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

/// File appender that never rotates. Don't wrap it in
/// `tracing_appender::non_blocking()`: the worker guard would have to outlive the
/// subscriber, and lines get lost when it doesn't.
///
/// # Errors
///
/// If the path has no parent directory or no file name.
pub fn try_create(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = Path::new(path_str);

    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => miette::bail!(
            "Can't access the folder of {}. It might not exist, or don't have required \
             permissions.",
            path.display()
        ),
    };

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access file name {}. It might not exist, or don't have required \
             permissions.",
            path.display()
        )
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}
