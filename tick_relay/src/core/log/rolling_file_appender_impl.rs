// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

/// Creates a file appender that never rotates, so one run writes one file.
///
/// A bare file name (`log.txt`) resolves against the current directory.
///
/// # Errors
///
/// If the path has no file name component (for example `/` or `..`).
pub fn try_create_file_appender(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = Path::new(path_str);

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't use {} as a log file: it has no file name component",
            path.display()
        )
    })?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok(tracing_appender::rolling::never(parent, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_path_without_file_name() {
        assert!(try_create_file_appender("/").is_err());
    }

    #[test]
    fn test_creates_file_in_parent_dir() {
        let dir = std::env::temp_dir().join(format!("tick_relay_appender_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file_path = dir.join("appender.log");

        let appender = try_create_file_appender(file_path.to_str().unwrap()).unwrap();
        drop(appender);

        assert!(file_path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
