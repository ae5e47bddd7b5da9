// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig, WriterConfig, try_create_file_appender};
use miette::IntoDiagnostic;
use tracing::dispatcher::DefaultGuard;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer. Thread
/// names are kept since the ticker and the loop log from different threads.
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

/// Installs the global default subscriber. Once set it can't be changed, so this is
/// meant for binaries.
///
/// Does nothing if the level filter is [`LevelFilter::OFF`].
///
/// # Errors
///
/// - The log file can't be created.
/// - A global subscriber was already installed.
pub fn try_initialize_logging_global(tracing_config: TracingConfig) -> miette::Result<()> {
    if tracing_config.get_level_filter() == LevelFilter::OFF {
        return Ok(());
    }

    let layers = try_create_layers(&tracing_config)?;
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .into_diagnostic()
}

/// Installs a subscriber for the current thread only, until the returned guard is
/// dropped. Meant for tests.
///
/// Returns [`None`] if the level filter is [`LevelFilter::OFF`].
///
/// # Errors
///
/// The log file can't be created.
pub fn try_initialize_logging_thread_local(
    tracing_config: TracingConfig,
) -> miette::Result<Option<DefaultGuard>> {
    if tracing_config.get_level_filter() == LevelFilter::OFF {
        return Ok(None);
    }

    let layers = try_create_layers(&tracing_config)?;
    Ok(Some(tracing_subscriber::registry().with(layers).set_default()))
}

/// Returns the layers without installing them: the level filter first, then the
/// display layer and the file layer if the [`WriterConfig`] asks for them.
///
/// # Errors
///
/// The log file can't be created.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Vec<Box<DynLayer<tracing_subscriber::Registry>>>> {
    let level_filter = tracing_config.get_level_filter();
    let writer_config = tracing_config.get_writer_config();

    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> =
        vec![Box::new(level_filter)];

    if let Some(layer) = try_create_display_layer(level_filter, &writer_config) {
        return_it.push(layer);
    }

    if let Some(layer) = try_create_file_layer(level_filter, &writer_config)? {
        return_it.push(layer);
    }

    Ok(return_it)
}

/// This erases the concrete type of the writer, and returns a boxed layer.
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> Option<Box<DynLayer<S>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();

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

/// This erases the concrete type of the writer, and returns a boxed layer. The file
/// gets no ANSI escapes.
///
/// # Errors
///
/// The log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!().with_ansi(false);

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, log_file_path)
        | WriterConfig::File(log_file_path) => {
            let file = try_create_file_appender(log_file_path)?;
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
    use std::path::PathBuf;

    fn temp_log_path(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("tick_relay_log_{}_{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("test.log")
    }

    #[test]
    fn test_try_create_display_layer() {
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(
                LevelFilter::DEBUG,
                &WriterConfig::Display(DisplayPreference::Stderr),
            );
        assert!(layer.is_some());

        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(LevelFilter::DEBUG, &WriterConfig::None);
        assert!(layer.is_none());
    }

    #[test]
    fn test_display_only_config_creates_no_file() {
        let tracing_config =
            TracingConfig::new_display(DisplayPreference::Stderr, LevelFilter::INFO);
        assert_eq!(
            tracing_config.get_writer_config(),
            WriterConfig::Display(DisplayPreference::Stderr)
        );

        let layers = try_create_layers(&tracing_config).unwrap();
        assert_eq!(layers.len(), 2);
    }

    #[test]
    fn test_try_create_file_layer() {
        let file_path = temp_log_path("file_layer");
        let writer_config = WriterConfig::File(file_path.to_str().unwrap().to_string());

        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_file_layer(LevelFilter::DEBUG, &writer_config).unwrap();

        assert!(layer.is_some());
        assert!(file_path.exists());
    }

    #[test]
    fn test_try_create_both_layers() {
        let file_path = temp_log_path("both_layers");
        let tracing_config = TracingConfig::new_file_and_display(
            Some(file_path.to_str().unwrap().to_string()),
            DisplayPreference::Stdout,
            LevelFilter::DEBUG,
        );

        let layers = try_create_layers(&tracing_config).unwrap();
        assert_eq!(layers.len(), 3);
        assert!(file_path.exists());
    }

    #[test]
    fn test_thread_local_logging_writes_to_file() {
        let file_path = temp_log_path("thread_local");
        let guard = try_initialize_logging_thread_local(TracingConfig::new_file(
            Some(file_path.to_str().unwrap().to_string()),
            LevelFilter::INFO,
        ))
        .unwrap();
        assert!(guard.is_some());

        tracing::info!(message = "kept", tick = 1);
        tracing::debug!(message = "filtered out");
        drop(guard);

        let contents = std::fs::read_to_string(&file_path).unwrap();
        assert!(contents.contains("kept"));
        assert!(!contents.contains("filtered out"));
    }

    #[test]
    fn test_off_installs_nothing() {
        let guard = try_initialize_logging_thread_local(TracingConfig::default()).unwrap();
        assert!(guard.is_none());
    }
}
