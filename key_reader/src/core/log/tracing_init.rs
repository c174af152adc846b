// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{TracingConfig, WriterConfig, rolling_file_appender_impl};
use miette::IntoDiagnostic as _;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt as _, registry::LookupSpan,
                         util::SubscriberInitExt as _};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_thread_names(false)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Logging is **DISABLED** by **default**. If `options` has a level filter of
/// [`LevelFilter::OFF`] this is a no-op.
///
/// # Errors
///
/// Returns an error if the log file can't be created, or a global subscriber is
/// already installed.
pub fn try_initialize_logging_global(options: impl Into<TracingConfig>) -> miette::Result<()> {
    let it: TracingConfig = options.into();

    // Early return if the level filter is off.
    if matches!(it.get_level_filter(), LevelFilter::OFF) {
        return Ok(());
    }

    let Some(layers) = try_create_layers(&it)? else {
        return Ok(());
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .into_diagnostic()
}

/// Returns the layers. This does not initialize the tracing system. Returns `None` if
/// there is nowhere to write to.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    let Some(file_layer) = try_create_file_layer(
        tracing_config.get_level_filter(),
        tracing_config.get_writer_config(),
    )?
    else {
        return Ok(None);
    };

    let layers: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![
        // Set the level filter from the tracing configuration.
        Box::new(tracing_config.get_level_filter()),
        file_layer,
    ];

    Ok(Some(layers))
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// This is useful for composition of layers. There's more info in the docs
/// [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/index.html#runtime-configuration-with-layers).
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    Ok(match writer_config {
        WriterConfig::File(tracing_log_file_path) => {
            let file = rolling_file_appender_impl::try_create(&tracing_log_file_path)?;
            Some(Box::new(
                create_fmt!().with_writer(file).with_filter(level_filter),
            ))
        }
        WriterConfig::None => None,
    })
}
