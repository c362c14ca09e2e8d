//! Tracing setup: a JSON file appender plus, for debug runs, an ANSI console
//! layer (§6 "ambient stack": logging).

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

/// Maps the config's `debug_level` (0..=3) to a tracing filter: 0 silences
/// everything but warnings, 3 is full trace detail.
fn level_for(debug_level: u8) -> LevelFilter {
    match debug_level {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: a non-blocking JSON file layer under
/// `output_dir/log.jsonl`, and (for `debug_level >= 2`) a console layer.
/// Returns the `WorkerGuard` that must be kept alive for the file writer to
/// flush on drop.
pub fn init_logging(output_dir: &Path, debug_level: u8) -> WorkerGuard {
    let level = level_for(debug_level);
    let file_appender = rolling::never(output_dir, "log.jsonl");
    let (non_blocking_writer, guard) = non_blocking(file_appender);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking_writer)
        .json()
        .with_ansi(false)
        .with_filter(level);

    let console_layer = (debug_level >= 2).then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_filter(level)
    });

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer);

    tracing::subscriber::set_global_default(subscriber)
        .expect("a global tracing subscriber was already installed");

    guard
}
