//! CLI timing and latency profiling utilities.
//!
//! Uses `tracing` spans with automatic duration tracking via `FmtSpan::CLOSE`.
//! Functions annotated with `#[instrument]` will automatically have their
//! execution time logged when the span closes.
//!
//! The business crate logs through `log`; those records reach the same
//! subscriber through the `tracing-log` bridge that [`init_tracing`] installs.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Install the global subscriber. Output goes to stderr so `list --json`
/// stays machine readable.
///
/// `verbose` lowers the default level to DEBUG, `timing` logs every command
/// span's duration when it closes. `RUST_LOG` still overrides both.
pub fn init_tracing(verbose: bool, timing: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();

    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Span close events are logged at INFO, so `timing` needs at least that.
fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if timing {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}
