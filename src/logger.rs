use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive used when `RUST_LOG` is not set.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "pulse_check=debug"
    } else {
        "pulse_check=info"
    }
}

/// Installs the global subscriber. Logs go to stderr, stdout is left to
/// the command output.
///
/// The returned guard flushes buffered lines when dropped.
pub fn init(verbose: bool) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_line_number(verbose)
                .with_writer(writer),
        )
        .with(filter)
        .init();

    guard
}
