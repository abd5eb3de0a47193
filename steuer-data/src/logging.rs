use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,steuer_core=info,steuer_data=info";

fn make_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes logging. Call once at startup.
///
/// - Output goes to stderr so stdout stays clean for reports and JSON;
///   colored when stderr is a terminal.
/// - Level: `RUST_LOG` when set, otherwise warnings plus this workspace's
///   info events. `verbose` forces `debug` everywhere.
///
/// A second call is a no-op.
pub fn init_logging(verbose: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(make_filter(verbose))
        .with(stderr_layer)
        .try_init();
}
