//! Logging setup for the `reachability` binary.
//!
//! The library only emits `tracing` events. Installing a subscriber is left to
//! the binary so embedding applications keep control of their own output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used with `--verbose`.
const VERBOSE_FILTER: &str = "reachability=debug";
/// Filter used with `--quiet`.
const QUIET_FILTER: &str = "reachability=error";
/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "reachability=info";

/// Build the filter for the given verbosity flags.
///
/// `verbose` wins over `quiet`; without either flag `RUST_LOG` is honoured.
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the global tracing subscriber.
///
/// Logs go to stderr so that JSON results on stdout stay machine readable.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

/// Whether colored output should be used, honouring `NO_COLOR`.
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_wins() {
        let filter = build_filter(true, true);
        assert_eq!(filter.to_string(), VERBOSE_FILTER);
    }

    #[test]
    fn test_quiet_filter() {
        let filter = build_filter(false, true);
        assert_eq!(filter.to_string(), QUIET_FILTER);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(false, true, true);
    }
}
