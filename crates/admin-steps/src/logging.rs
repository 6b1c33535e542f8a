//! Tracing subscriber setup for test runs.

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Filter directive for a verbosity level.
///
/// 0 = warnings only, 1 = step-level info, 2+ = every lookup.
#[must_use]
pub const fn filter_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info,admin_steps=info",
        _ => "debug",
    }
}

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` overrides `verbosity`. Returns `false` when a global subscriber
/// was already installed (e.g. by an earlier test).
pub fn init_tracing(verbosity: u8) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbosity)));

    let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_levels() {
        assert_eq!(filter_for(0), "warn");
        assert!(filter_for(1).starts_with("info"));
        assert_eq!(filter_for(2), "debug");
        assert_eq!(filter_for(9), "debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let _ = init_tracing(0);
        assert!(!init_tracing(2));
    }
}
