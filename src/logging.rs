//! Tracing initialization

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable overriding the log filter (EnvFilter syntax)
pub const LOG_ENV: &str = "CONTACT_MERGE_LOG";

static INIT: Once = Once::new();

/// Initialize diagnostics on stderr.
///
/// `CONTACT_MERGE_LOG` wins when set and valid. Otherwise `verbosity` picks
/// the level: 0 shows warnings (merge conflicts, dropped fields), 1 adds run
/// progress, 2 and above show debug output.
///
/// Calling this more than once is a no-op.
pub fn init_tracing(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time(),
            )
            .with(filter)
            .init();
    });
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "warn")]
    #[case(1, "info")]
    #[case(2, "debug")]
    #[case(9, "debug")]
    fn test_default_level(#[case] verbosity: u8, #[case] expected: &str) {
        assert_eq!(default_level(verbosity), expected);
    }
}
