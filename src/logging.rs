use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `RUST_LOG` wins over `fallback`.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
/// Returns `false` when a subscriber was already installed; that one stays.
pub fn init(fallback: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();

    match installed {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "subscriber already installed, keeping it");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_keeps_the_first_subscriber() {
        init("ironlog=debug");
        assert!(!init("ironlog=trace"));
    }
}
