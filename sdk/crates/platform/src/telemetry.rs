//! Tracing initialisation
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a fmt
//! layer. `RUST_LOG` wins over the supplied default filter.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber
///
/// Returns `false` if a global subscriber was already installed, which
/// lets host applications and tests call this more than once.
///
/// ## Arguments
/// * `default_filter` - Directive used when `RUST_LOG` is unset, e.g. `"threeds=info"`
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
