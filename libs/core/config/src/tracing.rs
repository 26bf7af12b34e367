use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Default filter in production. Audit records stay at info even when the
/// rest of the service is quieter.
pub const PRODUCTION_FILTER: &str = "info,audit=info,tower_http=info,sea_orm=warn,sqlx=warn";

/// Default filter in development
pub const DEVELOPMENT_FILTER: &str = "debug,audit=info,tower_http=debug,sea_orm=info,sqlx=info";

/// Install color-eyre for startup errors: file:line shown, env section hidden.
///
/// Call this first in `main()`. Repeated calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

fn default_filter(environment: &Environment) -> &'static str {
    if environment.is_production() {
        PRODUCTION_FILTER
    } else {
        DEVELOPMENT_FILTER
    }
}

/// Initialize the global subscriber with an `ErrorLayer` for span traces.
///
/// - **Production** (`APP_ENV=production`): flattened JSON lines without module targets
/// - **Development** (default): pretty output with targets
///
/// `RUST_LOG` overrides the default filter (e.g. `store_api=trace,audit=off`).
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(environment)));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!("Tracing initialized. Environment: {:?}", environment),
        // Common in tests
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
