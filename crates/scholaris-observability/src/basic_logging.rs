use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Console-only logging, used when observability is disabled.
///
/// The level comes from `LOG_LEVEL` (default `info`); `RUST_LOG` overrides
/// the whole filter. Noisy dependencies are held at `warn`.
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "scholaris={lvl},scholaris_cli={lvl},tower_http=warn,hyper=warn,tonic=warn,h2=warn,sqlx=warn",
            lvl = log_level
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    // A subscriber may already be installed, e.g. across tests.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
