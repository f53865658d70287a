//! Structured logging for Ember via the `tracing` ecosystem.
//!
//! Console output with uptime timestamps and module paths; optional JSON
//! output for machine parsing. The filter comes from `RUST_LOG` when set,
//! otherwise from the config's `debug.log_level`.

use ember_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the config's `debug.log_level`; when
/// neither is set, the default filter applies. With `debug.log_json` set,
/// log lines are emitted as JSON instead of human-readable text.
pub fn init_logging(config: Option<&Config>) {
    let filter_str = match config {
        Some(config) if !config.debug.log_level.is_empty() => {
            format!("{},wgpu=warn,naga=warn", config.debug.log_level)
        }
        _ => "info,wgpu=warn,naga=warn".to_string(),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let json_output = config.is_some_and(|c| c.debug.log_json);

    if json_output {
        let json_layer = fmt::layer()
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .init();
    } else {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(true)
            .with_level(true)
            .with_timer(fmt::time::uptime());
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();
    }
}

/// Create an `EnvFilter` with the default filter string: `info` everywhere,
/// `warn` for the chatty GPU crates.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info,wgpu=warn,naga=warn")
}
