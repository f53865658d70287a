use clap::Parser;

use ember_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();

    let config_dir = match &args.config {
        Some(dir) => dir.clone(),
        None => ember_config::default_config_dir().expect("Could not determine config directory"),
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config ({e}), using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    ember_log::init_logging(Some(&config));
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting ember renderer"
    );

    ember_app::run_with_config(config);
}
