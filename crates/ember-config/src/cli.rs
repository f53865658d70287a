//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Ember command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "ember", about = "Animated fireball renderer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Starting preset ("fireball" or "classic").
    #[arg(long)]
    pub preset: Option<String>,

    /// Icosphere subdivision level (0-8).
    #[arg(long)]
    pub tessellation: Option<u32>,

    /// Fire animation speed (1-6).
    #[arg(long)]
    pub fire_speed: Option<f32>,

    /// Control server port.
    #[arg(long)]
    pub control_port: Option<u16>,

    /// Disable the HTTP control server.
    #[arg(long)]
    pub no_control_server: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(ref preset) = args.preset {
            self.scene.preset = preset.clone();
        }
        if let Some(t) = args.tessellation {
            self.scene.tessellation = t;
        }
        if let Some(speed) = args.fire_speed {
            self.scene.fire_speed = speed;
        }
        if let Some(port) = args.control_port {
            self.debug.control_port = port;
        }
        if args.no_control_server {
            self.debug.control_server = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
