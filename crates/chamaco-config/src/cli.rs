//! Command-line overrides shared by the Chamaco binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "chamaco", about = "Chamaco material tools")]
pub struct CliArgs {
    /// Viewport width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Material kind used when no presets are loaded.
    #[arg(long)]
    pub kind: Option<String>,

    /// Palette token used with `--kind`.
    #[arg(long)]
    pub color: Option<String>,

    /// RON preset manifest.
    #[arg(long)]
    pub presets: Option<PathBuf>,

    /// Freeze time uniforms.
    #[arg(long)]
    pub no_animate: bool,

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
            self.viewport.width = w;
        }
        if let Some(h) = args.height {
            self.viewport.height = h;
        }
        if let Some(ref kind) = args.kind {
            self.materials.default_kind = kind.clone();
        }
        if let Some(ref color) = args.color {
            self.materials.default_color = color.clone();
        }
        if let Some(ref presets) = args.presets {
            self.materials.presets = Some(presets.clone());
        }
        if args.no_animate {
            self.materials.animate = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
