//! Configuration for the Chamaco material tools.
//!
//! Settings persist to disk as `config.ron`, can be overridden from the
//! command line via clap, and support change detection for hot reload.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, MaterialsConfig, ViewportConfig, default_config_dir,
};
pub use error::ConfigError;
