//! Headless material inspector.
//!
//! Builds the configured materials, drives a number of simulated frames with
//! a pointer sweeping across the viewport, and prints the final uniform sets
//! as JSON.
//!
//! Run with `cargo run -p chamaco-inspect -- --bundled --frames 120` to inspect
//! the bundled demo presets.
//! Run with `cargo run -p chamaco-inspect -- --kind water --color seafoam` for
//! a single material.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chamaco_config::{CliArgs, Config, ConfigError, default_config_dir};
use chamaco_materials::{
    DrawableId, FrameDriver, FrameState, MaterialBuilder, MaterialError, MaterialKind,
    ParameterSet, PresetError, PresetLibrary,
};
use clap::Parser;
use glam::Vec2;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

const BUNDLED_PRESETS: &str = include_str!("../presets.ron");

#[derive(Parser, Debug)]
#[command(
    name = "chamaco-inspect",
    about = "Build materials, simulate frames and print their uniforms"
)]
struct InspectArgs {
    #[command(flatten)]
    common: CliArgs,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Use the bundled demo presets when no manifest is configured.
    #[arg(long)]
    bundled: bool,
}

#[derive(Debug, Error)]
enum InspectError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Preset(#[from] PresetError),

    #[error("material: {0}")]
    Material(#[from] MaterialError),

    #[error("--fps must be positive and finite, got {0}")]
    InvalidFps(f32),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct MaterialReport<'a> {
    name: &'a str,
    kind: MaterialKind,
    transparent: bool,
    animates: bool,
    std140_bytes: usize,
    uniforms: &'a ParameterSet,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    frames: u32,
    elapsed: f32,
    viewport: [u32; 2],
    materials: Vec<MaterialReport<'a>>,
}

/// Where the materials come from.
enum Source {
    Library(PresetLibrary),
    Single { kind: MaterialKind, color: String },
}

fn resolve_config_dir(args: &CliArgs) -> Result<PathBuf, ConfigError> {
    match &args.config {
        Some(dir) => Ok(dir.clone()),
        None => default_config_dir(),
    }
}

fn material_source(
    config: &Config,
    config_dir: &Path,
    bundled: bool,
) -> Result<Source, PresetError> {
    if let Some(path) = config.presets_path(config_dir) {
        return PresetLibrary::from_ron(&path).map(Source::Library);
    }
    if bundled {
        let library = PresetLibrary::from_ron_str(BUNDLED_PRESETS)?;
        info!("Using {} bundled presets", library.len());
        return Ok(Source::Library(library));
    }
    Ok(Source::Single {
        kind: MaterialKind::from_name(&config.materials.default_kind),
        color: config.materials.default_color.clone(),
    })
}

/// Build every material and hand it to the driver, returning names by slot.
fn populate(
    driver: &mut FrameDriver,
    source: &Source,
    animate: bool,
) -> Result<Vec<(String, DrawableId)>, InspectError> {
    let mut drawables = Vec::new();
    match source {
        Source::Library(library) => {
            for preset in library.iter() {
                let instance = preset
                    .builder()
                    .animate(preset.animate && animate)
                    .build()?;
                drawables.push((preset.name.clone(), driver.insert(instance)));
            }
        }
        Source::Single { kind, color } => {
            let instance = MaterialBuilder::new(*kind)
                .color(color.as_str())
                .animate(animate)
                .build()?;
            drawables.push((format!("{kind}:{color}"), driver.insert(instance)));
        }
    }
    Ok(drawables)
}

/// Pointer position for `frame` of `frames`, sweeping left to right.
fn pointer_at(frame: u32, frames: u32) -> Vec2 {
    let t = frame as f32 / frames.max(1) as f32;
    Vec2::new(t * 2.0 - 1.0, (t * std::f32::consts::TAU).sin() * 0.5)
}

fn run(args: InspectArgs) -> Result<(), InspectError> {
    if !args.fps.is_finite() || args.fps <= 0.0 {
        return Err(InspectError::InvalidFps(args.fps));
    }

    let config_dir = resolve_config_dir(&args.common)?;
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.common);

    let log_dir = config_dir.join("logs");
    chamaco_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let source = material_source(&config, &config_dir, args.bundled)?;
    let mut driver = FrameDriver::new();
    let drawables = populate(&mut driver, &source, config.materials.animate)?;
    info!("Built {} materials", drawables.len());

    let viewport = Vec2::new(config.viewport.width as f32, config.viewport.height as f32);
    let mut elapsed = 0.0;
    for frame in 1..=args.frames {
        elapsed = frame as f32 / args.fps;
        driver.tick(&FrameState::new(
            elapsed,
            pointer_at(frame, args.frames),
            viewport,
        ));
    }
    debug!("Simulated {} frames, elapsed {elapsed:.3}s", args.frames);

    let mut materials = Vec::with_capacity(drawables.len());
    for (name, id) in &drawables {
        let Some(instance) = driver.get(*id) else {
            continue;
        };
        materials.push(MaterialReport {
            name,
            kind: instance.kind(),
            transparent: instance.is_transparent(),
            animates: instance.animates(),
            std140_bytes: instance.pack_std140()?.len(),
            uniforms: instance.params(),
        });
    }

    let report = InspectReport {
        frames: args.frames,
        elapsed,
        viewport: [config.viewport.width, config.viewport.height],
        materials,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    let args = InspectArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("chamaco-inspect: {e}");
            ExitCode::FAILURE
        }
    }
}
