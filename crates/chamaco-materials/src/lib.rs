//! Material configuration for the studio scenes: named palette, per-kind
//! default uniforms, the uniform builder, per-frame updates, physical
//! finishes, RON presets and std140 packing.

mod builder;
mod color;
mod finish;
mod frame;
mod kind;
mod packing;
pub mod palette;
mod params;
mod preset;
pub mod shader;

pub use builder::{
    MaterialBuilder, MaterialError, MaterialInstance, build_material, build_parameters,
};
pub use color::{Color, ColorParseError};
pub use finish::{
    FinishParams, PhysicalGpuData, PhysicalMaterial, PhysicalMaterialBuilder, SurfaceFinish,
};
pub use frame::{DrawableId, FrameDriver, FrameState, update};
pub use kind::{MaterialKind, UnknownKind, defaults_for, defaults_for_name};
pub use packing::{UniformLayout, UniformSlot, pack_std140, std140_layout};
pub use palette::{FALLBACK_COLOR, resolve};
pub use params::{COLOR_SLOTS, FrameUniform, ParameterSet, UniformType, UniformValue};
pub use preset::{OverrideValue, Preset, PresetError, PresetLibrary};
pub use shader::{ShaderPair, UniformDecl};
