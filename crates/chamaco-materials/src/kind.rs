//! Material kinds and their default uniform tables.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::params::{ParameterSet, UniformValue};
use crate::shader::{
    CLAY_SHADERS, CUBE_MAPPED_SHADERS, GRADIENT_SHADERS, METAL_SHADERS, STRIPES_SHADERS,
    ShaderPair, WATER_SHADERS, WOOD_SHADERS,
};

/// Returned by the strict [`FromStr`] impl for [`MaterialKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown material kind: {0}")]
pub struct UnknownKind(pub String);

// ---------------------------------------------------------------------------
// MaterialKind
// ---------------------------------------------------------------------------

/// A category of appearance: one shader pair plus one default uniform table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Matte hand-made look with value-noise grain.
    #[default]
    Clay,
    /// Animated, translucent pool surface.
    Water,
    /// Two-color linear gradient.
    Gradient,
    /// Two-color horizontal bands.
    Stripes,
    /// Procedural growth rings.
    Wood,
    /// Brushed metal with scratches.
    Metal,
    /// Pointer-reactive UV pattern for the showcase cube.
    CubeMapped,
}

type DefaultTable = &'static [(&'static str, UniformValue)];

const CLAY_DEFAULTS: DefaultTable = &[
    ("uColor", UniformValue::Color(Color::from_hex(0xFF6B6B))),
    ("uTime", UniformValue::Float(0.0)),
    ("uNoiseScale", UniformValue::Float(8.0)),
    ("uNoiseIntensity", UniformValue::Float(0.3)),
];

const WATER_DEFAULTS: DefaultTable = &[
    ("uColor", UniformValue::Color(Color::from_hex(0x4ECDC4))),
    ("uTime", UniformValue::Float(0.0)),
    ("uWaveSpeed", UniformValue::Float(2.0)),
    ("uWaveAmplitude", UniformValue::Float(0.01)),
];

const GRADIENT_DEFAULTS: DefaultTable = &[
    ("uColor", UniformValue::Color(Color::from_hex(0xFF6B6B))),
    ("uColor2", UniformValue::Color(Color::from_hex(0x4ECDC4))),
    ("uDirection", UniformValue::Float(0.0)),
];

const STRIPES_DEFAULTS: DefaultTable = &[
    ("uColor", UniformValue::Color(Color::from_hex(0x0066FF))),
    ("uColor2", UniformValue::Color(Color::from_hex(0xFFFFFF))),
    ("uStripes", UniformValue::Float(10.0)),
];

const WOOD_DEFAULTS: DefaultTable = &[
    ("uTime", UniformValue::Float(0.0)),
    ("uWoodColor", UniformValue::Color(Color::from_hex(0x8B4513))),
    ("uRingColor", UniformValue::Color(Color::from_hex(0x654321))),
    ("uRingScale", UniformValue::Float(50.0)),
    ("uRingWidth", UniformValue::Float(0.1)),
    ("uNoiseScale", UniformValue::Float(10.0)),
];

const METAL_DEFAULTS: DefaultTable = &[
    ("uTime", UniformValue::Float(0.0)),
    ("uColor", UniformValue::Color(Color::from_hex(0xC0C0C0))),
    ("uRoughness", UniformValue::Float(0.3)),
    ("uMetallic", UniformValue::Float(1.0)),
    ("uNoiseScale", UniformValue::Float(20.0)),
    ("uScratchScale", UniformValue::Float(50.0)),
    ("uScratchIntensity", UniformValue::Float(0.1)),
];

const CUBE_MAPPED_DEFAULTS: DefaultTable = &[
    ("u_color", UniformValue::Color(Color::from_hex(0xFF0000))),
    ("u_time", UniformValue::Float(0.0)),
    ("u_mouse", UniformValue::Vec2(Vec2::ZERO)),
    ("u_resolution", UniformValue::Vec2(Vec2::ZERO)),
    ("u_scale", UniformValue::Float(1.0)),
];

impl MaterialKind {
    pub const ALL: [MaterialKind; 7] = [
        Self::Clay,
        Self::Water,
        Self::Gradient,
        Self::Stripes,
        Self::Wood,
        Self::Metal,
        Self::CubeMapped,
    ];

    /// Snake-case name as used in presets and config files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clay => "clay",
            Self::Water => "water",
            Self::Gradient => "gradient",
            Self::Stripes => "stripes",
            Self::Wood => "wood",
            Self::Metal => "metal",
            Self::CubeMapped => "cube_mapped",
        }
    }

    /// Lenient lookup: unknown names fall back to [`MaterialKind::Clay`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    fn table(self) -> DefaultTable {
        match self {
            Self::Clay => CLAY_DEFAULTS,
            Self::Water => WATER_DEFAULTS,
            Self::Gradient => GRADIENT_DEFAULTS,
            Self::Stripes => STRIPES_DEFAULTS,
            Self::Wood => WOOD_DEFAULTS,
            Self::Metal => METAL_DEFAULTS,
            Self::CubeMapped => CUBE_MAPPED_DEFAULTS,
        }
    }

    /// A fresh copy of this kind's default uniforms.
    pub fn defaults(self) -> ParameterSet {
        self.table().iter().copied().collect()
    }

    pub fn shaders(self) -> &'static ShaderPair {
        match self {
            Self::Clay => &CLAY_SHADERS,
            Self::Water => &WATER_SHADERS,
            Self::Gradient => &GRADIENT_SHADERS,
            Self::Stripes => &STRIPES_SHADERS,
            Self::Wood => &WOOD_SHADERS,
            Self::Metal => &METAL_SHADERS,
            Self::CubeMapped => &CUBE_MAPPED_SHADERS,
        }
    }

    /// Whether the host should enable alpha blending.
    pub fn transparent(self) -> bool {
        matches!(self, Self::Water)
    }
}

impl FromStr for MaterialKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default uniforms for `kind`. Each call returns an independent set.
pub fn defaults_for(kind: MaterialKind) -> ParameterSet {
    kind.defaults()
}

/// Default uniforms for a kind given by name, falling back to clay.
pub fn defaults_for_name(name: &str) -> ParameterSet {
    MaterialKind::from_name(name).defaults()
}
