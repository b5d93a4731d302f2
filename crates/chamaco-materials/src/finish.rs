//! Physically based surface finishes: [`SurfaceFinish`], [`PhysicalMaterial`]
//! and the GPU-packed [`PhysicalGpuData`].
//!
//! These back the non-shader parts of the scenes (gallery walls, plaza
//! props) where the host's standard PBR material is used directly.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::palette;

/// Token used when a physical material names no known color.
pub const PHYSICAL_FALLBACK_TOKEN: &str = "white";

// ---------------------------------------------------------------------------
// SurfaceFinish
// ---------------------------------------------------------------------------

/// Base PBR response of a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceFinish {
    #[default]
    Clay,
    Smooth,
    Matte,
    Glossy,
}

/// Base factors for a [`SurfaceFinish`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinishParams {
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
}

impl SurfaceFinish {
    pub const fn params(self) -> FinishParams {
        match self {
            Self::Clay => FinishParams {
                roughness: 0.7,
                metalness: 0.0,
                clearcoat: 0.1,
                clearcoat_roughness: 0.8,
            },
            Self::Smooth => FinishParams {
                roughness: 0.2,
                metalness: 0.1,
                clearcoat: 0.8,
                clearcoat_roughness: 0.1,
            },
            Self::Matte => FinishParams {
                roughness: 0.9,
                metalness: 0.0,
                clearcoat: 0.0,
                clearcoat_roughness: 1.0,
            },
            Self::Glossy => FinishParams {
                roughness: 0.1,
                metalness: 0.2,
                clearcoat: 1.0,
                clearcoat_roughness: 0.05,
            },
        }
    }

    /// Lenient lookup: unknown names fall back to [`SurfaceFinish::Clay`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "smooth" => Self::Smooth,
            "matte" => Self::Matte,
            "glossy" => Self::Glossy,
            _ => Self::Clay,
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicalMaterial
// ---------------------------------------------------------------------------

/// Resolved PBR parameters, all factors clamped to their legal ranges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PhysicalMaterial {
    pub color: Color,
    /// Clamped to `[0.0, 1.0]`.
    pub roughness: f32,
    /// Clamped to `[0.0, 1.0]`.
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    /// Emissive color; black when emission is off.
    pub emissive: Color,
    /// Must be >= 0.0.
    pub emissive_intensity: f32,
    /// 1.0 = fully opaque.
    pub opacity: f32,
    /// True when requested or when `opacity < 1.0`.
    pub transparent: bool,
}

impl PhysicalMaterial {
    pub fn builder() -> PhysicalMaterialBuilder {
        PhysicalMaterialBuilder::default()
    }

    /// Returns `true` if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emissive_intensity > 0.0 && self.emissive.to_array().iter().any(|&c| c > 0.0)
    }
}

/// Builder for [`PhysicalMaterial`]. Roughness and metalness are multipliers
/// on the finish's base factors.
#[derive(Clone, Debug)]
pub struct PhysicalMaterialBuilder {
    finish: SurfaceFinish,
    token: String,
    custom_color: Option<Color>,
    roughness: f32,
    metalness: f32,
    emissive: bool,
    emissive_intensity: f32,
    opacity: f32,
    transparent: bool,
}

impl Default for PhysicalMaterialBuilder {
    fn default() -> Self {
        Self {
            finish: SurfaceFinish::Clay,
            token: PHYSICAL_FALLBACK_TOKEN.to_string(),
            custom_color: None,
            roughness: 1.0,
            metalness: 1.0,
            emissive: false,
            emissive_intensity: 0.1,
            opacity: 1.0,
            transparent: false,
        }
    }
}

impl PhysicalMaterialBuilder {
    pub fn finish(mut self, finish: SurfaceFinish) -> Self {
        self.finish = finish;
        self
    }

    pub fn color(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Takes priority over the palette token.
    pub fn custom_color(mut self, color: Color) -> Self {
        self.custom_color = Some(color);
        self
    }

    pub fn roughness(mut self, factor: f32) -> Self {
        self.roughness = factor;
        self
    }

    pub fn metalness(mut self, factor: f32) -> Self {
        self.metalness = factor;
        self
    }

    /// Emit light in the base color at `intensity`.
    pub fn emissive(mut self, intensity: f32) -> Self {
        self.emissive = true;
        self.emissive_intensity = intensity;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn build(self) -> PhysicalMaterial {
        let base = self.finish.params();
        let color = self.custom_color.unwrap_or_else(|| {
            palette::lookup(&self.token).unwrap_or_else(|| palette::resolve(PHYSICAL_FALLBACK_TOKEN))
        });
        let opacity = self.opacity.clamp(0.0, 1.0);

        let (emissive, emissive_intensity) = if self.emissive {
            (color, self.emissive_intensity.max(0.0))
        } else {
            (Color::BLACK, 0.0)
        };

        PhysicalMaterial {
            color,
            roughness: (base.roughness * self.roughness).clamp(0.0, 1.0),
            metalness: (base.metalness * self.metalness).clamp(0.0, 1.0),
            clearcoat: base.clearcoat,
            clearcoat_roughness: base.clearcoat_roughness,
            emissive,
            emissive_intensity,
            opacity,
            transparent: self.transparent || opacity < 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicalGpuData
// ---------------------------------------------------------------------------

/// GPU-friendly packed physical material, 48 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PhysicalGpuData {
    /// rgb = base color, a = opacity.
    pub color_opacity: [f32; 4],
    /// rgb = emissive color, w = emissive intensity.
    pub emissive_rgb_intensity: [f32; 4],
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
}

impl From<&PhysicalMaterial> for PhysicalGpuData {
    fn from(m: &PhysicalMaterial) -> Self {
        let [r, g, b] = m.color.to_array();
        let [er, eg, eb] = m.emissive.to_array();
        Self {
            color_opacity: [r, g, b, m.opacity],
            emissive_rgb_intensity: [er, eg, eb, m.emissive_intensity],
            roughness: m.roughness,
            metalness: m.metalness,
            clearcoat: m.clearcoat,
            clearcoat_roughness: m.clearcoat_roughness,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
