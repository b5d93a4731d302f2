//! Uniform builder: kind defaults + palette color + caller overrides.
//!
//! The resolved palette color replaces the kind's default color, but only in
//! a slot the kind already declares (`uColor` or `u_color`). Caller overrides
//! are applied last and always win.

use thiserror::Error;
use tracing::debug;

use crate::color::Color;
use crate::kind::MaterialKind;
use crate::palette;
use crate::params::{COLOR_SLOTS, ParameterSet, UniformType, UniformValue};
use crate::shader::ShaderPair;

// ---------------------------------------------------------------------------
// MaterialError
// ---------------------------------------------------------------------------

/// Configuration errors surfaced when a material is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    /// The shader reads a uniform the parameter set does not provide.
    #[error("shader '{shader}' requires uniform '{name}' which the material does not provide")]
    MissingUniform { shader: &'static str, name: String },

    /// A parameter has a different type than the shader declares.
    #[error("uniform '{name}' in shader '{shader}' is declared {expected} but the material provides {found}")]
    UniformTypeMismatch {
        shader: &'static str,
        name: String,
        expected: UniformType,
        found: UniformType,
    },

    /// The shader declares a uniform type this crate cannot supply.
    #[error("shader '{shader}' declares uniform '{name}' with unsupported type '{glsl_type}'")]
    UnsupportedUniformType {
        shader: &'static str,
        name: String,
        glsl_type: String,
    },

    /// Vertex and fragment stages declare the same uniform with different types.
    #[error("shader '{shader}' declares uniform '{name}' as both {first} and {second}")]
    ConflictingUniform {
        shader: &'static str,
        name: String,
        first: UniformType,
        second: UniformType,
    },
}

// ---------------------------------------------------------------------------
// MaterialInstance
// ---------------------------------------------------------------------------

/// A built material owned by exactly one drawable.
///
/// Deliberately not `Clone`: two drawables that look alike each build their
/// own instance so per-frame updates never overwrite each other.
#[derive(Debug)]
pub struct MaterialInstance {
    pub(crate) kind: MaterialKind,
    pub(crate) shaders: &'static ShaderPair,
    pub(crate) params: ParameterSet,
    pub(crate) animate: bool,
    pub(crate) attached: bool,
}

impl MaterialInstance {
    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    pub fn shaders(&self) -> &'static ShaderPair {
        self.shaders
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn into_params(self) -> ParameterSet {
        self.params
    }

    /// Whether the time uniform is advanced by frame updates.
    pub fn animates(&self) -> bool {
        self.animate
    }

    pub fn is_transparent(&self) -> bool {
        self.kind.transparent()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Mark the instance as removed from its drawable. Later frame updates
    /// become no-ops.
    pub fn detach(&mut self) {
        self.attached = false;
    }
}

// ---------------------------------------------------------------------------
// MaterialBuilder
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum ColorSource {
    /// Keep whatever color the kind's table defines.
    KindDefault,
    Token(String),
    Custom(Color),
}

/// Fluent builder over [`build_material`].
///
/// ```
/// use chamaco_materials::{MaterialBuilder, MaterialKind};
///
/// let water = MaterialBuilder::new(MaterialKind::Water)
///     .color("ocean_blue")
///     .set("uWaveSpeed", 1.5_f32)
///     .build()
///     .unwrap();
/// assert_eq!(water.params().get_float("uWaveSpeed"), Some(1.5));
/// ```
#[derive(Clone, Debug)]
pub struct MaterialBuilder {
    kind: MaterialKind,
    color: ColorSource,
    overrides: ParameterSet,
    animate: bool,
}

impl MaterialBuilder {
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            color: ColorSource::KindDefault,
            overrides: ParameterSet::new(),
            animate: true,
        }
    }

    /// Use a palette token; unknown tokens resolve to the palette fallback.
    pub fn color(mut self, token: impl Into<String>) -> Self {
        self.color = ColorSource::Token(token.into());
        self
    }

    /// Use an explicit color instead of a palette token.
    pub fn custom_color(mut self, color: Color) -> Self {
        self.color = ColorSource::Custom(color);
        self
    }

    /// Override a single uniform.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        self.overrides.insert(name, value);
        self
    }

    /// Override several uniforms at once. Later calls win.
    pub fn overrides(mut self, overrides: &ParameterSet) -> Self {
        self.overrides.merge(overrides);
        self
    }

    /// Disable to freeze the time uniform at its built value.
    pub fn animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    /// Merge and validate.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError`] if the merged set does not satisfy the
    /// kind's shader pair.
    pub fn build(self) -> Result<MaterialInstance, MaterialError> {
        let shaders = self.kind.shaders();
        let mut params = self.kind.defaults();

        let color = match self.color {
            ColorSource::KindDefault => None,
            ColorSource::Token(ref token) => Some(palette::resolve(token)),
            ColorSource::Custom(color) => Some(color),
        };
        if let Some(color) = color {
            for slot in COLOR_SLOTS {
                params.replace_existing(slot, UniformValue::Color(color));
            }
        }

        params.merge(&self.overrides);
        shaders.validate(&params)?;

        debug!(
            kind = self.kind.name(),
            uniforms = params.len(),
            overrides = self.overrides.len(),
            "built material"
        );

        Ok(MaterialInstance {
            kind: self.kind,
            shaders,
            params,
            animate: self.animate,
            attached: true,
        })
    }
}

/// Build a material instance from a kind, a palette token and overrides.
///
/// The returned instance owns its parameters; later changes to `overrides`
/// do not affect it.
///
/// # Errors
///
/// Returns [`MaterialError`] if the merged set does not satisfy the kind's
/// shader pair (for example an override with the wrong type).
pub fn build_material(
    kind: MaterialKind,
    color_name: &str,
    overrides: &ParameterSet,
) -> Result<MaterialInstance, MaterialError> {
    MaterialBuilder::new(kind)
        .color(color_name)
        .overrides(overrides)
        .build()
}

/// Like [`build_material`] but returns only the merged parameter set.
///
/// # Errors
///
/// See [`build_material`].
pub fn build_parameters(
    kind: MaterialKind,
    color_name: &str,
    overrides: &ParameterSet,
) -> Result<ParameterSet, MaterialError> {
    build_material(kind, color_name, overrides).map(MaterialInstance::into_params)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::palette::FALLBACK_COLOR;

    #[test]
    fn test_clay_with_soft_red() {
        let params = build_parameters(MaterialKind::Clay, "soft_red", &ParameterSet::new()).unwrap();
        assert_eq!(params.get_color("uColor"), Some(palette::resolve("soft_red")));
        assert_eq!(params.get_float("uNoiseScale"), Some(8.0));
        assert_eq!(params.get_float("uNoiseIntensity"), Some(0.3));
    }

    #[test]
    fn test_unknown_color_uses_fallback() {
        let params =
            build_parameters(MaterialKind::Water, "unknown_color_xyz", &ParameterSet::new())
                .unwrap();
        assert_eq!(params.get_color("uColor"), Some(FALLBACK_COLOR));
    }

    #[test]
    fn test_override_beats_default_and_palette() {
        let overrides = ParameterSet::new()
            .with("uNoiseScale", 2.0_f32)
            .with("uColor", Color::BLACK);
        let params = build_parameters(MaterialKind::Clay, "turquoise", &overrides).unwrap();
        assert_eq!(params.get_float("uNoiseScale"), Some(2.0));
        assert_eq!(params.get_color("uColor"), Some(Color::BLACK));
    }

    #[test]
    fn test_color_not_added_when_kind_has_no_slot() {
        let params = build_parameters(MaterialKind::Wood, "plum", &ParameterSet::new()).unwrap();
        assert!(!params.contains("uColor"));
        assert!(!params.contains("u_color"));
        assert_eq!(params, MaterialKind::Wood.defaults());
    }

    #[test]
    fn test_snake_case_color_slot_receives_palette_color() {
        let params =
            build_parameters(MaterialKind::CubeMapped, "seafoam", &ParameterSet::new()).unwrap();
        assert_eq!(params.get_color("u_color"), Some(palette::resolve("seafoam")));
    }

    #[test]
    fn test_mutating_overrides_after_build_has_no_effect() {
        let mut overrides = ParameterSet::new().with("uWaveSpeed", 5.0_f32);
        let params = build_parameters(MaterialKind::Water, "turquoise", &overrides).unwrap();

        overrides.insert("uWaveSpeed", 9.0_f32);
        overrides.insert("uWaveAmplitude", 1.0_f32);

        assert_eq!(params.get_float("uWaveSpeed"), Some(5.0));
        assert_eq!(params.get_float("uWaveAmplitude"), Some(0.01));
    }

    #[test]
    fn test_mistyped_override_is_a_build_error() {
        let overrides = ParameterSet::new().with("uTime", Vec2::ONE);
        let err = build_material(MaterialKind::Clay, "soft_red", &overrides).unwrap_err();
        assert_eq!(
            err,
            MaterialError::UniformTypeMismatch {
                shader: "clay",
                name: "uTime".to_string(),
                expected: UniformType::Float,
                found: UniformType::Vec2,
            }
        );
    }

    #[test]
    fn test_extra_override_is_kept() {
        let overrides = ParameterSet::new().with("uGlow", 0.5_f32);
        let params = build_parameters(MaterialKind::Gradient, "cream", &overrides).unwrap();
        assert_eq!(params.get_float("uGlow"), Some(0.5));
    }

    #[test]
    fn test_builder_defaults() {
        let water = MaterialBuilder::new(MaterialKind::Water).build().unwrap();
        assert_eq!(water.params(), &MaterialKind::Water.defaults());
        assert!(water.animates());
        assert!(water.is_attached());
        assert!(water.is_transparent());
        assert_eq!(water.shaders().label, "water");
    }

    #[test]
    fn test_builder_custom_color() {
        let c = Color::from_hex(0x123456);
        let metal = MaterialBuilder::new(MaterialKind::Metal)
            .custom_color(c)
            .animate(false)
            .build()
            .unwrap();
        assert_eq!(metal.params().get_color("uColor"), Some(c));
        assert!(!metal.animates());
    }
}
