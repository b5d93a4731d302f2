//! Named material presets loaded from a RON manifest.
//!
//! Each scene describes its materials once (kind, palette token, overrides)
//! and builds a fresh [`MaterialInstance`] per drawable from the library.
//!
//! ```ron
//! (
//!     presets: [
//!         (
//!             name: "pool",
//!             kind: "water",
//!             color: Some("ocean_blue"),
//!             overrides: { "uWaveSpeed": Float(1.5) },
//!         ),
//!     ],
//! )
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::builder::{MaterialBuilder, MaterialError, MaterialInstance};
use crate::color::{Color, ColorParseError};
use crate::kind::MaterialKind;
use crate::palette;
use crate::params::{ParameterSet, UniformValue};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned while loading or building presets.
#[derive(Debug, Error)]
pub enum PresetError {
    /// I/O error reading the manifest file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// RON deserialization error.
    #[error("ron parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Two presets share a name.
    #[error("duplicate preset name: {0}")]
    DuplicateName(String),

    /// An override holds an unparseable hex color.
    #[error("preset '{preset}' uniform '{uniform}': {source}")]
    Color {
        preset: String,
        uniform: String,
        #[source]
        source: ColorParseError,
    },

    /// The preset does not produce a valid material.
    #[error("preset '{preset}': {source}")]
    Material {
        preset: String,
        #[source]
        source: MaterialError,
    },

    /// No preset with this name exists.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

// ---------------------------------------------------------------------------
// RON manifest types
// ---------------------------------------------------------------------------

/// Top-level RON manifest.
#[derive(Deserialize)]
pub struct PresetManifest {
    pub presets: Vec<PresetEntry>,
}

fn default_animate() -> bool {
    true
}

/// A single preset entry in the RON manifest.
#[derive(Deserialize)]
pub struct PresetEntry {
    pub name: String,
    /// Material kind name; unknown names fall back to clay.
    pub kind: String,
    /// Palette token; `None` keeps the kind's default color.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub overrides: BTreeMap<String, OverrideValue>,
    #[serde(default = "default_animate")]
    pub animate: bool,
}

/// Override value as written in RON.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub enum OverrideValue {
    Float(f32),
    Vec2(f32, f32),
    Rgb(f32, f32, f32),
    /// `"#RRGGBB"` or `"#RGB"`.
    Hex(String),
    /// Palette token, resolved with the usual fallback.
    Token(String),
}

impl OverrideValue {
    /// # Errors
    ///
    /// Returns [`ColorParseError`] for malformed `Hex` values.
    pub fn to_uniform(&self) -> Result<UniformValue, ColorParseError> {
        Ok(match self {
            Self::Float(v) => UniformValue::Float(*v),
            Self::Vec2(x, y) => UniformValue::Vec2(Vec2::new(*x, *y)),
            Self::Rgb(r, g, b) => UniformValue::Color(Color::new(*r, *g, *b)),
            Self::Hex(hex) => UniformValue::Color(Color::parse_hex(hex)?),
            Self::Token(token) => UniformValue::Color(palette::resolve(token)),
        })
    }
}

// ---------------------------------------------------------------------------
// Preset
// ---------------------------------------------------------------------------

/// A validated preset, ready to build instances from.
#[derive(Clone, Debug)]
pub struct Preset {
    pub name: String,
    pub kind: MaterialKind,
    pub color: Option<String>,
    pub overrides: ParameterSet,
    pub animate: bool,
}

impl Preset {
    /// Builder preloaded with this preset, for callers that adjust it further.
    pub fn builder(&self) -> MaterialBuilder {
        let builder = MaterialBuilder::new(self.kind)
            .overrides(&self.overrides)
            .animate(self.animate);
        match &self.color {
            Some(token) => builder.color(token.as_str()),
            None => builder,
        }
    }

    /// Build a new, independently owned instance.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::Material`] if the preset does not satisfy its shader.
    pub fn build(&self) -> Result<MaterialInstance, PresetError> {
        self.builder()
            .build()
            .map_err(|source| PresetError::Material {
                preset: self.name.clone(),
                source,
            })
    }
}

// ---------------------------------------------------------------------------
// PresetLibrary
// ---------------------------------------------------------------------------

/// Presets in manifest order with a name index.
///
/// Every preset is test-built on load, so configuration mistakes surface
/// once, before any scene is constructed.
#[derive(Debug, Default)]
pub struct PresetLibrary {
    presets: Vec<Preset>,
    by_name: HashMap<String, usize>,
}

impl PresetLibrary {
    /// Load the library from a RON manifest on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError`] on I/O, parse, or validation failures.
    pub fn from_ron(path: &Path) -> Result<Self, PresetError> {
        let contents = std::fs::read_to_string(path)?;
        let library = Self::from_ron_str(&contents)?;
        info!(
            "Loaded {} material presets from {}",
            library.len(),
            path.display()
        );
        Ok(library)
    }

    /// Load the library from a RON string.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError`] on parse or validation failures.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, PresetError> {
        let manifest: PresetManifest = ron::from_str(ron_str)?;
        let mut library = Self::default();

        for entry in manifest.presets {
            if library.by_name.contains_key(&entry.name) {
                return Err(PresetError::DuplicateName(entry.name));
            }

            let mut overrides = ParameterSet::new();
            for (uniform, value) in &entry.overrides {
                let value = value.to_uniform().map_err(|source| PresetError::Color {
                    preset: entry.name.clone(),
                    uniform: uniform.clone(),
                    source,
                })?;
                overrides.insert(uniform.as_str(), value);
            }

            let preset = Preset {
                kind: MaterialKind::from_name(&entry.kind),
                name: entry.name,
                color: entry.color,
                overrides,
                animate: entry.animate,
            };
            preset.build()?;

            library
                .by_name
                .insert(preset.name.clone(), library.presets.len());
            library.presets.push(preset);
        }

        Ok(library)
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.by_name.get(name).map(|&i| &self.presets[i])
    }

    /// Build a fresh instance of the named preset.
    ///
    /// # Errors
    ///
    /// [`PresetError::UnknownPreset`] if no preset has this name.
    pub fn build(&self, name: &str) -> Result<MaterialInstance, PresetError> {
        self.get(name)
            .ok_or_else(|| PresetError::UnknownPreset(name.to_string()))?
            .build()
    }

    /// Presets in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const BEACH: &str = r##"
        (
            presets: [
                (
                    name: "pool",
                    kind: "water",
                    color: Some("ocean_blue"),
                    overrides: { "uWaveSpeed": Float(1.5) },
                ),
                (
                    name: "sand_castle",
                    kind: "clay",
                    color: Some("sand"),
                    overrides: {
                        "uNoiseScale": Float(12.0),
                        "uNoiseIntensity": Float(0.45),
                    },
                    animate: false,
                ),
                (
                    name: "awning",
                    kind: "stripes",
                    overrides: {
                        "uColor": Hex("#D4856A"),
                        "uColor2": Token("cream"),
                    },
                ),
                (
                    name: "mystery",
                    kind: "lava",
                ),
            ],
        )
    "##;

    #[test]
    fn test_load_beach_presets() {
        let lib = PresetLibrary::from_ron_str(BEACH).unwrap();
        assert_eq!(lib.len(), 4);
        assert_eq!(
            lib.names().collect::<Vec<_>>(),
            ["pool", "sand_castle", "awning", "mystery"]
        );

        let pool = lib.build("pool").unwrap();
        assert_eq!(pool.kind(), MaterialKind::Water);
        assert_eq!(
            pool.params().get_color("uColor"),
            Some(palette::resolve("ocean_blue"))
        );
        assert_eq!(pool.params().get_float("uWaveSpeed"), Some(1.5));

        let castle = lib.build("sand_castle").unwrap();
        assert!(!castle.animates());
        assert_eq!(castle.params().get_float("uNoiseIntensity"), Some(0.45));
    }

    #[test]
    fn test_hex_and_token_overrides() {
        let lib = PresetLibrary::from_ron_str(BEACH).unwrap();
        let awning = lib.build("awning").unwrap();
        assert_eq!(
            awning.params().get_color("uColor"),
            Some(Color::from_hex(0xD4856A))
        );
        assert_eq!(
            awning.params().get_color("uColor2"),
            Some(palette::resolve("cream"))
        );
    }

    #[test]
    fn test_unknown_kind_falls_back_to_clay() {
        let lib = PresetLibrary::from_ron_str(BEACH).unwrap();
        assert_eq!(lib.get("mystery").unwrap().kind, MaterialKind::Clay);
    }

    #[test]
    fn test_each_build_is_independent() {
        let lib = PresetLibrary::from_ron_str(BEACH).unwrap();
        let mut a = lib.build("pool").unwrap();
        let b = lib.build("pool").unwrap();
        crate::frame::update(&mut a, 7.0, Vec2::ZERO, Vec2::ONE);
        assert_eq!(a.params().get_float("uTime"), Some(7.0));
        assert_eq!(b.params().get_float("uTime"), Some(0.0));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let ron = r#"(presets: [(name: "a", kind: "clay"), (name: "a", kind: "water")])"#;
        assert!(matches!(
            PresetLibrary::from_ron_str(ron),
            Err(PresetError::DuplicateName(name)) if name == "a"
        ));
    }

    #[test]
    fn test_bad_hex_rejected() {
        let ron = r##"(presets: [(name: "a", kind: "clay", overrides: {"uColor": Hex("#12")})])"##;
        assert!(matches!(
            PresetLibrary::from_ron_str(ron),
            Err(PresetError::Color { .. })
        ));
    }

    #[test]
    fn test_mistyped_override_rejected_at_load() {
        let ron = r#"(presets: [(name: "a", kind: "clay", overrides: {"uTime": Vec2(1.0, 2.0)})])"#;
        assert!(matches!(
            PresetLibrary::from_ron_str(ron),
            Err(PresetError::Material {
                source: MaterialError::UniformTypeMismatch { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_preset() {
        let lib = PresetLibrary::from_ron_str(BEACH).unwrap();
        assert!(matches!(
            lib.build("nope"),
            Err(PresetError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        assert!(matches!(
            PresetLibrary::from_ron_str("{{not valid}}"),
            Err(PresetError::Ron(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BEACH.as_bytes()).unwrap();
        let lib = PresetLibrary::from_ron(file.path()).unwrap();
        assert_eq!(lib.len(), 4);

        let missing = PresetLibrary::from_ron(Path::new("/nonexistent/presets.ron"));
        assert!(matches!(missing, Err(PresetError::Io(_))));
    }
}
