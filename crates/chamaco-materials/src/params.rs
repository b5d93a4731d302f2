//! Typed uniform values and the [`ParameterSet`] that holds them.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Names the builder writes the resolved palette color into, when present.
pub const COLOR_SLOTS: [&str; 2] = ["uColor", "u_color"];

// ---------------------------------------------------------------------------
// UniformType
// ---------------------------------------------------------------------------

/// GLSL type of a uniform this crate can supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniformType {
    Float,
    Vec2,
    Vec3,
}

impl UniformType {
    /// Map a GLSL type keyword to a supported uniform type.
    pub fn from_glsl(keyword: &str) -> Option<Self> {
        match keyword {
            "float" => Some(Self::Float),
            "vec2" => Some(Self::Vec2),
            "vec3" => Some(Self::Vec3),
            _ => None,
        }
    }

    pub fn glsl_name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl_name())
    }
}

// ---------------------------------------------------------------------------
// UniformValue
// ---------------------------------------------------------------------------

/// A single uniform value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Color(Color),
}

impl UniformValue {
    pub fn ty(&self) -> UniformType {
        match self {
            Self::Float(_) => UniformType::Float,
            Self::Vec2(_) => UniformType::Vec2,
            Self::Color(_) => UniformType::Vec3,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match *self {
            Self::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match *self {
            Self::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Color> for UniformValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

// ---------------------------------------------------------------------------
// FrameUniform
// ---------------------------------------------------------------------------

/// Uniforms refreshed by the host every frame, recognised by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameUniform {
    /// Elapsed seconds (`float`).
    Time,
    /// Pointer position in pixels (`vec2`).
    Mouse,
    /// Viewport size in pixels (`vec2`).
    Resolution,
}

impl FrameUniform {
    pub const ALL: [FrameUniform; 3] = [Self::Time, Self::Mouse, Self::Resolution];

    /// Accepted spellings. Both camelCase and snake_case shaders exist in the
    /// scene library.
    pub const fn names(self) -> &'static [&'static str] {
        match self {
            Self::Time => &["uTime", "u_time"],
            Self::Mouse => &["uMouse", "u_mouse"],
            Self::Resolution => &["uResolution", "u_resolution"],
        }
    }

    pub fn ty(self) -> UniformType {
        match self {
            Self::Time => UniformType::Float,
            Self::Mouse | Self::Resolution => UniformType::Vec2,
        }
    }

    /// Classify a uniform name, if it is time-varying.
    pub fn classify(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.names().contains(&name))
    }
}

// ---------------------------------------------------------------------------
// ParameterSet
// ---------------------------------------------------------------------------

/// Uniform name to value mapping, ordered by name.
///
/// Values are plain data, so cloning a set never shares state with the
/// original.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, UniformValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<UniformValue>,
    ) -> Option<UniformValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Replace a value only if `name` is already present. Returns whether it was.
    pub fn replace_existing(&mut self, name: &str, value: UniformValue) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Write `value` into every present spelling of a frame uniform whose
    /// current type matches. Absent names are never inserted.
    pub fn refresh(&mut self, uniform: FrameUniform, value: UniformValue) -> bool {
        let mut hit = false;
        for name in uniform.names() {
            if let Some(slot) = self.values.get_mut(*name)
                && slot.ty() == value.ty()
            {
                *slot = value;
                hit = true;
            }
        }
        hit
    }

    /// Apply every entry of `overrides`, whole-value, last writer wins.
    pub fn merge(&mut self, overrides: &ParameterSet) {
        for (name, value) in overrides.iter() {
            self.values.insert(name.to_string(), *value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(UniformValue::as_float)
    }

    pub fn get_vec2(&self, name: &str) -> Option<Vec2> {
        self.get(name).and_then(UniformValue::as_vec2)
    }

    pub fn get_color(&self, name: &str) -> Option<Color> {
        self.get(name).and_then(UniformValue::as_color)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<UniformValue> {
        self.values.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<UniformValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_replaces_whole_values() {
        let mut base = ParameterSet::new()
            .with("uColor", Color::WHITE)
            .with("uTime", 0.0_f32);
        let overrides = ParameterSet::new().with("uColor", Color::BLACK).with("uExtra", 2.0_f32);

        base.merge(&overrides);

        assert_eq!(base.get_color("uColor"), Some(Color::BLACK));
        assert_eq!(base.get_float("uTime"), Some(0.0));
        assert_eq!(base.get_float("uExtra"), Some(2.0));
    }

    #[test]
    fn test_refresh_never_inserts() {
        let mut set = ParameterSet::new().with("uTime", 0.0_f32);
        assert!(!set.refresh(FrameUniform::Mouse, Vec2::ONE.into()));
        assert!(!set.contains("uMouse"));
        assert!(!set.contains("u_mouse"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_refresh_matches_both_spellings() {
        let mut set = ParameterSet::new().with("u_time", 0.0_f32);
        assert!(set.refresh(FrameUniform::Time, UniformValue::Float(4.0)));
        assert_eq!(set.get_float("u_time"), Some(4.0));
    }

    #[test]
    fn test_refresh_skips_mismatched_type() {
        let mut set = ParameterSet::new().with("uMouse", 1.0_f32);
        assert!(!set.refresh(FrameUniform::Mouse, Vec2::new(3.0, 4.0).into()));
        assert_eq!(set.get_float("uMouse"), Some(1.0));
    }

    #[test]
    fn test_classify_frame_uniforms() {
        assert_eq!(FrameUniform::classify("uTime"), Some(FrameUniform::Time));
        assert_eq!(FrameUniform::classify("u_resolution"), Some(FrameUniform::Resolution));
        assert_eq!(FrameUniform::classify("uNoiseScale"), None);
    }

    #[test]
    fn test_uniform_types() {
        assert_eq!(UniformValue::Float(1.0).ty(), UniformType::Float);
        assert_eq!(UniformValue::Vec2(Vec2::ZERO).ty(), UniformType::Vec2);
        assert_eq!(UniformValue::Color(Color::WHITE).ty(), UniformType::Vec3);
        assert_eq!(UniformType::from_glsl("vec3"), Some(UniformType::Vec3));
        assert_eq!(UniformType::from_glsl("sampler2D"), None);
    }

    #[test]
    fn test_serializes_as_map_keyed_by_uniform() {
        let set = ParameterSet::new()
            .with("uTime", 0.5_f32)
            .with("uMouse", Vec2::new(1.0, 2.0));

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "uMouse": { "Vec2": [1.0, 2.0] },
                "uTime": { "Float": 0.5 },
            })
        );

        let back: ParameterSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }
}
