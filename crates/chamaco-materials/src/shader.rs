//! Embedded GLSL programs and uniform discovery.
//!
//! Shader sources are handed to the rendering host verbatim. The only thing
//! this crate reads from them is the list of `uniform` declarations, which
//! drives build-time validation and uniform block packing.

use crate::builder::MaterialError;
use crate::params::{ParameterSet, UniformType};

pub const SURFACE_VERTEX_SOURCE: &str = include_str!("shaders/surface.vert");
pub const UV_VERTEX_SOURCE: &str = include_str!("shaders/uv.vert");
pub const CLAY_FRAGMENT_SOURCE: &str = include_str!("shaders/clay.frag");
pub const WATER_FRAGMENT_SOURCE: &str = include_str!("shaders/water.frag");
pub const GRADIENT_FRAGMENT_SOURCE: &str = include_str!("shaders/gradient.frag");
pub const STRIPES_FRAGMENT_SOURCE: &str = include_str!("shaders/stripes.frag");
pub const WOOD_FRAGMENT_SOURCE: &str = include_str!("shaders/wood.frag");
pub const METAL_FRAGMENT_SOURCE: &str = include_str!("shaders/metal.frag");
pub const CUBE_MAPPED_FRAGMENT_SOURCE: &str = include_str!("shaders/cube_mapped.frag");

pub static CLAY_SHADERS: ShaderPair =
    ShaderPair::new("clay", SURFACE_VERTEX_SOURCE, CLAY_FRAGMENT_SOURCE);
pub static WATER_SHADERS: ShaderPair =
    ShaderPair::new("water", SURFACE_VERTEX_SOURCE, WATER_FRAGMENT_SOURCE);
pub static GRADIENT_SHADERS: ShaderPair =
    ShaderPair::new("gradient", SURFACE_VERTEX_SOURCE, GRADIENT_FRAGMENT_SOURCE);
pub static STRIPES_SHADERS: ShaderPair =
    ShaderPair::new("stripes", UV_VERTEX_SOURCE, STRIPES_FRAGMENT_SOURCE);
pub static WOOD_SHADERS: ShaderPair =
    ShaderPair::new("wood", SURFACE_VERTEX_SOURCE, WOOD_FRAGMENT_SOURCE);
pub static METAL_SHADERS: ShaderPair =
    ShaderPair::new("metal", SURFACE_VERTEX_SOURCE, METAL_FRAGMENT_SOURCE);
pub static CUBE_MAPPED_SHADERS: ShaderPair =
    ShaderPair::new("cube_mapped", UV_VERTEX_SOURCE, CUBE_MAPPED_FRAGMENT_SOURCE);

// ---------------------------------------------------------------------------
// UniformDecl
// ---------------------------------------------------------------------------

/// A `uniform <type> <name>;` declaration found in a shader stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformDecl {
    pub name: String,
    pub ty: UniformType,
}

// ---------------------------------------------------------------------------
// ShaderPair
// ---------------------------------------------------------------------------

/// A vertex + fragment program pair, addressed by label.
#[derive(Debug)]
pub struct ShaderPair {
    pub label: &'static str,
    pub vertex: &'static str,
    pub fragment: &'static str,
}

impl ShaderPair {
    pub const fn new(label: &'static str, vertex: &'static str, fragment: &'static str) -> Self {
        Self {
            label,
            vertex,
            fragment,
        }
    }

    /// Uniforms declared across both stages, in declaration order
    /// (vertex first), without duplicates.
    ///
    /// # Errors
    ///
    /// [`MaterialError::UnsupportedUniformType`] for types other than
    /// `float`/`vec2`/`vec3`, and [`MaterialError::ConflictingUniform`] when
    /// the two stages disagree on a uniform's type.
    pub fn uniforms(&self) -> Result<Vec<UniformDecl>, MaterialError> {
        let mut decls: Vec<UniformDecl> = Vec::new();

        for source in [self.vertex, self.fragment] {
            for (glsl_type, name) in scan_uniforms(source) {
                let Some(ty) = UniformType::from_glsl(&glsl_type) else {
                    return Err(MaterialError::UnsupportedUniformType {
                        shader: self.label,
                        name,
                        glsl_type,
                    });
                };

                match decls.iter().find(|d| d.name == name) {
                    Some(existing) if existing.ty != ty => {
                        return Err(MaterialError::ConflictingUniform {
                            shader: self.label,
                            name,
                            first: existing.ty,
                            second: ty,
                        });
                    }
                    Some(_) => {}
                    None => decls.push(UniformDecl { name, ty }),
                }
            }
        }

        Ok(decls)
    }

    /// Check that `params` supplies every declared uniform with the declared type.
    ///
    /// Extra entries in `params` are allowed; the host ignores them.
    ///
    /// # Errors
    ///
    /// [`MaterialError::MissingUniform`] or [`MaterialError::UniformTypeMismatch`]
    /// on the first offending uniform, plus any error from [`Self::uniforms`].
    pub fn validate(&self, params: &ParameterSet) -> Result<(), MaterialError> {
        for decl in self.uniforms()? {
            let value = params
                .get(&decl.name)
                .ok_or_else(|| MaterialError::MissingUniform {
                    shader: self.label,
                    name: decl.name.clone(),
                })?;

            if value.ty() != decl.ty {
                return Err(MaterialError::UniformTypeMismatch {
                    shader: self.label,
                    name: decl.name,
                    expected: decl.ty,
                    found: value.ty(),
                });
            }
        }
        Ok(())
    }
}

/// Remove `//` line comments and `/* */` block comments.
///
/// Block comments become a single space so adjacent tokens stay apart.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    loop {
        let line = rest.find("//");
        let block = rest.find("/*");
        match (line, block) {
            (Some(l), b) if b.is_none_or(|b| l < b) => {
                out.push_str(&rest[..l]);
                rest = match rest[l..].find('\n') {
                    Some(end) => &rest[l + end..],
                    None => "",
                };
            }
            (_, Some(b)) => {
                out.push_str(&rest[..b]);
                out.push(' ');
                rest = match rest[b + 2..].find("*/") {
                    Some(end) => &rest[b + 2 + end + 2..],
                    None => "",
                };
            }
            _ => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// `(type, name)` for every name declared by a `uniform` statement.
///
/// Statements are split on `;`, so several declarations may share a line and
/// `uniform vec3 a, b;` declares both `a` and `b`. Precision qualifiers
/// (`uniform highp float x;`) are skipped. Interface blocks are ignored.
fn scan_uniforms(source: &str) -> Vec<(String, String)> {
    let code = strip_comments(source);
    let mut found = Vec::new();

    for statement in code.split(';') {
        let mut words = statement.split_whitespace();
        if words.next() != Some("uniform") || statement.contains('{') {
            continue;
        }
        let rest: Vec<&str> = words.collect();
        let rest = rest.join(" ");

        let mut declarators = rest.split(',').map(str::trim);
        let Some(first) = declarators.next() else {
            continue;
        };
        let mut tokens: Vec<&str> = first.split_whitespace().collect();
        let (Some(name), Some(ty)) = (tokens.pop(), tokens.pop()) else {
            continue;
        };

        found.push((ty.to_string(), name.to_string()));
        for name in declarators.filter(|n| !n.is_empty()) {
            found.push((ty.to_string(), name.to_string()));
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    static ALL_SHADERS: [&ShaderPair; 7] = [
        &CLAY_SHADERS,
        &WATER_SHADERS,
        &GRADIENT_SHADERS,
        &STRIPES_SHADERS,
        &WOOD_SHADERS,
        &METAL_SHADERS,
        &CUBE_MAPPED_SHADERS,
    ];

    #[test]
    fn test_clay_uniforms_in_declaration_order() {
        let decls = CLAY_SHADERS.uniforms().unwrap();
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["uColor", "uTime", "uNoiseScale", "uNoiseIntensity"]);
        assert_eq!(decls[0].ty, UniformType::Vec3);
        assert_eq!(decls[1].ty, UniformType::Float);
    }

    #[test]
    fn test_every_embedded_shader_parses() {
        for shaders in ALL_SHADERS {
            let decls = shaders.uniforms().unwrap();
            assert!(!decls.is_empty(), "{} declares no uniforms", shaders.label);
        }
    }

    #[test]
    fn test_comment_between_uniforms_is_ignored() {
        let names: Vec<_> = GRADIENT_SHADERS
            .uniforms()
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["uColor", "uColor2", "uDirection"]);
    }

    #[test]
    fn test_precision_qualifier_is_skipped() {
        let pair = ShaderPair::new("test", "", "uniform highp float uLevel;\n");
        let decls = pair.uniforms().unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "uLevel");
        assert_eq!(decls[0].ty, UniformType::Float);
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let pair = ShaderPair::new("test", "", "uniform sampler2D uMap;\n");
        assert!(matches!(
            pair.uniforms(),
            Err(MaterialError::UnsupportedUniformType { .. })
        ));
    }

    #[test]
    fn test_duplicate_across_stages_is_merged() {
        let pair = ShaderPair::new("test", "uniform float uTime;", "uniform float uTime;");
        assert_eq!(pair.uniforms().unwrap().len(), 1);

        let clash = ShaderPair::new("test", "uniform float uTime;", "uniform vec2 uTime;");
        assert!(matches!(
            clash.uniforms(),
            Err(MaterialError::ConflictingUniform { .. })
        ));
    }

    #[test]
    fn test_validate_reports_missing_and_mismatched() {
        let complete = ParameterSet::new()
            .with("uColor", Color::WHITE)
            .with("uColor2", Color::BLACK)
            .with("uDirection", 1.0_f32);
        assert!(GRADIENT_SHADERS.validate(&complete).is_ok());

        let mut missing = complete.clone();
        missing.remove("uColor2");
        assert!(matches!(
            GRADIENT_SHADERS.validate(&missing),
            Err(MaterialError::MissingUniform { ref name, .. }) if name == "uColor2"
        ));

        let wrong = complete.with("uDirection", Color::WHITE);
        assert!(matches!(
            GRADIENT_SHADERS.validate(&wrong),
            Err(MaterialError::UniformTypeMismatch {
                expected: UniformType::Float,
                found: UniformType::Vec3,
                ..
            })
        ));
    }

    #[test]
    fn test_two_declarations_on_one_line() {
        let pair = ShaderPair::new("test", "", "uniform float uA; uniform float uB;\n");
        let names: Vec<_> = pair.uniforms().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["uA", "uB"]);

        let only_b = ParameterSet::new().with("uB", 1.0_f32);
        assert!(matches!(
            pair.validate(&only_b),
            Err(MaterialError::MissingUniform { ref name, .. }) if name == "uA"
        ));
    }

    #[test]
    fn test_comma_separated_names_share_a_type() {
        let pair = ShaderPair::new("test", "", "uniform vec3 uA, uB;\nuniform float uC;\n");
        let decls = pair.uniforms().unwrap();
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["uA", "uB", "uC"]);
        assert_eq!(decls[1].ty, UniformType::Vec3);
    }

    #[test]
    fn test_block_comments_are_stripped() {
        let source = "/* uniform float uHidden; */\nuniform float /* scale */ uScale;\n\
                      uniform vec2 uOffset; // uniform vec3 uAlsoHidden;\n";
        let pair = ShaderPair::new("test", "", source);
        let names: Vec<_> = pair.uniforms().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["uScale", "uOffset"]);
    }

    #[test]
    fn test_interface_block_is_ignored() {
        let source = "uniform Globals { float uInside; };\nuniform float uOutside;\n";
        let pair = ShaderPair::new("test", "", source);
        let names: Vec<_> = pair.uniforms().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["uOutside"]);
    }
}
