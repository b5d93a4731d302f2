//! std140 uniform block layout and packing.
//!
//! Uniforms are laid out in shader declaration order. Alignment: `float` 4
//! bytes, `vec2` 8, `vec3` 16 (a following `float` may fill the 4th word).
//! The block size is rounded up to 16 bytes.

use crate::builder::{MaterialError, MaterialInstance};
use crate::params::{ParameterSet, UniformType, UniformValue};
use crate::shader::ShaderPair;

/// Position of one uniform inside a packed block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformSlot {
    pub name: String,
    pub ty: UniformType,
    /// Byte offset from the start of the block.
    pub offset: usize,
}

/// Computed std140 layout for a shader pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformLayout {
    pub slots: Vec<UniformSlot>,
    /// Total block size in bytes, a multiple of 16.
    pub size: usize,
}

fn align_and_size(ty: UniformType) -> (usize, usize) {
    match ty {
        UniformType::Float => (4, 4),
        UniformType::Vec2 => (8, 8),
        UniformType::Vec3 => (16, 12),
    }
}

fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// Compute the std140 layout of `shaders`' declared uniforms.
///
/// # Errors
///
/// Propagates [`ShaderPair::uniforms`] errors.
pub fn std140_layout(shaders: &ShaderPair) -> Result<UniformLayout, MaterialError> {
    let mut offset = 0;
    let mut slots = Vec::new();

    for decl in shaders.uniforms()? {
        let (align, size) = align_and_size(decl.ty);
        offset = round_up(offset, align);
        slots.push(UniformSlot {
            name: decl.name,
            ty: decl.ty,
            offset,
        });
        offset += size;
    }

    Ok(UniformLayout {
        slots,
        size: round_up(offset, 16),
    })
}

/// Pack `params` into a std140 block matching `shaders`.
///
/// # Errors
///
/// [`MaterialError::MissingUniform`] / [`MaterialError::UniformTypeMismatch`]
/// if `params` does not satisfy the shader pair.
pub fn pack_std140(params: &ParameterSet, shaders: &ShaderPair) -> Result<Vec<u8>, MaterialError> {
    let layout = std140_layout(shaders)?;
    let mut words = vec![0.0_f32; layout.size / 4];

    for slot in &layout.slots {
        let value = params
            .get(&slot.name)
            .ok_or_else(|| MaterialError::MissingUniform {
                shader: shaders.label,
                name: slot.name.clone(),
            })?;
        if value.ty() != slot.ty {
            return Err(MaterialError::UniformTypeMismatch {
                shader: shaders.label,
                name: slot.name.clone(),
                expected: slot.ty,
                found: value.ty(),
            });
        }

        let start = slot.offset / 4;
        match *value {
            UniformValue::Float(v) => words[start] = v,
            UniformValue::Vec2(v) => words[start..start + 2].copy_from_slice(&v.to_array()),
            UniformValue::Color(c) => words[start..start + 3].copy_from_slice(&c.to_array()),
        }
    }

    Ok(bytemuck::cast_slice(&words).to_vec())
}

impl MaterialInstance {
    /// Pack this instance's uniforms for upload.
    ///
    /// # Errors
    ///
    /// See [`pack_std140`].
    pub fn pack_std140(&self) -> Result<Vec<u8>, MaterialError> {
        pack_std140(&self.params, self.shaders)
    }
}
