//! Built-in color and texture shaders
//!
//! Both read a [`StdUniform`], whose contents are only visible to the
//! shaders in this module.
//!
//! | shader            | input floats        | output attributes |
//! |-------------------|---------------------|-------------------|
//! | [`ColorShader`]   | x y z a r g b       | a r g b           |
//! | [`TextureShader`] | x y z u v           | u v               |
//!
//! Color channels are floats in `0.0..=255.0`. Texture coordinates are in
//! `0.0..=1.0` with `v` growing down the texture rows.

use nalgebra::{Matrix4, Vector4};

use crate::color::{argb, channel_from_f32};
use crate::error::{PipelineError, Result};
use crate::shader::{FragmentShader, VertexShader};

/// A row-major grid of packed ARGB texels
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<u32>,
}

impl Texture {
    pub fn new(width: usize, height: usize, texels: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 || width.checked_mul(height) != Some(texels.len()) {
            return Err(PipelineError::TextureSize {
                width,
                height,
                len: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// A two-color checkerboard with square cells of `cell` texels
    pub fn checkerboard(size: usize, cell: usize, a: u32, b: u32) -> Result<Self> {
        let cell = cell.max(1);
        let size = size.max(1);
        let len = size.checked_mul(size).ok_or(PipelineError::TextureSize {
            width: size,
            height: size,
            len: 0,
        })?;
        let texels = (0..len)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x / cell + y / cell) % 2 == 0 {
                    a
                } else {
                    b
                }
            })
            .collect();
        Ok(Self {
            width: size,
            height: size,
            texels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest texel to `(u, v)`, clamped to the texture edges
    pub fn sample_nearest(&self, u: f32, v: f32) -> u32 {
        let x = ((u * self.width as f32).floor().max(0.0) as usize).min(self.width - 1);
        let y = ((v * self.height as f32).floor().max(0.0) as usize).min(self.height - 1);
        self.texels[y * self.width + x]
    }
}

/// Uniform data consumed by the built-in shaders
#[derive(Debug, Clone, PartialEq)]
pub struct StdUniform {
    mvp: Matrix4<f32>,
    texture: Option<Texture>,
}

impl StdUniform {
    pub fn new(mvp: Matrix4<f32>) -> Self {
        Self { mvp, texture: None }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn set_mvp(&mut self, mvp: Matrix4<f32>) {
        self.mvp = mvp;
    }

    pub(crate) fn mvp(&self) -> &Matrix4<f32> {
        &self.mvp
    }

    pub(crate) fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }
}

/// Apply the model-view-projection matrix to the position in `input`
fn clip_space(uniform: &StdUniform, input: &[f32], output: &mut [f32]) {
    let clip = uniform.mvp() * Vector4::new(input[0], input[1], input[2], 1.0);
    output[..4].copy_from_slice(clip.as_slice());
}

/// Reject a configured attribute count that differs from a shader's layout
fn expect_count(stage: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(PipelineError::AttributeCountMismatch {
            stage,
            expected,
            found,
        });
    }
    Ok(())
}

/// Per-vertex ARGB color, interpolated across faces
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorShader;

impl ColorShader {
    pub const NUM_ATTR_IN: usize = 7;
    pub const NUM_ATTR_OUT: usize = 4;
}

impl VertexShader<StdUniform> for ColorShader {
    fn transform(&self, uniform: &StdUniform, input: &[f32], output: &mut [f32]) {
        clip_space(uniform, input, output);
        output[4..8].copy_from_slice(&input[3..7]);
    }

    fn validate_layout(&self, num_attr_in: usize, num_attr_out: usize) -> Result<()> {
        expect_count("color vertex input", Self::NUM_ATTR_IN, num_attr_in)?;
        expect_count("color vertex output", Self::NUM_ATTR_OUT, num_attr_out)
    }
}

impl FragmentShader<StdUniform> for ColorShader {
    fn shade(&self, _uniform: &StdUniform, fragment: &[f32], color: &mut u32) {
        *color = argb(
            channel_from_f32(fragment[4]),
            channel_from_f32(fragment[5]),
            channel_from_f32(fragment[6]),
            channel_from_f32(fragment[7]),
        );
    }

    fn validate(&self, _uniform: &StdUniform, num_attr_out: usize) -> Result<()> {
        expect_count("color fragment input", Self::NUM_ATTR_OUT, num_attr_out)
    }
}

/// Nearest-sample texture mapping
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureShader;

impl TextureShader {
    pub const NUM_ATTR_IN: usize = 5;
    pub const NUM_ATTR_OUT: usize = 2;
}

impl VertexShader<StdUniform> for TextureShader {
    fn transform(&self, uniform: &StdUniform, input: &[f32], output: &mut [f32]) {
        clip_space(uniform, input, output);
        output[4..6].copy_from_slice(&input[3..5]);
    }

    fn validate_layout(&self, num_attr_in: usize, num_attr_out: usize) -> Result<()> {
        expect_count("texture vertex input", Self::NUM_ATTR_IN, num_attr_in)?;
        expect_count("texture vertex output", Self::NUM_ATTR_OUT, num_attr_out)
    }
}

impl FragmentShader<StdUniform> for TextureShader {
    fn shade(&self, uniform: &StdUniform, fragment: &[f32], color: &mut u32) {
        if let Some(texture) = uniform.texture() {
            *color = texture.sample_nearest(fragment[4], fragment[5]);
        }
    }

    fn validate(&self, uniform: &StdUniform, num_attr_out: usize) -> Result<()> {
        expect_count("texture fragment input", Self::NUM_ATTR_OUT, num_attr_out)?;
        uniform
            .texture()
            .map(|_| ())
            .ok_or(PipelineError::MissingTexture)
    }
}
