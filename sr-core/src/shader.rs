//! Pluggable vertex and fragment stages
//!
//! Shaders are strategy objects bound into a
//! [`PipelineContext`](crate::PipelineContext). Both stages receive the same
//! uniform value, which the pipeline itself never inspects. The uniform type
//! is a generic parameter; use `dyn Any` to erase it entirely.

use crate::error::Result;

/// Transforms one input vertex into clip space
pub trait VertexShader<U: ?Sized> {
    /// `input` holds `num_attr_in` floats, position first. `output` holds
    /// `4 + num_attr_out` floats: clip-space x, y, z, w, then attributes.
    fn transform(&self, uniform: &U, input: &[f32], output: &mut [f32]);

    /// Check the configured attribute counts once per draw call, before any
    /// vertex is shaded
    fn validate_layout(&self, _num_attr_in: usize, _num_attr_out: usize) -> Result<()> {
        Ok(())
    }
}

/// Shades one covered, depth-passing pixel
pub trait FragmentShader<U: ?Sized> {
    /// `fragment` holds `4 + num_attr_out` floats: pixel x, pixel y, depth,
    /// clip-space w, then the perspective-correct attributes.
    fn shade(&self, uniform: &U, fragment: &[f32], color: &mut u32);

    /// Check the uniform and the number of interpolated attributes once per
    /// draw call, before any pixel is touched
    fn validate(&self, _uniform: &U, _num_attr_out: usize) -> Result<()> {
        Ok(())
    }
}

impl<U, F> VertexShader<U> for F
where
    U: ?Sized,
    F: Fn(&U, &[f32], &mut [f32]),
{
    fn transform(&self, uniform: &U, input: &[f32], output: &mut [f32]) {
        self(uniform, input, output)
    }
}

impl<U, F> FragmentShader<U> for F
where
    U: ?Sized,
    F: Fn(&U, &[f32], &mut u32),
{
    fn shade(&self, uniform: &U, fragment: &[f32], color: &mut u32) {
        self(uniform, fragment, color)
    }
}
