//! Pipeline configuration and the indexed draw entry point
//!
//! A draw call runs every primitive through the same fixed sequence:
//!
//! 1. Vertex stage: shade each distinct index of the primitive once
//! 2. Clipper: cut the primitive down to the view volume
//! 3. Rasterizer: divide, map to the viewport, walk covered pixels
//! 4. Compositor: depth-test, shade and write each pixel
//!
//! Configuration is validated up front; a rejected draw call touches no
//! pixels.

use crate::camera::Camera;
use crate::clip::Clipper;
use crate::error::{PipelineError, Result};
use crate::framebuffer::Framebuffer;
use crate::primitive::{
    PrimitiveType, MAX_ATTRIBUTE_COUNT, PRIMITIVE_SIZE_LINE, PRIMITIVE_SIZE_TRIANGLE,
};
use crate::raster::{CullMode, Rasterizer, WindingOrder};
use crate::shader::{FragmentShader, VertexShader};
use crate::vertex::ClipVertex;

/// Everything one draw call needs.
///
/// Borrows the caller's framebuffer, uniform data, shaders and vertex
/// buffer; the pipeline never outlives them.
///
/// # Examples
///
/// ```
/// use sr_core::{ColorShader, Framebuffer, Mesh, PipelineContext, PrimitiveType, StdUniform};
/// use nalgebra::Matrix4;
///
/// let mut colors = vec![0u32; 64 * 64];
/// let mut depths = vec![f32::INFINITY; 64 * 64];
/// let framebuffer = Framebuffer::new(64, 64, &mut colors, &mut depths)?;
///
/// let cube = Mesh::cube(1.0);
/// let uniform = StdUniform::new(Matrix4::identity());
/// let mut pipe = PipelineContext::new(framebuffer, &uniform, &ColorShader, &ColorShader)
///     .with_vertices(&cube.vertices, ColorShader::NUM_ATTR_IN)
///     .with_num_attr_out(ColorShader::NUM_ATTR_OUT);
///
/// let written = pipe.draw_indexed(&cube.indices, PrimitiveType::TriangleList)?;
/// assert!(written > 0);
/// # Ok::<(), sr_core::PipelineError>(())
/// ```
pub struct PipelineContext<'a, U: ?Sized> {
    pub framebuffer: Framebuffer<'a>,
    pub camera: Camera,
    pub uniform: &'a U,
    pub vertex_shader: &'a dyn VertexShader<U>,
    pub fragment_shader: &'a dyn FragmentShader<U>,
    /// Input vertices, `num_attr_in` floats each
    pub vertices: &'a [f32],
    pub num_pts: usize,
    pub num_attr_in: usize,
    pub num_attr_out: usize,
    pub winding_order: WindingOrder,
    pub cull_mode: CullMode,
}

impl<'a, U: ?Sized> PipelineContext<'a, U> {
    /// Create a context drawing into `framebuffer`.
    ///
    /// The camera viewport covers the whole framebuffer. No vertices are
    /// bound yet.
    pub fn new(
        framebuffer: Framebuffer<'a>,
        uniform: &'a U,
        vertex_shader: &'a dyn VertexShader<U>,
        fragment_shader: &'a dyn FragmentShader<U>,
    ) -> Self {
        let camera = Camera::new(framebuffer.width(), framebuffer.height());
        Self {
            framebuffer,
            camera,
            uniform,
            vertex_shader,
            fragment_shader,
            vertices: &[],
            num_pts: 0,
            num_attr_in: 3,
            num_attr_out: 0,
            winding_order: WindingOrder::default(),
            cull_mode: CullMode::default(),
        }
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Bind a vertex buffer of `num_attr_in` floats per vertex
    pub fn with_vertices(mut self, vertices: &'a [f32], num_attr_in: usize) -> Self {
        self.vertices = vertices;
        self.num_attr_in = num_attr_in;
        self.num_pts = vertices.len().checked_div(num_attr_in).unwrap_or(0);
        self
    }

    pub fn with_num_attr_out(mut self, num_attr_out: usize) -> Self {
        self.num_attr_out = num_attr_out;
        self
    }

    pub fn with_winding_order(mut self, winding_order: WindingOrder) -> Self {
        self.winding_order = winding_order;
        self
    }

    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    pub fn framebuffer(&self) -> &Framebuffer<'a> {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<'a> {
        &mut self.framebuffer
    }

    /// Reject configurations that would fail part-way through a draw
    fn validate(&self, indices: &[usize]) -> Result<()> {
        if self.num_attr_out > MAX_ATTRIBUTE_COUNT {
            return Err(PipelineError::TooManyAttributes {
                count: self.num_attr_out,
                max: MAX_ATTRIBUTE_COUNT,
            });
        }
        if self.num_attr_in < 3 {
            return Err(PipelineError::TooFewInputAttributes {
                count: self.num_attr_in,
            });
        }

        let required = self.num_pts * self.num_attr_in;
        if self.vertices.len() < required {
            return Err(PipelineError::VertexBufferTooShort {
                len: self.vertices.len(),
                required,
            });
        }

        if let Some(&index) = indices.iter().find(|&&i| i >= self.num_pts) {
            return Err(PipelineError::IndexOutOfRange {
                index,
                num_pts: self.num_pts,
            });
        }

        self.vertex_shader.validate_layout(self.num_attr_in, self.num_attr_out)?;
        self.fragment_shader.validate(self.uniform, self.num_attr_out)
    }

    /// Draw `indices` grouped as `prim_type` primitives.
    ///
    /// Returns the number of pixels written. Configuration errors are
    /// reported before any pixel is touched; primitives that are clipped
    /// away, culled, degenerate or hidden simply write nothing.
    pub fn draw_indexed(&mut self, indices: &[usize], prim_type: PrimitiveType) -> Result<usize> {
        self.validate(indices)?;

        log::debug!(
            "draw_indexed: {:?}, {} indices over {} vertices, {} -> {} attributes",
            prim_type,
            indices.len(),
            self.num_pts,
            self.num_attr_in,
            self.num_attr_out
        );

        let stage = VertexStage {
            shader: self.vertex_shader,
            uniform: self.uniform,
            vertices: self.vertices,
            num_attr_in: self.num_attr_in,
            num_attr_out: self.num_attr_out,
        };
        let mut raster = Rasterizer::new(self.camera.viewport, self.uniform, self.fragment_shader);
        raster.winding_order = self.winding_order;
        raster.cull_mode = self.cull_mode;

        let mut clipper = Clipper::new();
        let fb = &mut self.framebuffer;
        let size = prim_type.vertex_count();

        if !prim_type.is_strip() && indices.len() % size != 0 {
            log::debug!(
                "ignoring {} trailing indices of an incomplete primitive",
                indices.len() % size
            );
        }

        let mut written = 0;
        match prim_type {
            PrimitiveType::PointList => {
                for &index in indices {
                    let mut point = [ClipVertex::new(stage.num_attr_out)];
                    stage.shade_group(&[index], &mut point);
                    if let Some(v) = clipper.clip_point(&point[0]) {
                        written += raster.draw_point(fb, &v);
                    }
                }
            }
            PrimitiveType::LineList | PrimitiveType::LineStrip => {
                let groups: Box<dyn Iterator<Item = &[usize]>> = if prim_type.is_strip() {
                    Box::new(indices.windows(PRIMITIVE_SIZE_LINE))
                } else {
                    Box::new(indices.chunks_exact(PRIMITIVE_SIZE_LINE))
                };
                for group in groups {
                    let mut line = [ClipVertex::new(stage.num_attr_out); PRIMITIVE_SIZE_LINE];
                    stage.shade_group(group, &mut line);
                    if let Some([a, b]) = clipper.clip_line(&line[0], &line[1]) {
                        written += raster.draw_line(fb, &a, &b);
                    }
                }
            }
            PrimitiveType::TriangleList => {
                for group in indices.chunks_exact(PRIMITIVE_SIZE_TRIANGLE) {
                    let mut tri = [ClipVertex::new(stage.num_attr_out); PRIMITIVE_SIZE_TRIANGLE];
                    stage.shade_group(group, &mut tri);
                    written += raster.draw_polygon(fb, clipper.clip_triangle(&tri));
                }
            }
            PrimitiveType::TriangleStrip => {
                for (k, window) in indices.windows(PRIMITIVE_SIZE_TRIANGLE).enumerate() {
                    // Odd triangles swap their first two vertices to keep the
                    // strip's facing
                    let group = if k % 2 == 1 {
                        [window[1], window[0], window[2]]
                    } else {
                        [window[0], window[1], window[2]]
                    };
                    let mut tri = [ClipVertex::new(stage.num_attr_out); PRIMITIVE_SIZE_TRIANGLE];
                    stage.shade_group(&group, &mut tri);
                    written += raster.draw_polygon(fb, clipper.clip_triangle(&tri));
                }
            }
        }

        log::debug!("draw_indexed: {} pixels written", written);
        Ok(written)
    }
}

/// Runs the vertex shader over the indices of one primitive
struct VertexStage<'a, U: ?Sized> {
    shader: &'a dyn VertexShader<U>,
    uniform: &'a U,
    vertices: &'a [f32],
    num_attr_in: usize,
    num_attr_out: usize,
}

impl<U: ?Sized> VertexStage<'_, U> {
    /// Shade `group` into `out`, calling the shader once per distinct index
    fn shade_group(&self, group: &[usize], out: &mut [ClipVertex]) {
        for j in 0..group.len() {
            match group[..j].iter().position(|&i| i == group[j]) {
                Some(k) => out[j] = out[k],
                None => {
                    let start = group[j] * self.num_attr_in;
                    let input = &self.vertices[start..start + self.num_attr_in];
                    out[j] = ClipVertex::new(self.num_attr_out);
                    self.shader
                        .transform(self.uniform, input, out[j].as_mut_slice());
                }
            }
        }
    }
}
