//! Half-block terminal output for the software pipeline
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as its background.

use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use sr_core::{
    channels, Camera, FragmentShader, Framebuffer, Mesh, PipelineContext, PrimitiveType,
    VertexShader,
};
use std::io::Write;

/// Background color behind the rendered geometry
const CLEAR_COLOR: u32 = 0xFF10_1018;

/// Owns the color and depth buffers a terminal frame is rendered into
pub struct TerminalRenderer {
    width: usize,
    height: usize,
    colors: Vec<u32>,
    depths: Vec<f32>,
}

impl TerminalRenderer {
    /// A renderer for a `cols` x `rows` terminal; the pixel grid is twice
    /// as tall as the cell grid.
    pub fn new(cols: usize, rows: usize) -> Self {
        let (width, height) = (cols, rows * 2);
        let size = width * height;
        Self {
            width,
            height,
            colors: vec![CLEAR_COLOR; size],
            depths: vec![f32::INFINITY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Camera whose viewport covers the pixel grid
    pub fn camera(&self) -> Camera {
        Camera::new(self.width, self.height)
    }

    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    pub fn clear(&mut self) {
        self.colors.fill(CLEAR_COLOR);
        self.depths.fill(f32::INFINITY);
    }

    /// Draw a triangle-list mesh with the given shaders.
    ///
    /// Returns the number of pixels written.
    pub fn render_mesh<U: ?Sized>(
        &mut self,
        mesh: &Mesh,
        uniform: &U,
        vertex_shader: &dyn VertexShader<U>,
        fragment_shader: &dyn FragmentShader<U>,
        num_attr_out: usize,
    ) -> sr_core::Result<usize> {
        let framebuffer =
            Framebuffer::new(self.width, self.height, &mut self.colors, &mut self.depths)?;
        let mut pipe = PipelineContext::new(framebuffer, uniform, vertex_shader, fragment_shader)
            .with_vertices(&mesh.vertices, mesh.stride)
            .with_num_attr_out(num_attr_out);

        let written = pipe.draw_indexed(&mesh.indices, PrimitiveType::TriangleList)?;
        log::trace!("frame: {} pixels written", written);
        Ok(written)
    }

    /// Queue the frame to `writer`, one text row per two pixel rows
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.height / 2 {
            let upper = &self.colors[2 * row * self.width..][..self.width];
            let lower = &self.colors[(2 * row + 1) * self.width..][..self.width];
            for (&top, &bottom) in upper.iter().zip(lower) {
                writer.queue(SetForegroundColor(rgb(top)))?;
                writer.queue(SetBackgroundColor(rgb(bottom)))?;
                writer.queue(Print('▀'))?;
            }
            writer.queue(ResetColor)?;
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn rgb(color: u32) -> Color {
    let (_, r, g, b) = channels(color);
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};
    use sr_core::{argb, ColorShader, StdUniform, Transform};

    #[test]
    fn test_pixel_grid_is_twice_as_tall() {
        let renderer = TerminalRenderer::new(10, 4);
        assert_eq!(renderer.width(), 10);
        assert_eq!(renderer.height(), 8);
        assert_eq!(renderer.colors().len(), 80);
        assert_eq!(renderer.camera().viewport.height, 8);
    }

    #[test]
    fn test_render_cube_front_face() {
        let mut renderer = TerminalRenderer::new(32, 16);
        let camera = renderer.camera();
        let view = Transform::look_at(
            &Point3::new(0.0, 0.0, 3.0),
            &Point3::origin(),
            &Vector3::y(),
        );
        let mvp = Transform::mvp_matrix(
            &nalgebra::Matrix4::identity(),
            &view,
            &camera.projection_matrix(),
        );
        let uniform = StdUniform::new(mvp);

        let written = renderer
            .render_mesh(
                &Mesh::cube(1.0),
                &uniform,
                &ColorShader,
                &ColorShader,
                ColorShader::NUM_ATTR_OUT,
            )
            .unwrap();
        assert!(written > 0);
        assert_eq!(renderer.colors()[16 * 32 + 16], argb(255, 230, 60, 60));

        renderer.clear();
        assert!(renderer.colors().iter().all(|&c| c == CLEAR_COLOR));
    }

    #[test]
    fn test_draw_emits_one_glyph_per_cell() {
        let renderer = TerminalRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('▀').count(), 6);
        assert_eq!(text.matches("\r\n").count(), 2);
    }
}
