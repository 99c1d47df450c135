//! Screen-space rasterization of clipped primitives
//!
//! Takes clipped clip-space vertices through the perspective divide and the
//! viewport transform, then walks covered pixels and hands each one to the
//! framebuffer's depth-tested compositor.
//!
//! # Interpolation
//!
//! Attributes are perspective-correct: each vertex carries `attr / w` and
//! `1 / w`, both of which are affine in screen space. A pixel's attribute is
//! `lerp(attr / w) / lerp(1 / w)`. Depth is already `z / w` after the divide
//! and is interpolated directly.
//!
//! # Fill rule
//!
//! Pixel centres sit on integer coordinates. A pixel whose centre lies
//! exactly on a triangle edge is covered only when that edge is a top or a
//! left edge, so triangles sharing an edge never both write its pixels.

use crate::camera::Viewport;
use crate::clip::MAX_CLIP_VERTICES;
use crate::framebuffer::Framebuffer;
use crate::primitive::MAX_ATTRIBUTE_COUNT;
use crate::shader::FragmentShader;
use crate::vertex::{ClipVertex, POSITION_LEN, VERTEX_CAPACITY};

/// Vertex order that counts as front-facing, measured in normalized device
/// coordinates (y up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindingOrder {
    #[default]
    CounterClockwise,
    Clockwise,
}

/// Which faces are discarded before the pixel walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    Disabled,
    #[default]
    Back,
    Front,
}

/// A vertex after the perspective divide and viewport transform
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    inv_w: f32,
    /// Attributes pre-multiplied by `1 / w`
    attrs: [f32; MAX_ATTRIBUTE_COUNT],
    num_attr: usize,
}

impl ScreenVertex {
    const EMPTY: Self = Self {
        x: 0.0,
        y: 0.0,
        depth: 0.0,
        inv_w: 0.0,
        attrs: [0.0; MAX_ATTRIBUTE_COUNT],
        num_attr: 0,
    };

    /// Perspective divide and viewport transform.
    ///
    /// Returns `None` for vertices at or behind the eye (`w <= 0`), which
    /// the near plane normally removes already.
    pub(crate) fn project(v: &ClipVertex, viewport: &Viewport) -> Option<Self> {
        let w = v.w();
        if w <= f32::EPSILON || !w.is_finite() {
            return None;
        }

        let inv_w = 1.0 / w;
        let (x, y, depth) = viewport.to_screen(v.x() * inv_w, v.y() * inv_w, v.z() * inv_w);

        let mut attrs = [0.0; MAX_ATTRIBUTE_COUNT];
        for (dst, src) in attrs.iter_mut().zip(v.attrs()) {
            *dst = src * inv_w;
        }

        Some(Self {
            x,
            y,
            depth,
            inv_w,
            attrs,
            num_attr: v.num_attr(),
        })
    }
}

/// Signed area (doubled) of the triangle `a`, `b`, `p` in screen space.
///
/// Positive when `a -> b -> p` turns clockwise on screen (y down), which is
/// counter-clockwise in normalized device coordinates.
#[inline]
fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Whether the edge `a -> b` of a positively oriented triangle is a top or
/// left edge
#[inline]
fn is_top_left(a: &ScreenVertex, b: &ScreenVertex) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

#[inline]
fn covers(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

/// Nearest pixel to a screen coordinate, halves rounding up.
///
/// A vertex on the left or top clip plane lands half a pixel before the
/// first pixel centre and must still snap onto it.
#[inline]
fn snap(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Rasterizes clipped primitives into a framebuffer.
///
/// Holds the per-draw state the pixel walk needs; built once per draw call.
pub struct Rasterizer<'s, U: ?Sized> {
    pub viewport: Viewport,
    pub winding_order: WindingOrder,
    pub cull_mode: CullMode,
    uniform: &'s U,
    fragment_shader: &'s dyn FragmentShader<U>,
}

impl<'s, U: ?Sized> Rasterizer<'s, U> {
    pub fn new(
        viewport: Viewport,
        uniform: &'s U,
        fragment_shader: &'s dyn FragmentShader<U>,
    ) -> Self {
        Self {
            viewport,
            winding_order: WindingOrder::default(),
            cull_mode: CullMode::default(),
            uniform,
            fragment_shader,
        }
    }

    /// Run the fragment shader over a fragment record, returning its color
    fn shade(&self, fragment: &[f32]) -> u32 {
        let mut color = 0;
        self.fragment_shader.shade(self.uniform, fragment, &mut color);
        color
    }

    /// Whether a triangle with the given screen-space signed area is drawn
    fn keeps_face(&self, area: f32) -> bool {
        let front = match self.winding_order {
            WindingOrder::CounterClockwise => area > 0.0,
            WindingOrder::Clockwise => area < 0.0,
        };
        match self.cull_mode {
            CullMode::Disabled => true,
            CullMode::Back => front,
            CullMode::Front => !front,
        }
    }

    /// Fan-triangulate a clipped polygon from its first vertex and draw it.
    ///
    /// Returns the number of pixels written.
    pub fn draw_polygon(&self, fb: &mut Framebuffer<'_>, polygon: &[ClipVertex]) -> usize {
        if polygon.len() < 3 {
            return 0;
        }

        let mut screen = [ScreenVertex::EMPTY; MAX_CLIP_VERTICES];
        for (dst, v) in screen.iter_mut().zip(polygon) {
            match ScreenVertex::project(v, &self.viewport) {
                Some(s) => *dst = s,
                None => {
                    log::trace!("polygon dropped: vertex with w = {}", v.w());
                    return 0;
                }
            }
        }

        let n = polygon.len().min(MAX_CLIP_VERTICES);
        (1..n - 1)
            .map(|i| self.draw_triangle(fb, &screen[0], &screen[i], &screen[i + 1]))
            .sum()
    }

    fn draw_triangle(
        &self,
        fb: &mut Framebuffer<'_>,
        v0: &ScreenVertex,
        v1: &ScreenVertex,
        v2: &ScreenVertex,
    ) -> usize {
        let area = edge(v0, v1, v2.x, v2.y);
        if area == 0.0 || !area.is_finite() {
            log::trace!("degenerate triangle skipped");
            return 0;
        }
        if !self.keeps_face(area) {
            log::trace!("triangle culled (area {})", area);
            return 0;
        }

        // Walk with a positive orientation; the facing decision is made
        let (v1, v2, area) = if area < 0.0 {
            (v2, v1, -area)
        } else {
            (v1, v2, area)
        };

        // Bounding box, clamped to the viewport and the framebuffer
        let vp = &self.viewport;
        let right = (vp.x + vp.width).min(fb.width()) as i64 - 1;
        let bottom = (vp.y + vp.height).min(fb.height()) as i64 - 1;
        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i64).max(vp.x as i64);
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i64).min(right);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i64).max(vp.y as i64);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i64).min(bottom);

        let tl0 = is_top_left(v1, v2);
        let tl1 = is_top_left(v2, v0);
        let tl2 = is_top_left(v0, v1);
        let num_attr = v0.num_attr;
        let mut written = 0;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (px, py) = (x as f32, y as f32);
                let w0 = edge(v1, v2, px, py);
                let w1 = edge(v2, v0, px, py);
                let w2 = edge(v0, v1, px, py);
                if !(covers(w0, tl0) && covers(w1, tl1) && covers(w2, tl2)) {
                    continue;
                }

                let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);
                let depth = l0 * v0.depth + l1 * v1.depth + l2 * v2.depth;

                let hit = fb.composite(x, y, depth, || {
                    let inv_w = l0 * v0.inv_w + l1 * v1.inv_w + l2 * v2.inv_w;
                    let mut fragment = [0.0; VERTEX_CAPACITY];
                    fragment[..POSITION_LEN].copy_from_slice(&[px, py, depth, 1.0 / inv_w]);
                    for (k, out) in fragment[POSITION_LEN..POSITION_LEN + num_attr]
                        .iter_mut()
                        .enumerate()
                    {
                        let a = l0 * v0.attrs[k] + l1 * v1.attrs[k] + l2 * v2.attrs[k];
                        *out = a / inv_w;
                    }
                    self.shade(&fragment[..POSITION_LEN + num_attr])
                });
                written += hit as usize;
            }
        }

        written
    }

    /// Draw a clipped line segment by stepping along its major axis.
    ///
    /// Returns the number of pixels written.
    pub fn draw_line(&self, fb: &mut Framebuffer<'_>, a: &ClipVertex, b: &ClipVertex) -> usize {
        let (Some(a), Some(b)) = (
            ScreenVertex::project(a, &self.viewport),
            ScreenVertex::project(b, &self.viewport),
        ) else {
            log::trace!("line dropped: endpoint at or behind the eye");
            return 0;
        };

        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if !dx.is_finite() || !dy.is_finite() {
            return 0;
        }

        let steps = dx.abs().max(dy.abs()).round() as i64;
        let num_attr = a.num_attr;
        let mut written = 0;

        for i in 0..=steps {
            let t = if steps == 0 {
                0.0
            } else {
                i as f32 / steps as f32
            };
            let x = snap(a.x + t * dx);
            let y = snap(a.y + t * dy);
            if !self.viewport.contains(x as i64, y as i64) {
                continue;
            }
            let depth = a.depth + t * (b.depth - a.depth);

            let hit = fb.composite(x as i64, y as i64, depth, || {
                let inv_w = a.inv_w + t * (b.inv_w - a.inv_w);
                let mut fragment = [0.0; VERTEX_CAPACITY];
                fragment[..POSITION_LEN].copy_from_slice(&[x, y, depth, 1.0 / inv_w]);
                for (k, out) in fragment[POSITION_LEN..POSITION_LEN + num_attr]
                    .iter_mut()
                    .enumerate()
                {
                    let attr = a.attrs[k] + t * (b.attrs[k] - a.attrs[k]);
                    *out = attr / inv_w;
                }
                self.shade(&fragment[..POSITION_LEN + num_attr])
            });
            written += hit as usize;
        }

        written
    }

    /// Draw a single pixel at the rounded screen position of `v`.
    ///
    /// Attributes are passed through untouched. Pixels outside the viewport
    /// are skipped like those of lines and triangles.
    pub fn draw_point(&self, fb: &mut Framebuffer<'_>, v: &ClipVertex) -> usize {
        let Some(s) = ScreenVertex::project(v, &self.viewport) else {
            return 0;
        };

        let x = snap(s.x);
        let y = snap(s.y);
        if !self.viewport.contains(x as i64, y as i64) {
            return 0;
        }
        let hit = fb.composite(x as i64, y as i64, s.depth, || {
            let mut fragment = [0.0; VERTEX_CAPACITY];
            fragment[..POSITION_LEN].copy_from_slice(&[x, y, s.depth, v.w()]);
            fragment[POSITION_LEN..POSITION_LEN + v.num_attr()].copy_from_slice(v.attrs());
            self.shade(&fragment[..POSITION_LEN + v.num_attr()])
        });
        hit as usize
    }
}
