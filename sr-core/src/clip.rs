//! Homogeneous clip-space clipping
//!
//! Primitives are clipped against five half-spaces of the view volume before
//! the perspective divide:
//!
//! ```text
//! x >= -w   (left)      x <= w   (right)
//! y >= -w   (bottom)    y <= w   (top)
//! z >= -w   (near)
//! ```
//!
//! Triangles go through Sutherland-Hodgman plane by plane, lines have their
//! outside endpoints pulled onto the plane, points are accepted or rejected
//! whole. A vertex lying exactly on a plane counts as inside.

use bitflags::bitflags;

use crate::vertex::ClipVertex;

/// A triangle gains at most one vertex per clip plane
pub const MAX_CLIP_VERTICES: usize = 3 + 5;

bitflags! {
    /// Outcode: one bit per violated clip plane
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClipPlanes: u8 {
        const LEFT = 1 << 0;
        const BOTTOM = 1 << 1;
        const NEAR = 1 << 2;
        const RIGHT = 1 << 3;
        const TOP = 1 << 4;
    }
}

/// A single plane of the view volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipPlane {
    Left,
    Bottom,
    Near,
    Right,
    Top,
}

impl ClipPlane {
    /// Order planes are applied in
    pub const ORDER: [ClipPlane; 5] = [
        ClipPlane::Near,
        ClipPlane::Left,
        ClipPlane::Right,
        ClipPlane::Bottom,
        ClipPlane::Top,
    ];

    pub fn bit(self) -> ClipPlanes {
        match self {
            Self::Left => ClipPlanes::LEFT,
            Self::Bottom => ClipPlanes::BOTTOM,
            Self::Near => ClipPlanes::NEAR,
            Self::Right => ClipPlanes::RIGHT,
            Self::Top => ClipPlanes::TOP,
        }
    }

    /// Signed distance to the plane; non-negative means inside
    pub fn signed_distance(self, v: &ClipVertex) -> f32 {
        let w = v.w();
        match self {
            Self::Left => w + v.x(),
            Self::Right => w - v.x(),
            Self::Bottom => w + v.y(),
            Self::Top => w - v.y(),
            Self::Near => w + v.z(),
        }
    }
}

/// Compute the outcode of a vertex
pub fn outcode(v: &ClipVertex) -> ClipPlanes {
    ClipPlane::ORDER
        .iter()
        .filter(|plane| plane.signed_distance(v) < 0.0)
        .fold(ClipPlanes::empty(), |code, plane| code | plane.bit())
}

/// Intersection parameter on the edge from `d0` to `d1`.
///
/// Only called when the endpoints lie on opposite sides, so `d0 - d1` is
/// never zero.
fn intersection(d0: f32, d1: f32) -> f32 {
    d0 / (d0 - d1)
}

#[derive(Clone, Copy)]
struct PolygonBuffer {
    vertices: [ClipVertex; MAX_CLIP_VERTICES],
    len: usize,
}

impl PolygonBuffer {
    fn new() -> Self {
        Self {
            vertices: [ClipVertex::new(0); MAX_CLIP_VERTICES],
            len: 0,
        }
    }

    fn push(&mut self, v: ClipVertex) {
        // Convex input never overflows; rounding on near-degenerate input may
        if self.len < MAX_CLIP_VERTICES {
            self.vertices[self.len] = v;
            self.len += 1;
        }
    }

    fn as_slice(&self) -> &[ClipVertex] {
        &self.vertices[..self.len]
    }
}

/// One Sutherland-Hodgman pass of `src` against `plane` into `dst`
fn clip_pass(plane: ClipPlane, src: &PolygonBuffer, dst: &mut PolygonBuffer) {
    dst.len = 0;
    let verts = src.as_slice();

    for (i, current) in verts.iter().enumerate() {
        let next = &verts[(i + 1) % verts.len()];
        let d0 = plane.signed_distance(current);
        let d1 = plane.signed_distance(next);
        let current_inside = d0 >= 0.0;
        let next_inside = d1 >= 0.0;

        if current_inside {
            dst.push(*current);
        }
        if current_inside != next_inside {
            dst.push(current.lerp(next, intersection(d0, d1)));
        }
    }
}

/// Clips primitives against the view volume.
///
/// Holds two fixed-capacity polygon buffers that successive plane passes
/// ping-pong between, so clipping never allocates.
pub struct Clipper {
    buffers: [PolygonBuffer; 2],
    current: usize,
}

impl Clipper {
    pub fn new() -> Self {
        Self {
            buffers: [PolygonBuffer::new(); 2],
            current: 0,
        }
    }

    /// Clip a triangle, returning the resulting convex polygon.
    ///
    /// The polygon keeps the input winding. It is empty when the triangle is
    /// entirely outside, and equal to the input when entirely inside.
    pub fn clip_triangle(&mut self, triangle: &[ClipVertex; 3]) -> &[ClipVertex] {
        let codes = [
            outcode(&triangle[0]),
            outcode(&triangle[1]),
            outcode(&triangle[2]),
        ];
        let union = codes[0] | codes[1] | codes[2];
        let shared = codes[0] & codes[1] & codes[2];

        self.current = 0;
        self.buffers[0].len = 0;

        if !shared.is_empty() {
            log::trace!("triangle rejected by outcode {:?}", shared);
            return &[];
        }

        for v in triangle {
            self.buffers[0].push(*v);
        }

        for plane in ClipPlane::ORDER {
            if !union.contains(plane.bit()) {
                continue;
            }

            let (front, back) = self.buffers.split_at_mut(1);
            let (src, dst) = if self.current == 0 {
                (&front[0], &mut back[0])
            } else {
                (&back[0], &mut front[0])
            };
            clip_pass(plane, src, dst);
            self.current ^= 1;

            if self.buffers[self.current].len < 3 {
                self.buffers[self.current].len = 0;
                return &[];
            }
        }

        self.buffers[self.current].as_slice()
    }

    /// Clip a line segment, moving outside endpoints onto the violated planes
    pub fn clip_line(&self, a: &ClipVertex, b: &ClipVertex) -> Option<[ClipVertex; 2]> {
        let (code_a, code_b) = (outcode(a), outcode(b));
        if !(code_a & code_b).is_empty() {
            log::trace!("line rejected by outcode {:?}", code_a & code_b);
            return None;
        }

        let union = code_a | code_b;
        let (mut a, mut b) = (*a, *b);

        for plane in ClipPlane::ORDER {
            if !union.contains(plane.bit()) {
                continue;
            }

            let d0 = plane.signed_distance(&a);
            let d1 = plane.signed_distance(&b);
            match (d0 >= 0.0, d1 >= 0.0) {
                (true, true) => {}
                (false, false) => return None,
                (false, true) => a = a.lerp(&b, intersection(d0, d1)),
                (true, false) => b = a.lerp(&b, intersection(d0, d1)),
            }
        }

        Some([a, b])
    }

    /// Points survive only when inside every plane
    pub fn clip_point(&self, v: &ClipVertex) -> Option<ClipVertex> {
        outcode(v).is_empty().then_some(*v)
    }
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vert(x: f32, y: f32, z: f32, w: f32, attr: f32) -> ClipVertex {
        ClipVertex::from_parts([x, y, z, w], &[attr])
    }

    #[test]
    fn test_outcode_bits() {
        assert_eq!(ClipPlanes::LEFT.bits(), 1);
        assert_eq!(ClipPlanes::BOTTOM.bits(), 2);
        assert_eq!(ClipPlanes::NEAR.bits(), 4);
        assert_eq!(ClipPlanes::RIGHT.bits(), 8);
        assert_eq!(ClipPlanes::TOP.bits(), 16);

        assert!(outcode(&vert(0.0, 0.0, 0.0, 1.0, 0.0)).is_empty());
        assert_eq!(
            outcode(&vert(-2.0, 2.0, 0.0, 1.0, 0.0)),
            ClipPlanes::LEFT | ClipPlanes::TOP
        );
        assert_eq!(outcode(&vert(0.0, 0.0, -2.0, 1.0, 0.0)), ClipPlanes::NEAR);
    }

    #[test]
    fn test_on_plane_is_inside() {
        assert!(outcode(&vert(1.0, -1.0, -1.0, 1.0, 0.0)).is_empty());
    }

    #[test]
    fn test_inside_triangle_unchanged() {
        let tri = [
            vert(-0.5, -0.5, 0.0, 1.0, 1.0),
            vert(0.5, -0.5, 0.0, 1.0, 2.0),
            vert(0.0, 0.5, 0.0, 1.0, 3.0),
        ];
        let mut clipper = Clipper::new();
        assert_eq!(clipper.clip_triangle(&tri), &tri[..]);
    }

    #[test]
    fn test_outside_triangle_rejected() {
        let tri = [
            vert(2.0, 0.0, 0.0, 1.0, 0.0),
            vert(3.0, 0.0, 0.0, 1.0, 0.0),
            vert(2.5, 0.5, 0.0, 1.0, 0.0),
        ];
        let mut clipper = Clipper::new();
        assert!(clipper.clip_triangle(&tri).is_empty());
    }

    #[test]
    fn test_behind_near_plane_rejected() {
        let tri = [
            vert(0.0, 0.0, -3.0, 1.0, 0.0),
            vert(0.5, 0.0, -2.0, 1.0, 0.0),
            vert(0.0, 0.5, -4.0, 1.0, 0.0),
        ];
        let mut clipper = Clipper::new();
        assert!(clipper.clip_triangle(&tri).is_empty());
    }

    #[test]
    fn test_vertex_behind_eye_clipped_at_near_plane() {
        let tri = [
            vert(-0.5, -0.5, 0.0, 1.0, 1.0),
            vert(0.5, -0.5, 0.0, 1.0, 1.0),
            vert(0.0, 2.0, -3.0, -1.0, 1.0),
        ];
        let mut clipper = Clipper::new();
        let poly = clipper.clip_triangle(&tri);
        assert_eq!(poly.len(), 4);

        for v in poly {
            assert!(v.w() > 0.0, "w = {}", v.w());
            assert!(v.z() + v.w() > -1e-5);
            assert!((v.attrs()[0] - 1.0).abs() < 1e-6);
        }

        // Both new vertices lie on the near plane at w = 0.6
        for v in &poly[2..] {
            assert!((v.w() - 0.6).abs() < 1e-5);
            assert!((v.z() / v.w() + 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_one_vertex_outside_yields_quad() {
        let tri = [
            vert(0.0, 0.0, 0.0, 1.0, 0.0),
            vert(2.0, 0.0, 0.0, 1.0, 4.0),
            vert(0.0, 0.5, 0.0, 1.0, 0.0),
        ];
        let mut clipper = Clipper::new();
        let poly = clipper.clip_triangle(&tri);
        assert_eq!(poly.len(), 4);
        assert!(poly.iter().all(|v| outcode(v).is_empty()));

        // The edge (v0, v1) crosses x = w at t = 0.5
        let hit = poly[1];
        assert!((hit.x() - 1.0).abs() < 1e-6);
        assert!((hit.attrs()[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_two_vertices_outside_yields_triangle() {
        let tri = [
            vert(0.0, 0.0, 0.0, 1.0, 0.0),
            vert(2.0, 0.0, 0.0, 1.0, 0.0),
            vert(2.0, 0.5, 0.0, 1.0, 0.0),
        ];
        let mut clipper = Clipper::new();
        assert_eq!(clipper.clip_triangle(&tri).len(), 3);
    }

    #[test]
    fn test_vertex_on_plane_keeps_triangle() {
        let tri = [
            vert(1.0, 0.0, 0.0, 1.0, 0.0),
            vert(0.0, 0.5, 0.0, 1.0, 0.0),
            vert(0.0, -0.5, 0.0, 1.0, 0.0),
        ];
        let mut clipper = Clipper::new();
        assert_eq!(clipper.clip_triangle(&tri).len(), 3);
    }

    #[test]
    fn test_large_triangle_grows_polygon() {
        // Covers the whole view volume, crossing all four side planes
        let tri = [
            vert(-10.0, -10.0, 0.0, 1.0, 0.0),
            vert(10.0, -10.0, 0.0, 1.0, 0.0),
            vert(0.0, 10.0, 0.0, 1.0, 0.0),
        ];
        let mut clipper = Clipper::new();
        let poly = clipper.clip_triangle(&tri);
        assert!(poly.len() >= 4);
        assert!(poly.len() <= MAX_CLIP_VERTICES);
        for v in poly {
            assert!(v.x().abs() <= 1.0 + 1e-5);
            assert!(v.y().abs() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_line_clamped_to_plane() {
        let clipper = Clipper::new();
        let a = vert(0.0, 0.0, 0.0, 1.0, 0.0);
        let b = vert(3.0, 0.0, 0.0, 1.0, 6.0);
        let [a2, b2] = clipper.clip_line(&a, &b).unwrap();
        assert_eq!(a2, a);
        assert!((b2.x() - 1.0).abs() < 1e-6);
        assert!((b2.attrs()[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_line_rejected() {
        let clipper = Clipper::new();
        let a = vert(0.0, 2.0, 0.0, 1.0, 0.0);
        let b = vert(0.5, 3.0, 0.0, 1.0, 0.0);
        assert!(clipper.clip_line(&a, &b).is_none());
    }

    #[test]
    fn test_point_clipping() {
        let clipper = Clipper::new();
        assert!(clipper.clip_point(&vert(0.0, 0.0, 0.0, 1.0, 0.0)).is_some());
        assert!(clipper.clip_point(&vert(0.0, 0.0, -1.5, 1.0, 0.0)).is_none());
    }

    proptest! {
        #[test]
        fn prop_inside_triangle_is_identity(
            coords in prop::array::uniform9(-0.99f32..0.99f32),
            w in 1.0f32..10.0f32,
        ) {
            let tri = [
                vert(coords[0] * w, coords[1] * w, coords[2] * w, w, 0.0),
                vert(coords[3] * w, coords[4] * w, coords[5] * w, w, 1.0),
                vert(coords[6] * w, coords[7] * w, coords[8] * w, w, 2.0),
            ];
            let mut clipper = Clipper::new();
            prop_assert_eq!(clipper.clip_triangle(&tri), &tri[..]);
        }

        #[test]
        fn prop_intersection_attributes_are_linear(
            x0 in -0.9f32..0.9f32,
            x1 in 1.5f32..8.0f32,
            a0 in -100.0f32..100.0f32,
            a1 in -100.0f32..100.0f32,
        ) {
            let a = vert(x0, 0.0, 0.0, 1.0, a0);
            let b = vert(x1, 0.0, 0.0, 1.0, a1);
            let clipper = Clipper::new();
            let [_, hit] = clipper.clip_line(&a, &b).unwrap();
            let t = (1.0 - x0) / (x1 - x0);
            let expected = a0 + t * (a1 - a0);
            prop_assert!((hit.attrs()[0] - expected).abs() < 1e-3);
            prop_assert!((hit.x() - 1.0).abs() < 1e-5);
        }
    }
}
