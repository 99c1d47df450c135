//! Indexed geometry ready to feed the pipeline

use crate::shaders::{ColorShader, TextureShader};

/// An indexed mesh: a flat vertex buffer with a fixed stride and an index
/// array referencing it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    /// Floats per vertex
    pub stride: usize,
    pub indices: Vec<usize>,
}

/// Face colors of [`Mesh::cube`] as `[a, r, g, b]`
const CUBE_FACE_COLORS: [[f32; 4]; 6] = [
    [255.0, 230.0, 60.0, 60.0],
    [255.0, 60.0, 200.0, 80.0],
    [255.0, 60.0, 120.0, 230.0],
    [255.0, 230.0, 200.0, 60.0],
    [255.0, 200.0, 80.0, 220.0],
    [255.0, 70.0, 210.0, 210.0],
];

impl Mesh {
    pub fn new(stride: usize) -> Self {
        Self {
            vertices: Vec::new(),
            stride,
            indices: Vec::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        if self.stride == 0 {
            return 0;
        }
        self.vertices.len() / self.stride
    }

    /// Append one vertex, returning its index
    pub fn push_vertex(&mut self, vertex: &[f32]) -> usize {
        debug_assert_eq!(vertex.len(), self.stride);
        self.vertices.extend_from_slice(vertex);
        self.num_vertices() - 1
    }

    /// Append a quad given in counter-clockwise order as two triangles
    fn push_quad(&mut self, corners: [&[f32]; 4]) {
        let base = self.num_vertices();
        for corner in corners {
            self.push_vertex(corner);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// A cube centred on the origin with one solid color per face.
    ///
    /// Vertices use the [`ColorShader`] layout; faces wind counter-clockwise
    /// seen from outside.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::new(ColorShader::NUM_ATTR_IN);

        let faces: [[[f32; 3]; 4]; 6] = [
            // Front (+z)
            [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
            // Back (-z)
            [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
            // Right (+x)
            [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
            // Left (-x)
            [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
            // Top (+y)
            [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
            // Bottom (-y)
            [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
        ];

        for (face, color) in faces.iter().zip(CUBE_FACE_COLORS) {
            let corners = (*face).map(|[x, y, z]| [x, y, z, color[0], color[1], color[2], color[3]]);
            mesh.push_quad([&corners[0], &corners[1], &corners[2], &corners[3]]);
        }

        mesh
    }

    /// A square in the z = 0 plane facing +z, in the [`TextureShader`]
    /// layout. `v` runs from 0 at the top edge to 1 at the bottom.
    pub fn quad(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::new(TextureShader::NUM_ATTR_IN);
        mesh.push_quad([
            &[-h, -h, 0.0, 0.0, 1.0],
            &[h, -h, 0.0, 1.0, 1.0],
            &[h, h, 0.0, 1.0, 0.0],
            &[-h, h, 0.0, 0.0, 0.0],
        ]);
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn position(mesh: &Mesh, index: usize) -> Vector3<f32> {
        let v = &mesh.vertices[index * mesh.stride..];
        Vector3::new(v[0], v[1], v[2])
    }

    #[test]
    fn test_cube_layout() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.stride, 7);
        assert_eq!(cube.num_vertices(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| i < cube.num_vertices()));
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let cube = Mesh::cube(2.0);
        for tri in cube.indices.chunks_exact(3) {
            let (a, b, c) = (
                position(&cube, tri[0]),
                position(&cube, tri[1]),
                position(&cube, tri[2]),
            );
            let normal = (b - a).cross(&(c - a));
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_quad_layout() {
        let quad = Mesh::quad(1.0);
        assert_eq!(quad.stride, 5);
        assert_eq!(quad.num_vertices(), 4);
        assert_eq!(quad.indices, vec![0, 1, 2, 0, 2, 3]);
    }
}
