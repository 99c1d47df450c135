//! Fixed-capacity clip-space vertex records

use crate::primitive::MAX_ATTRIBUTE_COUNT;

/// Floats reserved for the homogeneous position (x, y, z, w)
pub const POSITION_LEN: usize = 4;

/// Capacity of one vertex record
pub const VERTEX_CAPACITY: usize = POSITION_LEN + MAX_ATTRIBUTE_COUNT;

/// A shaded vertex: clip-space position followed by its attributes.
///
/// Stored inline so clipping and rasterization never touch the heap. Only the
/// first `len` floats are meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    data: [f32; VERTEX_CAPACITY],
    len: usize,
}

impl ClipVertex {
    /// Create a zeroed vertex carrying `num_attr` attributes
    ///
    /// # Panics
    ///
    /// Panics if `num_attr` exceeds [`MAX_ATTRIBUTE_COUNT`]. The pipeline
    /// rejects such configurations before any vertex is built.
    pub fn new(num_attr: usize) -> Self {
        assert!(num_attr <= MAX_ATTRIBUTE_COUNT);
        Self {
            data: [0.0; VERTEX_CAPACITY],
            len: POSITION_LEN + num_attr,
        }
    }

    /// Build a vertex from a position and attribute slice
    pub fn from_parts(position: [f32; 4], attrs: &[f32]) -> Self {
        let mut v = Self::new(attrs.len());
        v.data[..POSITION_LEN].copy_from_slice(&position);
        v.data[POSITION_LEN..v.len].copy_from_slice(attrs);
        v
    }

    pub fn position(&self) -> [f32; 4] {
        [self.data[0], self.data[1], self.data[2], self.data[3]]
    }

    pub fn x(&self) -> f32 {
        self.data[0]
    }

    pub fn y(&self) -> f32 {
        self.data[1]
    }

    pub fn z(&self) -> f32 {
        self.data[2]
    }

    pub fn w(&self) -> f32 {
        self.data[3]
    }

    pub fn num_attr(&self) -> usize {
        self.len - POSITION_LEN
    }

    pub fn attrs(&self) -> &[f32] {
        &self.data[POSITION_LEN..self.len]
    }

    pub fn attrs_mut(&mut self) -> &mut [f32] {
        &mut self.data[POSITION_LEN..self.len]
    }

    /// The whole record, `4 + num_attr` floats
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data[..self.len]
    }

    /// Linearly interpolate every float of the record towards `other`.
    ///
    /// Used for new vertices created on clip-plane intersections, before the
    /// perspective divide.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let mut out = *self;
        for (o, (a, b)) in out.data[..self.len]
            .iter_mut()
            .zip(self.data.iter().zip(other.data.iter()))
        {
            *o = a + t * (b - a);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let v = ClipVertex::from_parts([1.0, 2.0, 3.0, 4.0], &[5.0, 6.0]);
        assert_eq!(v.position(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v.attrs(), &[5.0, 6.0]);
        assert_eq!(v.as_slice().len(), 6);
        assert_eq!(v.num_attr(), 2);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = ClipVertex::from_parts([0.0, 0.0, 0.0, 1.0], &[1.0]);
        let b = ClipVertex::from_parts([2.0, 4.0, 0.0, 1.0], &[3.0]);
        let m = a.lerp(&b, 0.5);
        assert_eq!(m.position(), [1.0, 2.0, 0.0, 1.0]);
        assert!((m.attrs()[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_max_attributes() {
        let v = ClipVertex::new(MAX_ATTRIBUTE_COUNT);
        assert_eq!(v.as_slice().len(), VERTEX_CAPACITY);
    }

    #[test]
    #[should_panic]
    fn test_too_many_attributes_panics() {
        let _ = ClipVertex::new(MAX_ATTRIBUTE_COUNT + 1);
    }
}
