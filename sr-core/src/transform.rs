//! Model, view and projection matrix helpers
//!
//! These sit outside the pipeline: callers build a model-view-projection
//! matrix here and hand it to the vertex shader through uniform data.

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::error::{PipelineError, Result};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: X, Y, Z
        rz * ry * rx
    }

    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Right-handed view matrix looking from `eye` towards `target`
    pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(eye, target, up)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }

    /// Invert a matrix, failing instead of producing NaNs
    pub fn inverse(m: &Matrix4<f32>) -> Result<Matrix4<f32>> {
        m.try_inverse().ok_or(PipelineError::SingularMatrix)
    }

    /// Inverse-transpose of the upper 3x3 block, for transforming normals
    pub fn normal_matrix(model: &Matrix4<f32>) -> Result<Matrix3<f32>> {
        let upper: Matrix3<f32> = model.fixed_view::<3, 3>(0, 0).into_owned();
        upper
            .try_inverse()
            .map(|inv| inv.transpose())
            .ok_or(PipelineError::SingularMatrix)
    }
}
