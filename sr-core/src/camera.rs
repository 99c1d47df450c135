//! Camera parameters and projection utilities

use nalgebra::Matrix4;

/// Pixel rectangle the normalized device coordinates map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A viewport covering a whole `width` x `height` target
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Map normalized device coordinates to screen space.
    ///
    /// Pixel centres sit on integer coordinates, so NDC -1 lands half a pixel
    /// outside the first pixel. Screen y grows downwards. Depth maps
    /// `[-1, 1]` onto `[0, 1]`.
    pub fn to_screen(&self, ndc_x: f32, ndc_y: f32, ndc_z: f32) -> (f32, f32, f32) {
        let sx = self.x as f32 + (ndc_x + 1.0) * 0.5 * self.width as f32 - 0.5;
        let sy = self.y as f32 + (1.0 - ndc_y) * 0.5 * self.height as f32 - 0.5;
        let depth = ndc_z * 0.5 + 0.5;
        (sx, sy, depth)
    }

    /// Whether pixel `(x, y)` lies inside the viewport rectangle
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let (left, top) = (self.x as i64, self.y as i64);
        x >= left && y >= top && x < left + self.width as i64 && y < top + self.height as i64
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub viewport: Viewport,
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in radians
    pub fov: f32,
}

impl Camera {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            viewport: Viewport::full(width, height),
            near: 0.1,
            far: 100.0,
            fov: std::f32::consts::PI / 4.0, // 45 degrees
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport.height == 0 {
            return 1.0;
        }
        self.viewport.width as f32 / self.viewport.height as f32
    }

    /// Create the perspective projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect(), self.fov, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.viewport, Viewport::full(800, 600));
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_near_plane() {
        let camera = Camera::default();
        let clip = camera.projection_matrix() * Vector4::new(0.0, 0.0, -camera.near, 1.0);
        // The near plane lands exactly on z = -w
        assert!((clip.z + clip.w).abs() < 1e-5);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn test_viewport_corners() {
        let vp = Viewport::full(8, 4);
        assert_eq!(vp.to_screen(-1.0, 1.0, -1.0), (-0.5, -0.5, 0.0));
        assert_eq!(vp.to_screen(1.0, -1.0, 1.0), (7.5, 3.5, 1.0));
        assert_eq!(vp.to_screen(0.0, 0.0, 0.0), (3.5, 1.5, 0.5));
    }

    #[test]
    fn test_viewport_offset() {
        let vp = Viewport::new(10, 20, 4, 4);
        let (x, y, _) = vp.to_screen(-1.0, 1.0, 0.0);
        assert_eq!((x, y), (9.5, 19.5));
    }

    #[test]
    fn test_viewport_contains() {
        let vp = Viewport::new(2, 1, 4, 3);
        assert!(vp.contains(2, 1));
        assert!(vp.contains(5, 3));
        assert!(!vp.contains(6, 3));
        assert!(!vp.contains(5, 4));
        assert!(!vp.contains(1, 1));
        assert!(!vp.contains(2, 0));
    }
}
