//! Caller-owned color and depth targets, and the depth-tested compositor

use crate::error::{PipelineError, Result};

/// A borrowed framebuffer: packed ARGB colors plus a parallel depth grid.
///
/// The pipeline writes in place and never reallocates. Both buffers are
/// row-major with `width * height` entries.
pub struct Framebuffer<'a> {
    width: usize,
    height: usize,
    colors: &'a mut [u32],
    depths: &'a mut [f32],
}

impl<'a> Framebuffer<'a> {
    pub fn new(
        width: usize,
        height: usize,
        colors: &'a mut [u32],
        depths: &'a mut [f32],
    ) -> Result<Self> {
        let size = width.checked_mul(height);
        if size != Some(colors.len()) || size != Some(depths.len()) {
            return Err(PipelineError::FramebufferSize {
                width,
                height,
                colors: colors.len(),
                depths: depths.len(),
            });
        }

        Ok(Self {
            width,
            height,
            colors,
            depths,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every pixel to `color` and every depth to `depth`
    pub fn clear(&mut self, color: u32, depth: f32) {
        self.colors.fill(color);
        self.depths.fill(depth);
    }

    pub fn colors(&self) -> &[u32] {
        self.colors
    }

    pub fn depths(&self) -> &[f32] {
        self.depths
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<u32> {
        self.index(x as i64, y as i64).map(|i| self.colors[i])
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x as i64, y as i64).map(|i| self.depths[i])
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Depth-test a fragment and composite it on pass.
    ///
    /// Out-of-bounds pixels are skipped. The fragment passes only when
    /// `depth` is strictly less than the stored depth, so equal depths keep
    /// the first writer. `shade` runs only for passing fragments.
    ///
    /// Returns whether the pixel was written.
    #[inline]
    pub fn composite<F>(&mut self, x: i64, y: i64, depth: f32, shade: F) -> bool
    where
        F: FnOnce() -> u32,
    {
        let Some(idx) = self.index(x, y) else {
            return false;
        };

        if depth < self.depths[idx] {
            self.colors[idx] = shade();
            self.depths[idx] = depth;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch() {
        let mut colors = vec![0u32; 4];
        let mut depths = vec![0.0f32; 3];
        let err = Framebuffer::new(2, 2, &mut colors, &mut depths).err();
        assert_eq!(
            err,
            Some(PipelineError::FramebufferSize {
                width: 2,
                height: 2,
                colors: 4,
                depths: 3,
            })
        );
    }

    #[test]
    fn test_size_overflow() {
        let err = Framebuffer::new(usize::MAX, 2, &mut [], &mut []).err();
        assert_eq!(
            err,
            Some(PipelineError::FramebufferSize {
                width: usize::MAX,
                height: 2,
                colors: 0,
                depths: 0,
            })
        );
    }

    #[test]
    fn test_clear() {
        let mut colors = vec![0u32; 6];
        let mut depths = vec![0.0f32; 6];
        let mut fb = Framebuffer::new(3, 2, &mut colors, &mut depths).unwrap();
        fb.clear(0xFF00_0000, f32::INFINITY);
        assert_eq!(fb.color_at(2, 1), Some(0xFF00_0000));
        assert_eq!(fb.depth_at(0, 0), Some(f32::INFINITY));
        assert_eq!(fb.color_at(3, 0), None);
    }

    #[test]
    fn test_closer_wins() {
        let mut colors = vec![0u32; 1];
        let mut depths = vec![1.0f32; 1];
        let mut fb = Framebuffer::new(1, 1, &mut colors, &mut depths).unwrap();

        assert!(fb.composite(0, 0, 0.5, || 1));
        assert!(!fb.composite(0, 0, 0.7, || 2));
        assert_eq!(fb.color_at(0, 0), Some(1));
        assert_eq!(fb.depth_at(0, 0), Some(0.5));
    }

    #[test]
    fn test_equal_depth_keeps_first() {
        let mut colors = vec![0u32; 1];
        let mut depths = vec![1.0f32; 1];
        let mut fb = Framebuffer::new(1, 1, &mut colors, &mut depths).unwrap();

        assert!(fb.composite(0, 0, 0.5, || 1));
        let mut shaded = false;
        assert!(!fb.composite(0, 0, 0.5, || {
            shaded = true;
            2
        }));
        assert!(!shaded);
        assert_eq!(fb.color_at(0, 0), Some(1));
    }

    #[test]
    fn test_out_of_bounds_skipped() {
        let mut colors = vec![0u32; 4];
        let mut depths = vec![1.0f32; 4];
        let mut fb = Framebuffer::new(2, 2, &mut colors, &mut depths).unwrap();

        assert!(!fb.composite(-1, 0, 0.0, || 7));
        assert!(!fb.composite(0, 2, 0.0, || 7));
        assert!(!fb.composite(2, 0, 0.0, || 7));
        assert!(fb.colors().iter().all(|&c| c == 0));
    }
}
