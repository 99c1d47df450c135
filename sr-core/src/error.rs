//! Error type for pipeline configuration failures

use thiserror::Error;

/// Configuration errors detected before any pixel work.
///
/// Geometric degeneracies (clipped-away primitives, zero-area triangles,
/// culled faces, failed depth tests) are not errors and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("output attribute count {count} exceeds the maximum of {max}")]
    TooManyAttributes { count: usize, max: usize },

    #[error("input vertices need at least 3 position floats, got {count}")]
    TooFewInputAttributes { count: usize },

    #[error("index {index} is out of range for {num_pts} vertices")]
    IndexOutOfRange { index: usize, num_pts: usize },

    #[error("vertex buffer holds {len} floats, {required} required")]
    VertexBufferTooShort { len: usize, required: usize },

    #[error("unknown primitive type code {0:#x}")]
    UnknownPrimitiveType(u32),

    #[error("framebuffer {width}x{height} does not match buffers ({colors} colors, {depths} depths)")]
    FramebufferSize {
        width: usize,
        height: usize,
        colors: usize,
        depths: usize,
    },

    #[error("texture {width}x{height} does not match {len} texels")]
    TextureSize {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("{stage} expects {expected} attributes, got {found}")]
    AttributeCountMismatch {
        stage: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("textured fragment shader bound without a texture")]
    MissingTexture,

    #[error("matrix is not invertible")]
    SingularMatrix,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
