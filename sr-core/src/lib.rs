//! SR Core Library - Software rendering pipeline
//!
//! This library turns indexed geometry into depth-tested pixels without a
//! hardware rasterizer: pluggable vertex and fragment shaders, homogeneous
//! clipping, perspective-correct rasterization and a caller-owned
//! framebuffer. Matrix helpers, a camera and built-in shaders sit alongside
//! the pipeline for callers that want them.

pub mod camera;
pub mod clip;
pub mod color;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod pipeline;
pub mod primitive;
pub mod raster;
pub mod shader;
pub mod shaders;
pub mod transform;
pub mod vertex;

// Re-export commonly used types
pub use camera::{Camera, Viewport};
pub use clip::{ClipPlanes, Clipper, MAX_CLIP_VERTICES};
pub use color::{argb, channels};
pub use error::{PipelineError, Result};
pub use framebuffer::Framebuffer;
pub use geometry::Mesh;
pub use pipeline::PipelineContext;
pub use primitive::{
    PrimitiveType, MAX_ATTRIBUTE_COUNT, PRIMITIVE_SIZE_LINE, PRIMITIVE_SIZE_POINT,
    PRIMITIVE_SIZE_TRIANGLE,
};
pub use raster::{CullMode, WindingOrder};
pub use shader::{FragmentShader, VertexShader};
pub use shaders::{ColorShader, StdUniform, Texture, TextureShader};
pub use transform::{RotationState, Transform};
pub use vertex::ClipVertex;
