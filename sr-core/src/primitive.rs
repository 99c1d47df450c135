//! Primitive types and their stable codes

use crate::error::{PipelineError, Result};

/// Maximum number of output attributes a vertex shader may produce
pub const MAX_ATTRIBUTE_COUNT: usize = 32;

pub const PRIMITIVE_SIZE_POINT: usize = 1;
pub const PRIMITIVE_SIZE_LINE: usize = 2;
pub const PRIMITIVE_SIZE_TRIANGLE: usize = 3;

/// How an index array is grouped into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PrimitiveType {
    PointList = 0x1,
    LineList = 0x2,
    LineStrip = 0x3,
    TriangleList = 0x4,
    TriangleStrip = 0x5,
}

impl PrimitiveType {
    /// Decode a raw primitive type code
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0x1 => Ok(Self::PointList),
            0x2 => Ok(Self::LineList),
            0x3 => Ok(Self::LineStrip),
            0x4 => Ok(Self::TriangleList),
            0x5 => Ok(Self::TriangleStrip),
            other => Err(PipelineError::UnknownPrimitiveType(other)),
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    /// Number of vertices in one primitive of this type
    pub fn vertex_count(self) -> usize {
        match self {
            Self::PointList => PRIMITIVE_SIZE_POINT,
            Self::LineList | Self::LineStrip => PRIMITIVE_SIZE_LINE,
            Self::TriangleList | Self::TriangleStrip => PRIMITIVE_SIZE_TRIANGLE,
        }
    }

    /// Strips reuse the trailing vertices of the previous primitive
    pub fn is_strip(self) -> bool {
        matches!(self, Self::LineStrip | Self::TriangleStrip)
    }
}

impl TryFrom<u32> for PrimitiveType {
    type Error = PipelineError;

    fn try_from(code: u32) -> Result<Self> {
        Self::from_code(code)
    }
}
