//! Pin data types
//!
//! Every value flowing through a material graph has one of twelve data types:
//! a boolean, integer or float component, either alone or in a 2, 3 or 4 wide
//! vector. The tag drives runtime dispatch and GLSL type naming.

use serde::{Deserialize, Serialize};

use super::value::MaterialValue;

/// Enumerator of supported pin data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    /// `bool`
    Boolean,
    /// `int`
    Integer,
    /// `float`
    Float,

    /// `bvec2`
    Vec2Boolean,
    /// `ivec2`
    Vec2Integer,
    /// `vec2`
    Vec2Float,

    /// `bvec3`
    Vec3Boolean,
    /// `ivec3`
    Vec3Integer,
    /// `vec3`
    Vec3Float,

    /// `bvec4`
    Vec4Boolean,
    /// `ivec4`
    Vec4Integer,
    /// `vec4`
    Vec4Float,
}

impl DataType {
    /// Every data type, scalars first
    pub const ALL: [Self; 12] = [
        Self::Boolean,
        Self::Integer,
        Self::Float,
        Self::Vec2Boolean,
        Self::Vec2Integer,
        Self::Vec2Float,
        Self::Vec3Boolean,
        Self::Vec3Integer,
        Self::Vec3Float,
        Self::Vec4Boolean,
        Self::Vec4Integer,
        Self::Vec4Float,
    ];

    /// GLSL type name
    pub const fn glsl_name(self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Vec2Boolean => "bvec2",
            Self::Vec2Integer => "ivec2",
            Self::Vec2Float => "vec2",
            Self::Vec3Boolean => "bvec3",
            Self::Vec3Integer => "ivec3",
            Self::Vec3Float => "vec3",
            Self::Vec4Boolean => "bvec4",
            Self::Vec4Integer => "ivec4",
            Self::Vec4Float => "vec4",
        }
    }

    /// Component type; scalars return themselves
    pub const fn scalar(self) -> Self {
        match self {
            Self::Boolean | Self::Vec2Boolean | Self::Vec3Boolean | Self::Vec4Boolean => {
                Self::Boolean
            }
            Self::Integer | Self::Vec2Integer | Self::Vec3Integer | Self::Vec4Integer => {
                Self::Integer
            }
            Self::Float | Self::Vec2Float | Self::Vec3Float | Self::Vec4Float => Self::Float,
        }
    }

    /// Number of components (1 for scalars)
    pub const fn components(self) -> usize {
        match self {
            Self::Boolean | Self::Integer | Self::Float => 1,
            Self::Vec2Boolean | Self::Vec2Integer | Self::Vec2Float => 2,
            Self::Vec3Boolean | Self::Vec3Integer | Self::Vec3Float => 3,
            Self::Vec4Boolean | Self::Vec4Integer | Self::Vec4Float => 4,
        }
    }

    /// Whether this is a single component type
    pub const fn is_scalar(self) -> bool {
        self.components() == 1
    }

    /// Whether GLSL arithmetic is defined on this type
    pub const fn is_numeric(self) -> bool {
        !matches!(self.scalar(), Self::Boolean)
    }

    /// Build a type from a component type and a width
    pub const fn from_parts(scalar: Self, components: usize) -> Option<Self> {
        let ty = match (scalar.scalar(), components) {
            (Self::Boolean, 1) => Self::Boolean,
            (Self::Integer, 1) => Self::Integer,
            (Self::Float, 1) => Self::Float,
            (Self::Boolean, 2) => Self::Vec2Boolean,
            (Self::Integer, 2) => Self::Vec2Integer,
            (Self::Float, 2) => Self::Vec2Float,
            (Self::Boolean, 3) => Self::Vec3Boolean,
            (Self::Integer, 3) => Self::Vec3Integer,
            (Self::Float, 3) => Self::Vec3Float,
            (Self::Boolean, 4) => Self::Vec4Boolean,
            (Self::Integer, 4) => Self::Vec4Integer,
            (Self::Float, 4) => Self::Vec4Float,
            _ => return None,
        };
        Some(ty)
    }
}

/// Data type tag of a value type, resolved at compile time
pub const fn data_type_of<V: MaterialValue>() -> DataType {
    V::DATA_TYPE
}
