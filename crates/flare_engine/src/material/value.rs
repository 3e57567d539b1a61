//! Pin values
//!
//! [`MaterialValue`] ties each supported Rust type to its [`DataType`] and
//! converts it to and from the type-erased [`Value`] stored in the graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::data_type::DataType;
use super::error::MaterialError;
use crate::foundation::math::{Vector2, Vector3, Vector4};

/// Type-erased pin value, one variant per [`DataType`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// `bool`
    Boolean(bool),
    /// `int`
    Integer(i32),
    /// `float`
    Float(f32),
    /// `bvec2`
    Vec2Boolean([bool; 2]),
    /// `ivec2`
    Vec2Integer([i32; 2]),
    /// `vec2`
    Vec2Float([f32; 2]),
    /// `bvec3`
    Vec3Boolean([bool; 3]),
    /// `ivec3`
    Vec3Integer([i32; 3]),
    /// `vec3`
    Vec3Float([f32; 3]),
    /// `bvec4`
    Vec4Boolean([bool; 4]),
    /// `ivec4`
    Vec4Integer([i32; 4]),
    /// `vec4`
    Vec4Float([f32; 4]),
}

impl Value {
    /// Zero (or `false`) value of a data type
    pub const fn zero(data_type: DataType) -> Self {
        match data_type {
            DataType::Boolean => Self::Boolean(false),
            DataType::Integer => Self::Integer(0),
            DataType::Float => Self::Float(0.0),
            DataType::Vec2Boolean => Self::Vec2Boolean([false; 2]),
            DataType::Vec2Integer => Self::Vec2Integer([0; 2]),
            DataType::Vec2Float => Self::Vec2Float([0.0; 2]),
            DataType::Vec3Boolean => Self::Vec3Boolean([false; 3]),
            DataType::Vec3Integer => Self::Vec3Integer([0; 3]),
            DataType::Vec3Float => Self::Vec3Float([0.0; 3]),
            DataType::Vec4Boolean => Self::Vec4Boolean([false; 4]),
            DataType::Vec4Integer => Self::Vec4Integer([0; 4]),
            DataType::Vec4Float => Self::Vec4Float([0.0; 4]),
        }
    }

    /// Data type tag of this value
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::Integer(_) => DataType::Integer,
            Self::Float(_) => DataType::Float,
            Self::Vec2Boolean(_) => DataType::Vec2Boolean,
            Self::Vec2Integer(_) => DataType::Vec2Integer,
            Self::Vec2Float(_) => DataType::Vec2Float,
            Self::Vec3Boolean(_) => DataType::Vec3Boolean,
            Self::Vec3Integer(_) => DataType::Vec3Integer,
            Self::Vec3Float(_) => DataType::Vec3Float,
            Self::Vec4Boolean(_) => DataType::Vec4Boolean,
            Self::Vec4Integer(_) => DataType::Vec4Integer,
            Self::Vec4Float(_) => DataType::Vec4Float,
        }
    }

    /// Components as scalar values, in order
    pub fn components(&self) -> Vec<Self> {
        match *self {
            Self::Boolean(_) | Self::Integer(_) | Self::Float(_) => vec![*self],
            Self::Vec2Boolean(c) => c.map(Self::Boolean).to_vec(),
            Self::Vec2Integer(c) => c.map(Self::Integer).to_vec(),
            Self::Vec2Float(c) => c.map(Self::Float).to_vec(),
            Self::Vec3Boolean(c) => c.map(Self::Boolean).to_vec(),
            Self::Vec3Integer(c) => c.map(Self::Integer).to_vec(),
            Self::Vec3Float(c) => c.map(Self::Float).to_vec(),
            Self::Vec4Boolean(c) => c.map(Self::Boolean).to_vec(),
            Self::Vec4Integer(c) => c.map(Self::Integer).to_vec(),
            Self::Vec4Float(c) => c.map(Self::Float).to_vec(),
        }
    }

    /// GLSL literal expression, e.g. `2.5`, `-3`, `true` or `vec4(1.0, 2.0, 3.0, 4.0)`
    pub fn to_glsl(&self) -> Result<String, MaterialError> {
        match *self {
            Self::Boolean(v) => Ok(v.to_string()),
            Self::Integer(v) => Ok(v.to_string()),
            Self::Float(v) => float_literal(v),
            _ => {
                let components = self
                    .components()
                    .iter()
                    .map(Self::to_glsl)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{}({})", self.data_type().glsl_name(), components.join(", ")))
            }
        }
    }
}

fn float_literal(value: f32) -> Result<String, MaterialError> {
    if !value.is_finite() {
        return Err(MaterialError::NonFiniteLiteral(value));
    }
    // Debug keeps a fractional part or exponent ("1.0", "1e-7"), which GLSL
    // needs to read the literal as a float.
    Ok(format!("{value:?}"))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            _ => {
                f.write_str("(")?;
                for (i, component) in self.components().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{component}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A Rust type that can flow through a material pin.
///
/// Implemented for `bool`, `i32`, `f32` and their 2, 3 and 4 wide `nalgebra`
/// vectors. Pins are parameterized over this trait, so connecting pins of
/// different value types does not compile.
pub trait MaterialValue: Copy + PartialEq + fmt::Debug + 'static {
    /// Tag of this type
    const DATA_TYPE: DataType;

    /// Zero or `false` value
    fn zero() -> Self;

    /// Erase the type
    fn into_value(self) -> Value;

    /// Recover the typed value; `None` when the variant does not match
    fn from_value(value: &Value) -> Option<Self>;
}

/// Component types a vector constructor can be built from
pub trait ScalarValue: MaterialValue {
    /// Four component vector of this scalar
    type Vec4: MaterialValue;

    /// Build a four component vector
    fn vec4(x: Self, y: Self, z: Self, w: Self) -> Self::Vec4;
}

/// Component types with GLSL arithmetic (`int`, `float`)
pub trait NumericValue: ScalarValue {}

macro_rules! impl_scalar_value {
    ($ty:ty, $variant:ident, $zero:expr) => {
        impl MaterialValue for $ty {
            const DATA_TYPE: DataType = DataType::$variant;

            fn zero() -> Self {
                $zero
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }

        impl ScalarValue for $ty {
            type Vec4 = Vector4<$ty>;

            fn vec4(x: Self, y: Self, z: Self, w: Self) -> Self::Vec4 {
                Vector4::new(x, y, z, w)
            }
        }
    };
}

macro_rules! impl_vector_value {
    ($vector:ident, $scalar:ty, $variant:ident, $n:literal) => {
        impl MaterialValue for $vector<$scalar> {
            const DATA_TYPE: DataType = DataType::$variant;

            fn zero() -> Self {
                Self::from([<$scalar as MaterialValue>::zero(); $n])
            }

            fn into_value(self) -> Value {
                let components: [$scalar; $n] = self.into();
                Value::$variant(components)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(components) => Some(Self::from(*components)),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar_value!(bool, Boolean, false);
impl_scalar_value!(i32, Integer, 0);
impl_scalar_value!(f32, Float, 0.0);

impl NumericValue for i32 {}
impl NumericValue for f32 {}

impl_vector_value!(Vector2, bool, Vec2Boolean, 2);
impl_vector_value!(Vector2, i32, Vec2Integer, 2);
impl_vector_value!(Vector2, f32, Vec2Float, 2);
impl_vector_value!(Vector3, bool, Vec3Boolean, 3);
impl_vector_value!(Vector3, i32, Vec3Integer, 3);
impl_vector_value!(Vector3, f32, Vec3Float, 3);
impl_vector_value!(Vector4, bool, Vec4Boolean, 4);
impl_vector_value!(Vector4, i32, Vec4Integer, 4);
impl_vector_value!(Vector4, f32, Vec4Float, 4);
