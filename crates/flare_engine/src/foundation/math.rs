//! Math utilities and types
//!
//! Vector types used as pin values in material graphs. Every component type
//! the shader side understands (bool, int, float) has a 2, 3 and 4 wide alias.

pub use nalgebra::{Vector2, Vector3, Vector4};

/// 2D float vector (`vec2`)
pub type Vec2 = Vector2<f32>;

/// 3D float vector (`vec3`)
pub type Vec3 = Vector3<f32>;

/// 4D float vector (`vec4`)
pub type Vec4 = Vector4<f32>;

/// 2D integer vector (`ivec2`)
pub type IVec2 = Vector2<i32>;

/// 3D integer vector (`ivec3`)
pub type IVec3 = Vector3<i32>;

/// 4D integer vector (`ivec4`)
pub type IVec4 = Vector4<i32>;

/// 2D boolean vector (`bvec2`)
pub type BVec2 = Vector2<bool>;

/// 3D boolean vector (`bvec3`)
pub type BVec3 = Vector3<bool>;

/// 4D boolean vector (`bvec4`)
pub type BVec4 = Vector4<bool>;
