//! Precision-switchable math aliases.
//!
//! Everything in the movement pipeline uses these aliases, so compiling with the `f64` feature
//! moves the whole computation to double precision.

#[cfg(feature = "f64")]
pub type Float = f64;
#[cfg(not(feature = "f64"))]
pub type Float = f32;

#[cfg(feature = "f64")]
pub use bevy::math::{DQuat as Quaternion, DVec2 as Vector2, DVec3 as Vector3};
#[cfg(not(feature = "f64"))]
pub use bevy::math::{Quat as Quaternion, Vec2 as Vector2, Vec3 as Vector3};

#[cfg(feature = "f64")]
pub use std::f64::consts;
#[cfg(not(feature = "f64"))]
pub use std::f32::consts;

/// Convert engine values (e.g. `Time` durations, which are always available as both `f32` and
/// `f64`) to the compiled [`Float`] precision.
pub trait AdjustPrecision {
    type Adjusted;
    fn adjust_precision(&self) -> Self::Adjusted;
}

impl AdjustPrecision for f32 {
    type Adjusted = Float;
    fn adjust_precision(&self) -> Self::Adjusted {
        #[cfg(feature = "f64")]
        return (*self).into();
        #[cfg(not(feature = "f64"))]
        return *self;
    }
}

impl AdjustPrecision for f64 {
    type Adjusted = Float;
    fn adjust_precision(&self) -> Self::Adjusted {
        #[cfg(feature = "f64")]
        return *self;
        #[cfg(not(feature = "f64"))]
        return *self as f32;
    }
}
