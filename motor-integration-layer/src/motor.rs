use crate::math::{Float, Quaternion, Vector3};

/// Grounding information the motor gathered during its last sweep.
///
/// The motor is responsible for probing the ground. Movement modules only read the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundingStatus {
    /// The character stands on ground shallow enough to walk on.
    pub is_stable_on_ground: bool,
    /// The character touches some ground - stable or not.
    ///
    /// This is `true` whenever [`is_stable_on_ground`](Self::is_stable_on_ground) is `true`, and
    /// also when the character rests on a slope too steep to walk on.
    pub found_any_ground: bool,
    /// The normal of the ground surface. Only meaningful when
    /// [`found_any_ground`](Self::found_any_ground) is `true`.
    pub ground_normal: Vector3,
}

impl GroundingStatus {
    /// Not touching anything.
    pub const AIRBORNE: Self = Self {
        is_stable_on_ground: false,
        found_any_ground: false,
        ground_normal: Vector3::Y,
    };

    /// Standing on walkable ground with the given normal.
    pub fn stable(ground_normal: Vector3) -> Self {
        Self {
            is_stable_on_ground: true,
            found_any_ground: true,
            ground_normal,
        }
    }

    /// Resting against ground too steep to walk on.
    pub fn unstable(ground_normal: Vector3) -> Self {
        Self {
            is_stable_on_ground: false,
            found_any_ground: true,
            ground_normal,
        }
    }
}

impl Default for GroundingStatus {
    fn default() -> Self {
        Self::AIRBORNE
    }
}

/// Dimensions of the character's collision capsule.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CapsuleDimensions {
    pub radius: Float,
    /// Total height, including the hemispherical caps.
    pub height: Float,
    /// Offset of the capsule center along the character's up axis, measured from the
    /// character's origin (usually its feet).
    pub y_offset: Float,
}

impl CapsuleDimensions {
    pub const fn new(radius: Float, height: Float, y_offset: Float) -> Self {
        Self {
            radius,
            height,
            y_offset,
        }
    }
}

/// A position and rotation to run an overlap query at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterPose {
    pub position: Vector3,
    pub rotation: Quaternion,
}

/// Bitmask of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    pub fn contains(&self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// The motor's side of the movement contract.
///
/// A character motor owns the actual rigid body (or kinematic body), performs the collision
/// sweep, probes the ground and integrates position. Movement modules never move the character -
/// they read this view, compute a desired rotation and velocity, and ask the motor for the few
/// side effects listed here.
///
/// The axes follow Bevy's conventions: the character's forward is its local negative Z axis, and
/// its up is its local Y axis.
pub trait CharacterMotor {
    fn position(&self) -> Vector3;

    fn rotation(&self) -> Quaternion;

    /// The velocity the motor ended the last integration with.
    fn velocity(&self) -> Vector3;

    fn up(&self) -> Vector3 {
        self.rotation() * Vector3::Y
    }

    fn forward(&self) -> Vector3 {
        self.rotation() * Vector3::NEG_Z
    }

    fn grounding(&self) -> GroundingStatus;

    /// Replace the velocity the motor will integrate next.
    fn set_desired_velocity(&mut self, velocity: Vector3);

    /// Replace the rotation the motor will apply next.
    fn set_desired_rotation(&mut self, rotation: Quaternion);

    /// Resize the collision capsule. Takes effect immediately, so that a following
    /// [`overlap_count`](Self::overlap_count) sees the new dimensions.
    fn set_capsule_dimensions(&mut self, dimensions: CapsuleDimensions);

    /// Count the colliders in `layers` that overlap the character's current capsule placed at
    /// `pose`. The character's own collider must not be counted.
    fn overlap_count(&self, pose: CharacterPose, layers: LayerMask) -> usize;

    /// Stop snapping to the ground for `duration` seconds, so that a jump can leave it.
    fn force_unground(&mut self, duration: Float);

    fn set_collision_enabled(&mut self, enabled: bool);

    fn set_ground_solving_enabled(&mut self, enabled: bool);

    /// Scale the visual root of the character (not its collider).
    fn set_visual_scale(&mut self, _scale: Vector3) {}
}
