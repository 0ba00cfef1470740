use crate::math::{Float, Vector2, Vector3};

/// The blend factor for frame-rate independent exponential smoothing.
///
/// Blending by `smoothing_factor(k, dt)` every tick approaches the target at the same rate no
/// matter how the time is sliced into ticks.
pub fn smoothing_factor(sharpness: Float, frame_duration: Float) -> Float {
    1.0 - (-sharpness * frame_duration).exp()
}

/// Rotate `direction` onto the plane defined by `surface_normal`, keeping it perpendicular to
/// the same sideways axis it had relative to `up`. The result is normalized (or zero).
///
/// Unlike a plain projection, this does not shorten the vector when it points into a slope - the
/// direction is bent along the surface instead.
pub fn direction_tangent_to_surface(
    direction: Vector3,
    surface_normal: Vector3,
    up: Vector3,
) -> Vector3 {
    let direction_right = direction.cross(up);
    surface_normal.cross(direction_right).normalize_or_zero()
}

/// Project `vector` onto the plane defined by `plane_normal`. The normal must be normalized.
pub fn project_on_plane(vector: Vector3, plane_normal: Vector3) -> Vector3 {
    vector - vector.dot(plane_normal) * plane_normal
}

pub struct ProjectionPlaneForRotation {
    pub forward: Vector3,
    pub sideways: Vector3,
}

impl ProjectionPlaneForRotation {
    pub fn from_up_and_forward(up: Vector3, forward: Vector3) -> Self {
        Self {
            forward,
            sideways: up.cross(forward),
        }
    }

    pub fn project_and_normalize(&self, vector: Vector3) -> Vector2 {
        Vector2::new(vector.dot(self.forward), vector.dot(self.sideways)).normalize_or_zero()
    }

    /// The angle, in radians, to rotate around the plane's up axis so that `current_forward`
    /// points toward `desired_forward`. Positive angles are counter-clockwise when looking down
    /// the up axis.
    pub fn rotation_to_set_forward(
        &self,
        current_forward: Vector3,
        desired_forward: Vector3,
    ) -> Float {
        let current = self.project_and_normalize(current_forward);
        let desired = self.project_and_normalize(desired_forward);
        let sin = current.x * desired.y - current.y * desired.x;
        let cos = current.dot(desired);
        sin.atan2(cos)
    }
}
