use crate::math::Vector3;

/// Continuous, per-tick player intent.
///
/// The input layer is expected to debounce and map the raw input - this only holds the result.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MovementIntent {
    /// Camera-relative movement direction. Its length is the input strength, and it never
    /// exceeds `1.0`.
    pub move_input: Vector3,
    pub sprint_held: bool,
    pub crouch_held: bool,
}

impl MovementIntent {
    /// Set the movement vector, clamping it to unit length.
    pub fn set_move_input(&mut self, move_input: Vector3) {
        self.move_input = move_input.clamp_length_max(1.0);
    }

    pub fn has_move_input(&self) -> bool {
        0.0 < self.move_input.length_squared()
    }
}

/// Edge-triggered requests.
///
/// Each request is consumed by the module that receives it - either it fires, or it is dropped
/// (immediately or after a grace window).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementRequest {
    Jump,
    Dash,
    Slide,
}
