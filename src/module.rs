use std::any::Any;

use crate::math::{Float, Quaternion, Vector3};
use crate::{CharacterMotor, MovementIntent, MovementRequest, MovementStatus};

/// A contact the motor reported during its sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementHit {
    pub normal: Vector3,
    /// The hit surface is walkable ground.
    pub is_stable: bool,
}

/// A movement mode that can drive a character.
///
/// Only one module is active at a time. The [`MovementSystem`](crate::MovementSystem) calls the
/// phases in a fixed order every tick:
///
/// 1. [`update_rotation`](Self::update_rotation)
/// 2. [`update_physics`](Self::update_physics)
/// 3. (the motor integrates, possibly reporting hits through
///    [`on_movement_hit`](Self::on_movement_hit))
/// 4. [`after_update`](Self::after_update)
///
/// Modules only ever write the rotation and velocity they are handed, and never move the
/// character themselves.
pub trait MovementModule: 'static + Send + Sync {
    /// Called whenever the module gains control. Must reset every timer and flag, so that
    /// nothing from a previous stint leaks into this one.
    fn on_activated(&mut self, motor: &mut dyn CharacterMotor);

    /// Called when another module takes control.
    fn on_deactivated(&mut self, _motor: &mut dyn CharacterMotor) {}

    fn update_rotation(
        &mut self,
        rotation: &mut Quaternion,
        frame_duration: Float,
        motor: &mut dyn CharacterMotor,
    );

    fn update_physics(
        &mut self,
        velocity: &mut Vector3,
        frame_duration: Float,
        motor: &mut dyn CharacterMotor,
    );

    fn after_update(&mut self, frame_duration: Float, motor: &mut dyn CharacterMotor);

    /// Called at the end of a tick where the physics phases were skipped (see
    /// [`RewindGate`](crate::RewindGate)), so that one-shot requests do not survive the tick.
    fn discard_one_shot_requests(&mut self) {}

    fn set_intent(&mut self, intent: MovementIntent);

    fn request(&mut self, request: MovementRequest);

    fn on_movement_hit(&mut self, _hit: MovementHit, _motor: &dyn CharacterMotor) {}

    /// A read-only projection of the module's state, for UI and animation.
    fn status(&self, motor: &dyn CharacterMotor) -> MovementStatus;

    fn as_any(&self) -> &dyn Any;
    fn as_mut_any(&mut self) -> &mut dyn Any;
}
