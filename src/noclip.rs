use std::any::Any;
use std::sync::Arc;

use crate::math::{Float, Quaternion, Vector3};
use crate::util::smoothing_factor;
use crate::{
    CharacterMotor, LocomotionState, MovementConfig, MovementIntent, MovementModule,
    MovementRequest, MovementStatus,
};

/// Debug free-fly mode.
///
/// While active, the motor's collision and ground solving are off and the velocity simply blends
/// toward the move input. Deactivating the module turns both back on.
pub struct NoClipModule {
    config: Arc<MovementConfig>,
    intent: MovementIntent,
}

impl NoClipModule {
    pub fn new(config: Arc<MovementConfig>) -> Self {
        Self {
            config,
            intent: Default::default(),
        }
    }
}

impl MovementModule for NoClipModule {
    fn on_activated(&mut self, motor: &mut dyn CharacterMotor) {
        motor.set_collision_enabled(false);
        motor.set_ground_solving_enabled(false);
    }

    fn on_deactivated(&mut self, motor: &mut dyn CharacterMotor) {
        motor.set_collision_enabled(true);
        motor.set_ground_solving_enabled(true);
    }

    fn update_rotation(
        &mut self,
        _rotation: &mut Quaternion,
        _frame_duration: Float,
        _motor: &mut dyn CharacterMotor,
    ) {
    }

    fn update_physics(
        &mut self,
        velocity: &mut Vector3,
        frame_duration: Float,
        _motor: &mut dyn CharacterMotor,
    ) {
        let speed = if self.intent.sprint_held {
            self.config.noclip_sprint_speed
        } else {
            self.config.noclip_speed
        };
        *velocity = velocity.lerp(
            self.intent.move_input * speed,
            smoothing_factor(self.config.noclip_sharpness, frame_duration),
        );
    }

    fn after_update(&mut self, _frame_duration: Float, _motor: &mut dyn CharacterMotor) {}

    fn set_intent(&mut self, intent: MovementIntent) {
        self.intent = intent;
        self.intent.set_move_input(intent.move_input);
    }

    fn request(&mut self, _request: MovementRequest) {}

    fn status(&self, _motor: &dyn CharacterMotor) -> MovementStatus {
        MovementStatus::bare(LocomotionState::NoClip)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_mut_any(&mut self) -> &mut dyn Any {
        self
    }
}
