use bevy::prelude::*;

use crate::math::Vector3;
use crate::{CapsuleDimensions, CharacterMotor, CharacterPose, LayerMask, MovementConfig};

/// Crouch transitions, as seen by the abilities that need to drive them (e.g. the slide).
pub trait CrouchTransitions {
    fn is_crouching(&self) -> bool;

    /// Shrink to the crouched capsule. Does nothing if already crouching.
    fn enter_crouch(&mut self, motor: &mut dyn CharacterMotor);

    /// Try to grow back to the standing capsule.
    ///
    /// Returns `true` if the character is standing afterwards.
    fn try_uncrouch(&mut self, motor: &mut dyn CharacterMotor) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrouchState {
    pub is_crouching: bool,
    pub standing: CapsuleDimensions,
    pub crouched: CapsuleDimensions,
}

/// Resizes the character capsule for crouching.
///
/// Standing up is transactional: the standing capsule is applied first, then the motor is asked
/// for overlaps at the character's pose. If anything overlaps, the crouched capsule is restored
/// and the character stays crouched. The character is never left inside geometry.
#[derive(Debug, Clone)]
pub struct CrouchController {
    state: CrouchState,
    collision_layers: LayerMask,
}

impl CrouchController {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            state: CrouchState {
                is_crouching: false,
                standing: config.standing_capsule,
                crouched: config.crouched_capsule,
            },
            collision_layers: config.crouch_collision_layers,
        }
    }

    pub fn state(&self) -> &CrouchState {
        &self.state
    }

    /// Visual root scale matching the current capsule.
    pub fn visual_scale(&self) -> Vector3 {
        if self.state.is_crouching && 0.0 < self.state.standing.height {
            Vector3::new(1.0, self.state.crouched.height / self.state.standing.height, 1.0)
        } else {
            Vector3::ONE
        }
    }

    /// Move toward the crouch the player wants, as far as the surroundings allow.
    pub fn resolve(&mut self, desired: bool, motor: &mut dyn CharacterMotor) {
        match (desired, self.state.is_crouching) {
            (true, false) => self.enter_crouch(motor),
            (false, true) => {
                self.try_uncrouch(motor);
            }
            _ => {}
        }
    }
}

impl CrouchTransitions for CrouchController {
    fn is_crouching(&self) -> bool {
        self.state.is_crouching
    }

    fn enter_crouch(&mut self, motor: &mut dyn CharacterMotor) {
        if self.state.is_crouching {
            return;
        }
        self.state.is_crouching = true;
        motor.set_capsule_dimensions(self.state.crouched);
        motor.set_visual_scale(self.visual_scale());
    }

    fn try_uncrouch(&mut self, motor: &mut dyn CharacterMotor) -> bool {
        if !self.state.is_crouching {
            return true;
        }
        motor.set_capsule_dimensions(self.state.standing);
        let pose = CharacterPose {
            position: motor.position(),
            rotation: motor.rotation(),
        };
        let overlaps = if self.collision_layers == LayerMask::NONE {
            0
        } else {
            motor.overlap_count(pose, self.collision_layers)
        };
        if 0 < overlaps {
            motor.set_capsule_dimensions(self.state.crouched);
            trace!("Uncrouch blocked by {overlaps} overlapping colliders");
            false
        } else {
            self.state.is_crouching = false;
            motor.set_visual_scale(self.visual_scale());
            true
        }
    }
}
