use bevy::prelude::*;

use crate::math::{Float, Vector3};
use crate::{CharacterMotor, GroundingStatus, MovementConfig};

/// Timers and flags of the [`JumpHandler`].
#[derive(Debug, Clone, PartialEq)]
pub struct JumpState {
    /// A jump was requested and is waiting (buffered) for a chance to fire.
    pub jump_requested: bool,
    /// The first jump was used since the last time the character stood on the ground.
    pub jump_consumed: bool,
    pub double_jump_consumed: bool,
    /// The character touched a wall during the last motor sweep. Only lasts one tick.
    pub can_wall_jump: bool,
    pub wall_jump_normal: Vector3,
    pub time_since_jump_requested: Float,
    /// Time since the character last stood on ground it could jump from. Starts at infinity so
    /// that a character that was never grounded gets no coyote time.
    pub time_since_last_able_to_jump: Float,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            jump_requested: false,
            jump_consumed: false,
            double_jump_consumed: false,
            can_wall_jump: false,
            wall_jump_normal: Vector3::ZERO,
            time_since_jump_requested: Float::INFINITY,
            time_since_last_able_to_jump: Float::INFINITY,
        }
    }
}

/// Which jump fired during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// A jump from the ground, or from coyote time.
    Primary,
    Wall,
    Double,
}

/// Buffered, coyote, double and wall jumps.
///
/// A jump request is kept for [`jump_pre_grounding_grace_time`] seconds, firing as soon as a jump
/// becomes possible. The first jump is possible on the ground and for
/// [`jump_post_grounding_grace_time`] seconds after leaving it, the double jump only while
/// airborne after the first one, and the wall jump in the tick after the motor reported hitting
/// a wall. At most one of them fires per tick.
///
/// [`jump_pre_grounding_grace_time`]: MovementConfig::jump_pre_grounding_grace_time
/// [`jump_post_grounding_grace_time`]: MovementConfig::jump_post_grounding_grace_time
#[derive(Debug, Default, Clone)]
pub struct JumpHandler {
    state: JumpState,
    jumped_this_tick: Option<JumpKind>,
}

impl JumpHandler {
    pub fn state(&self) -> &JumpState {
        &self.state
    }

    /// The jump that fired during the current tick's physics phase, if any.
    pub fn jumped_this_tick(&self) -> Option<JumpKind> {
        self.jumped_this_tick
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn request_jump(&mut self) {
        self.state.jump_requested = true;
        self.state.time_since_jump_requested = 0.0;
    }

    /// Grant a single wall jump away from `normal`.
    ///
    /// Meant to be called from the motor's hit callback when an airborne character touches a
    /// surface that is not walkable. The eligibility is cleared at the end of the next
    /// [`process_jump`](Self::process_jump), whether the jump fires or not.
    pub fn on_wall_hit(&mut self, normal: Vector3) {
        self.state.can_wall_jump = true;
        self.state.wall_jump_normal = normal;
    }

    fn can_jump_from(config: &MovementConfig, grounding: &GroundingStatus) -> bool {
        if config.allow_jumping_on_steep_ground {
            grounding.found_any_ground
        } else {
            grounding.is_stable_on_ground
        }
    }

    /// Fire the pending jump if possible, writing the jump impulse into `velocity`.
    ///
    /// Returns the kind of jump that fired.
    pub fn process_jump(
        &mut self,
        velocity: &mut Vector3,
        frame_duration: Float,
        config: &MovementConfig,
        motor: &mut dyn CharacterMotor,
    ) -> Option<JumpKind> {
        let state = &mut self.state;
        self.jumped_this_tick = None;
        state.time_since_jump_requested += frame_duration;

        if state.jump_requested {
            let grounding = motor.grounding();
            let up = motor.up();
            let can_jump_from_ground = Self::can_jump_from(config, &grounding);

            let mut fired = None;
            if config.allow_double_jump
                && state.jump_consumed
                && !state.double_jump_consumed
                && !can_jump_from_ground
            {
                state.double_jump_consumed = true;
                fired = Some((JumpKind::Double, up));
            } else if state.can_wall_jump
                || (!state.jump_consumed
                    && (can_jump_from_ground
                        || state.time_since_last_able_to_jump
                            <= config.jump_post_grounding_grace_time))
            {
                let (kind, direction) = if state.can_wall_jump {
                    (JumpKind::Wall, state.wall_jump_normal)
                } else if grounding.found_any_ground && !grounding.is_stable_on_ground {
                    (JumpKind::Primary, grounding.ground_normal)
                } else {
                    (JumpKind::Primary, up)
                };
                state.jump_consumed = true;
                fired = Some((kind, direction));
            }

            if let Some((kind, direction)) = fired {
                motor.force_unground(config.jump_unground_duration);
                *velocity += direction * config.jump_speed - velocity.project_onto(up);
                state.jump_requested = false;
                self.jumped_this_tick = Some(kind);
                debug!("{kind:?} jump fired");
            }
        }

        self.state.can_wall_jump = false;
        self.jumped_this_tick
    }

    /// Expire the jump buffer and refill the jumps on landing.
    pub fn post_update(
        &mut self,
        frame_duration: Float,
        config: &MovementConfig,
        grounding: &GroundingStatus,
    ) {
        let state = &mut self.state;
        if state.jump_requested
            && config.jump_pre_grounding_grace_time < state.time_since_jump_requested
        {
            trace!("Buffered jump request expired");
            state.jump_requested = false;
        }

        if Self::can_jump_from(config, grounding) && self.jumped_this_tick.is_none() {
            state.jump_consumed = false;
            state.double_jump_consumed = false;
            state.time_since_last_able_to_jump = 0.0;
        } else {
            state.time_since_last_able_to_jump += frame_duration;
        }
        self.jumped_this_tick = None;
    }
}
