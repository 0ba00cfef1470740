use bevy::prelude::*;

use crate::crouch::CrouchTransitions;
use crate::math::{Float, Vector3};
use crate::util::smoothing_factor;
use crate::{CharacterMotor, MovementConfig, MovementIntent, SlideInputMode};

#[derive(Debug, Clone, PartialEq)]
pub struct SlideState {
    pub is_sliding: bool,
    /// Time since the current slide started.
    pub slide_timer: Float,
    /// Captured once when the slide starts.
    pub locked_slide_direction: Vector3,
    pub pending_entry_request: bool,
    pub last_exit_timestamp: Float,
}

impl Default for SlideState {
    fn default() -> Self {
        Self {
            is_sliding: false,
            slide_timer: 0.0,
            locked_slide_direction: Vector3::ZERO,
            pending_entry_request: false,
            last_exit_timestamp: Float::NEG_INFINITY,
        }
    }
}

/// Everything the slide reads besides the motor and the crouch.
pub struct SlideContext<'a> {
    pub config: &'a MovementConfig,
    pub intent: &'a MovementIntent,
    pub frame_duration: Float,
    /// Simulation time, in seconds, used for the cooldown between slides.
    pub now: Float,
}

/// Slope-aware sliding.
///
/// The slide keeps the direction the character moved in when it started, and only changes its
/// speed - accelerating downhill, decelerating uphill, and always settling toward
/// [`base_slide_speed`](MovementConfig::base_slide_speed). The crouch is driven through
/// [`CrouchTransitions`] rather than resized here.
#[derive(Debug, Default, Clone)]
pub struct SlideHandler {
    state: SlideState,
}

impl SlideHandler {
    pub fn state(&self) -> &SlideState {
        &self.state
    }

    pub fn is_sliding(&self) -> bool {
        self.state.is_sliding
    }

    /// Forget the current slide without touching the crouch. The cooldown is kept.
    pub fn reset(&mut self) {
        self.state = SlideState {
            last_exit_timestamp: self.state.last_exit_timestamp,
            ..Default::default()
        };
    }

    pub fn request_slide(&mut self) {
        self.state.pending_entry_request = true;
    }

    /// Evaluate the pending request and the exit conditions that do not depend on speed.
    pub fn handle_slide(
        &mut self,
        ctx: &SlideContext,
        motor: &mut dyn CharacterMotor,
        crouch: &mut dyn CrouchTransitions,
    ) {
        if std::mem::take(&mut self.state.pending_entry_request) {
            if !self.state.is_sliding {
                self.try_enter(ctx, motor, crouch);
            } else if ctx.config.slide_input_mode == SlideInputMode::Toggle {
                self.exit(ctx, motor, crouch);
                return;
            }
        }

        if !self.state.is_sliding {
            return;
        }
        if !motor.grounding().found_any_ground {
            self.exit(ctx, motor, crouch);
        } else if ctx.config.slide_input_mode == SlideInputMode::Hold
            && !(ctx.intent.crouch_held && ctx.intent.sprint_held)
        {
            self.exit(ctx, motor, crouch);
        }
    }

    fn try_enter(
        &mut self,
        ctx: &SlideContext,
        motor: &mut dyn CharacterMotor,
        crouch: &mut dyn CrouchTransitions,
    ) {
        let config = ctx.config;
        if !ctx.intent.sprint_held
            || crouch.is_crouching()
            || !motor.grounding().is_stable_on_ground
            || ctx.now - self.state.last_exit_timestamp < config.slide_cooldown
        {
            return;
        }
        let planar_velocity = motor.velocity().reject_from(motor.up());
        if planar_velocity.length() <= config.min_slide_entry_speed {
            return;
        }
        self.state.is_sliding = true;
        self.state.slide_timer = 0.0;
        self.state.locked_slide_direction = planar_velocity.normalize_or_zero();
        crouch.enter_crouch(motor);
        debug!(
            "Slide started toward {:?}",
            self.state.locked_slide_direction
        );
    }

    fn exit(
        &mut self,
        ctx: &SlideContext,
        motor: &mut dyn CharacterMotor,
        crouch: &mut dyn CrouchTransitions,
    ) {
        self.state.is_sliding = false;
        self.state.last_exit_timestamp = ctx.now;
        if !ctx.intent.crouch_held {
            crouch.try_uncrouch(motor);
        }
        debug!("Slide ended after {} seconds", self.state.slide_timer);
    }

    /// Move along the locked direction, with the speed shaped by the slope.
    ///
    /// If the speed drops too low or the slide runs for too long, the slide ends and `velocity`
    /// is left untouched.
    pub fn apply_slide_physics(
        &mut self,
        velocity: &mut Vector3,
        ctx: &SlideContext,
        motor: &mut dyn CharacterMotor,
        crouch: &mut dyn CrouchTransitions,
    ) {
        let config = ctx.config;
        self.state.slide_timer += ctx.frame_duration;

        let up = motor.up();
        let ground_normal = motor.grounding().ground_normal;
        let slope_angle = ground_normal.angle_between(up).to_degrees();
        let downslope = (-up).reject_from(ground_normal).normalize_or_zero();
        let slope_influence = self.state.locked_slide_direction.dot(downslope)
            * (slope_angle / 90.0)
            * config.slide_gravity_influence;
        let target_speed = (config.base_slide_speed + slope_influence).max(0.0);

        let current_speed = velocity.length();
        let new_speed = current_speed
            + (target_speed - current_speed)
                * smoothing_factor(config.slide_friction, ctx.frame_duration);

        if new_speed < config.min_slide_speed_to_maintain
            || config.max_slide_duration <= self.state.slide_timer
        {
            self.exit(ctx, motor, crouch);
            return;
        }
        *velocity = self.state.locked_slide_direction * new_speed;
    }
}
