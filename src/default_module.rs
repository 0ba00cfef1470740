use std::any::Any;
use std::sync::Arc;

use bevy::prelude::*;

use crate::crouch::{CrouchController, CrouchTransitions};
use crate::dash::DashState;
use crate::jump::JumpHandler;
use crate::math::{Float, Quaternion, Vector3};
use crate::slide::{SlideContext, SlideHandler};
use crate::util::{
    direction_tangent_to_surface, project_on_plane, smoothing_factor, ProjectionPlaneForRotation,
};
use crate::{
    CharacterMotor, LocomotionState, MovementConfig, MovementHit, MovementIntent, MovementModule,
    MovementRequest, MovementStatus,
};

/// Below this planar speed a grounded character counts as standing still.
const IDLE_SPEED_THRESHOLD: Float = 0.1;

/// The regular movement mode: walking, air control, jumping, sliding, dashing and crouching.
///
/// Every velocity change of a tick goes through [`update_physics`](MovementModule::update_physics)
/// in a fixed order - ground/air blending (or the slide), the dash, the jump - and one-shot
/// impulses are collected in an accumulator that is added last, so that they stack on top of the
/// blended velocity instead of being overwritten by it.
pub struct DefaultMovementModule {
    config: Arc<MovementConfig>,
    intent: MovementIntent,
    jump: JumpHandler,
    slide: SlideHandler,
    crouch: CrouchController,
    dash: DashState,
    dash_requested: bool,
    internal_velocity_add: Vector3,
    elapsed: Float,
    warned_zero_gravity: bool,
}

impl DefaultMovementModule {
    pub fn new(config: Arc<MovementConfig>) -> Self {
        Self {
            intent: Default::default(),
            jump: Default::default(),
            slide: Default::default(),
            crouch: CrouchController::new(&config),
            dash: DashState::new(&config),
            dash_requested: false,
            internal_velocity_add: Vector3::ZERO,
            elapsed: 0.0,
            warned_zero_gravity: false,
            config,
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn intent(&self) -> &MovementIntent {
        &self.intent
    }

    pub fn set_move_input(&mut self, move_input: Vector3) {
        self.intent.set_move_input(move_input);
    }

    pub fn set_sprint_held(&mut self, held: bool) {
        self.intent.sprint_held = held;
    }

    pub fn set_crouch_held(&mut self, held: bool) {
        self.intent.crouch_held = held;
    }

    pub fn request_jump(&mut self) {
        self.jump.request_jump();
    }

    pub fn request_dash(&mut self) {
        self.dash_requested = true;
    }

    pub fn request_slide(&mut self) {
        self.slide.request_slide();
    }

    /// Add an impulse (knockback, launch pad...) to be applied at the end of the next physics
    /// phase.
    pub fn add_velocity(&mut self, velocity: Vector3) {
        self.internal_velocity_add += velocity;
    }

    /// Direct access to the jump handler, e.g. to report wall hits without filtering.
    pub fn jump_handler_mut(&mut self) -> &mut JumpHandler {
        &mut self.jump
    }

    pub fn jump_handler(&self) -> &JumpHandler {
        &self.jump
    }

    pub fn slide_handler(&self) -> &SlideHandler {
        &self.slide
    }

    pub fn crouch_controller(&self) -> &CrouchController {
        &self.crouch
    }

    pub fn dash_state(&self) -> &DashState {
        &self.dash
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_sliding()
    }

    pub fn current_dash_charges(&self) -> u32 {
        self.dash.charges_available()
    }

    /// The move input bent along the ground, keeping its length.
    fn reoriented_input(&self, ground_normal: Vector3, up: Vector3) -> Vector3 {
        let move_input = self.intent.move_input;
        direction_tangent_to_surface(move_input, ground_normal, up) * move_input.length()
    }

    fn ground_target_speed(&self) -> Float {
        if self.intent.sprint_held {
            self.config.sprint_speed
        } else if self.crouch.is_crouching() {
            self.config.crouched_move_speed
        } else {
            self.config.max_stable_move_speed
        }
    }

    fn apply_ground_movement(
        &self,
        velocity: &mut Vector3,
        frame_duration: Float,
        ground_normal: Vector3,
        up: Vector3,
    ) {
        let speed = velocity.length();
        *velocity = direction_tangent_to_surface(*velocity, ground_normal, up) * speed;

        let target_velocity = self.reoriented_input(ground_normal, up) * self.ground_target_speed();
        *velocity = velocity.lerp(
            target_velocity,
            smoothing_factor(self.config.stable_movement_sharpness, frame_duration),
        );
    }

    fn apply_air_movement(
        &self,
        velocity: &mut Vector3,
        frame_duration: Float,
        motor: &dyn CharacterMotor,
    ) {
        let config = &self.config;
        let up = motor.up();
        let grounding = motor.grounding();

        if self.intent.has_move_input() {
            let mut added_velocity =
                self.intent.move_input * config.air_acceleration_speed * frame_duration;
            let planar_velocity = velocity.reject_from(up);

            if planar_velocity.length() < config.max_air_move_speed {
                let new_total =
                    (planar_velocity + added_velocity).clamp_length_max(config.max_air_move_speed);
                added_velocity = new_total - planar_velocity;
            } else if 0.0 < planar_velocity.dot(added_velocity) {
                // Already too fast - only allow steering, not speeding up.
                added_velocity =
                    project_on_plane(added_velocity, planar_velocity.normalize_or_zero());
            }

            // Prevent climbing steep slopes with air control.
            if grounding.found_any_ground
                && 0.0 < (*velocity + added_velocity).dot(added_velocity)
            {
                let obstruction_normal = up
                    .cross(up.cross(grounding.ground_normal))
                    .normalize_or_zero();
                added_velocity = project_on_plane(added_velocity, obstruction_normal);
            }

            *velocity += added_velocity;
        }

        *velocity += config.gravity * frame_duration;
        *velocity *= 1.0 / (1.0 + config.drag * frame_duration);

        let planar_velocity = velocity.reject_from(up);
        let planar_speed = planar_velocity.length();
        if config.max_air_move_speed < planar_speed {
            let decayed_speed = config.max_air_move_speed
                + (planar_speed - config.max_air_move_speed)
                    * (-config.air_overspeed_decay * frame_duration).exp();
            *velocity += planar_velocity * (decayed_speed / planar_speed - 1.0);
        }
    }

    fn try_dash(&mut self, motor: &dyn CharacterMotor) {
        if !std::mem::take(&mut self.dash_requested) || !self.dash.can_dash() {
            return;
        }
        let grounding = motor.grounding();
        let direction = if grounding.is_stable_on_ground {
            self.reoriented_input(grounding.ground_normal, motor.up())
                .normalize_or_zero()
        } else {
            self.intent.move_input.normalize_or_zero()
        };
        if direction == Vector3::ZERO {
            return;
        }
        if self.dash.try_consume(&self.config) {
            self.internal_velocity_add += direction * self.config.dash_force;
            debug!(
                "Dash toward {direction:?}, {} charges left",
                self.dash.charges_available()
            );
        }
    }

    fn resolve_crouch(&mut self, motor: &mut dyn CharacterMotor) {
        // The slide owns the crouch while it lasts.
        if self.slide.is_sliding() {
            return;
        }
        let desired = self.intent.crouch_held && !self.intent.sprint_held;
        self.crouch.resolve(desired, motor);
    }
}

impl MovementModule for DefaultMovementModule {
    fn on_activated(&mut self, _motor: &mut dyn CharacterMotor) {
        self.intent = Default::default();
        self.jump.reset();
        self.slide.reset();
        self.dash = DashState::new(&self.config);
        self.dash_requested = false;
        self.internal_velocity_add = Vector3::ZERO;
    }

    fn update_rotation(
        &mut self,
        rotation: &mut Quaternion,
        frame_duration: Float,
        _motor: &mut dyn CharacterMotor,
    ) {
        let config = &self.config;
        let up = *rotation * Vector3::Y;

        let look_direction = self.intent.move_input.reject_from(up);
        if look_direction != Vector3::ZERO && 0.0 < config.orientation_sharpness {
            let current_forward = *rotation * Vector3::NEG_Z;
            let angle = ProjectionPlaneForRotation::from_up_and_forward(up, current_forward)
                .rotation_to_set_forward(current_forward, look_direction);
            let target = Quaternion::from_axis_angle(up, angle) * *rotation;
            *rotation = rotation
                .slerp(
                    target,
                    smoothing_factor(config.orientation_sharpness, frame_duration),
                )
                .normalize();
        }

        if config.orient_towards_gravity {
            let target_up = (-config.gravity).normalize_or_zero();
            if target_up == Vector3::ZERO {
                if !std::mem::replace(&mut self.warned_zero_gravity, true) {
                    warn!("Cannot orient towards zero gravity");
                }
            } else {
                let current_up = *rotation * Vector3::Y;
                *rotation = (Quaternion::from_rotation_arc(current_up, target_up) * *rotation)
                    .normalize();
            }
        }
    }

    fn update_physics(
        &mut self,
        velocity: &mut Vector3,
        frame_duration: Float,
        motor: &mut dyn CharacterMotor,
    ) {
        let grounding = motor.grounding();
        let up = motor.up();

        if grounding.is_stable_on_ground {
            if self.slide.is_sliding() {
                let ctx = SlideContext {
                    config: &self.config,
                    intent: &self.intent,
                    frame_duration,
                    now: self.elapsed,
                };
                self.slide
                    .apply_slide_physics(velocity, &ctx, motor, &mut self.crouch);
            } else {
                self.apply_ground_movement(velocity, frame_duration, grounding.ground_normal, up);
            }
        } else {
            self.apply_air_movement(velocity, frame_duration, motor);
        }

        self.try_dash(motor);

        self.jump
            .process_jump(velocity, frame_duration, &self.config, motor);

        *velocity += std::mem::take(&mut self.internal_velocity_add);
    }

    fn after_update(&mut self, frame_duration: Float, motor: &mut dyn CharacterMotor) {
        self.elapsed += frame_duration;
        self.dash_requested = false;

        self.jump
            .post_update(frame_duration, &self.config, &motor.grounding());

        let ctx = SlideContext {
            config: &self.config,
            intent: &self.intent,
            frame_duration,
            now: self.elapsed,
        };
        self.slide.handle_slide(&ctx, motor, &mut self.crouch);

        self.resolve_crouch(motor);

        self.dash.tick(frame_duration, &self.config);
    }

    fn discard_one_shot_requests(&mut self) {
        self.dash_requested = false;
    }

    fn set_intent(&mut self, intent: MovementIntent) {
        self.intent = intent;
        self.intent.set_move_input(intent.move_input);
    }

    fn request(&mut self, request: MovementRequest) {
        match request {
            MovementRequest::Jump => self.request_jump(),
            MovementRequest::Dash => self.request_dash(),
            MovementRequest::Slide => self.request_slide(),
        }
    }

    fn on_movement_hit(&mut self, hit: MovementHit, motor: &dyn CharacterMotor) {
        if self.config.allow_wall_jump
            && !hit.is_stable
            && !motor.grounding().is_stable_on_ground
        {
            self.jump.on_wall_hit(hit.normal);
        }
    }

    fn status(&self, motor: &dyn CharacterMotor) -> MovementStatus {
        let grounding = motor.grounding();
        let up = motor.up();
        let velocity = motor.velocity();

        let state = if self.slide.is_sliding() {
            LocomotionState::Sliding
        } else if grounding.is_stable_on_ground {
            if self.crouch.is_crouching() {
                LocomotionState::Crouching
            } else if velocity.reject_from(up).length() < IDLE_SPEED_THRESHOLD {
                LocomotionState::Idle
            } else if self.intent.sprint_held {
                LocomotionState::Sprinting
            } else {
                LocomotionState::Walking
            }
        } else if 0.0 < velocity.dot(up) {
            LocomotionState::Rising
        } else {
            LocomotionState::Falling
        };

        let jump_state = self.jump.state();
        MovementStatus {
            state,
            is_sliding: self.slide.is_sliding(),
            is_crouching: self.crouch.is_crouching(),
            dash_charges: self.dash.charges_available(),
            jump_consumed: jump_state.jump_consumed,
            double_jump_consumed: jump_state.double_jump_consumed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_mut_any(&mut self) -> &mut dyn Any {
        self
    }
}
