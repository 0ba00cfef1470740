#![allow(dead_code)]

use std::sync::Arc;

use bevy::prelude::*;
use bevy_kinematic_movement::math::*;
use bevy_kinematic_movement::{
    CapsuleDimensions, CharacterMotor, CharacterPose, CrouchTransitions, DefaultMovementModule,
    GroundingStatus, LayerMask, MovementConfig, MovementMode, MovementSystem,
};

pub const DT: Float = 0.02;

/// A motor that does no collision at all - tests script its grounding and overlaps.
#[derive(Component, Debug, Clone)]
pub struct TestMotor {
    pub position: Vector3,
    pub rotation: Quaternion,
    pub velocity: Vector3,
    pub grounding: GroundingStatus,
    pub capsule: CapsuleDimensions,
    pub capsule_history: Vec<CapsuleDimensions>,
    /// Returned by overlap queries whose layers include [`overlap_layer`](Self::overlap_layer).
    pub overlaps: usize,
    pub overlap_layer: u8,
    pub unground_requests: Vec<Float>,
    unground_pending: bool,
    pub collision_enabled: bool,
    pub ground_solving_enabled: bool,
    pub visual_scale: Vector3,
    pub desired_velocity: Option<Vector3>,
    pub desired_rotation: Option<Quaternion>,
}

impl TestMotor {
    pub fn with_grounding(grounding: GroundingStatus) -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            velocity: Vector3::ZERO,
            grounding,
            capsule: MovementConfig::default().standing_capsule,
            capsule_history: Vec::new(),
            overlaps: 0,
            overlap_layer: 0,
            unground_requests: Vec::new(),
            unground_pending: false,
            collision_enabled: true,
            ground_solving_enabled: true,
            visual_scale: Vector3::ONE,
            desired_velocity: None,
            desired_rotation: None,
        }
    }

    pub fn grounded() -> Self {
        Self::with_grounding(GroundingStatus::stable(Vector3::Y))
    }

    pub fn airborne() -> Self {
        Self::with_grounding(GroundingStatus::AIRBORNE)
    }

    /// Apply the desired velocity and rotation, the way a motor would after its sweep. A pending
    /// unground request makes the character leave the ground.
    pub fn integrate(&mut self, frame_duration: Float) {
        if let Some(velocity) = self.desired_velocity.take() {
            self.velocity = velocity;
        }
        if let Some(rotation) = self.desired_rotation.take() {
            self.rotation = rotation;
        }
        self.position += self.velocity * frame_duration;
        if std::mem::take(&mut self.unground_pending) {
            self.grounding = GroundingStatus::AIRBORNE;
        }
    }
}

impl CharacterMotor for TestMotor {
    fn position(&self) -> Vector3 {
        self.position
    }

    fn rotation(&self) -> Quaternion {
        self.rotation
    }

    fn velocity(&self) -> Vector3 {
        self.velocity
    }

    fn grounding(&self) -> GroundingStatus {
        self.grounding
    }

    fn set_desired_velocity(&mut self, velocity: Vector3) {
        self.desired_velocity = Some(velocity);
    }

    fn set_desired_rotation(&mut self, rotation: Quaternion) {
        self.desired_rotation = Some(rotation);
    }

    fn set_capsule_dimensions(&mut self, dimensions: CapsuleDimensions) {
        self.capsule = dimensions;
        self.capsule_history.push(dimensions);
    }

    fn overlap_count(&self, _pose: CharacterPose, layers: LayerMask) -> usize {
        if layers.contains(self.overlap_layer) {
            self.overlaps
        } else {
            0
        }
    }

    fn force_unground(&mut self, duration: Float) {
        self.unground_requests.push(duration);
        self.unground_pending = true;
    }

    fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision_enabled = enabled;
    }

    fn set_ground_solving_enabled(&mut self, enabled: bool) {
        self.ground_solving_enabled = enabled;
    }

    fn set_visual_scale(&mut self, scale: Vector3) {
        self.visual_scale = scale;
    }
}

/// Records the crouch transitions a slide asks for.
#[derive(Debug, Default)]
pub struct RecordingCrouch {
    pub is_crouching: bool,
    pub block_uncrouch: bool,
    pub enter_calls: usize,
    pub uncrouch_calls: usize,
}

impl CrouchTransitions for RecordingCrouch {
    fn is_crouching(&self) -> bool {
        self.is_crouching
    }

    fn enter_crouch(&mut self, _motor: &mut dyn CharacterMotor) {
        self.enter_calls += 1;
        self.is_crouching = true;
    }

    fn try_uncrouch(&mut self, _motor: &mut dyn CharacterMotor) -> bool {
        self.uncrouch_calls += 1;
        if !self.block_uncrouch {
            self.is_crouching = false;
        }
        !self.is_crouching
    }
}

/// A movement system and its motor, ticked the way a host loop would.
pub struct Harness {
    pub system: MovementSystem,
    pub motor: TestMotor,
}

impl Harness {
    pub fn new(config: MovementConfig, motor: TestMotor) -> Self {
        Self::activated(
            MovementSystem::new(DefaultMovementModule::new(Arc::new(config))),
            motor,
        )
    }

    /// Activate the initial module right away, so that intent and requests given before the
    /// first tick are not reset by the activation.
    pub fn activated(mut system: MovementSystem, mut motor: TestMotor) -> Self {
        system
            .switch_mode(MovementMode::Default, &mut motor)
            .expect("default mode is always registered");
        Self { system, motor }
    }

    pub fn module(&mut self) -> &mut DefaultMovementModule {
        self.system
            .module_mut::<DefaultMovementModule>()
            .expect("default module is registered")
    }

    pub fn tick(&mut self) {
        self.system.update_before_motor(&mut self.motor, DT);
        self.motor.integrate(DT);
        self.system.after_update(DT, &mut self.motor);
    }

    pub fn tick_n(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }
}

pub fn approx_eq(a: Float, b: Float, tolerance: Float) -> bool {
    (a - b).abs() <= tolerance
}

pub fn approx_eq_vec(a: Vector3, b: Vector3, tolerance: Float) -> bool {
    (a - b).length() <= tolerance
}
