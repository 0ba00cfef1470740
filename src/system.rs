use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::*;

use crate::math::{Float, Quaternion, Vector3};
use crate::{
    CharacterMotor, MovementHit, MovementIntent, MovementModule, MovementRequest, MovementStatus,
};

/// Which module drives the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    #[default]
    Default,
    /// An override module registered under this name.
    Override(&'static str),
}

/// A flag shared with the host (e.g. a time-rewind recorder) that freezes movement while engaged.
///
/// Clones share the same flag.
#[derive(Resource, Clone, Default, Debug)]
pub struct RewindGate(Arc<AtomicBool>);

impl RewindGate {
    pub fn engage(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn release(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_engaged(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What the [`RewindGate`] freezes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePolicy {
    /// Skip the rotation and physics phases. The after-update phase still runs, so timers that
    /// advance there (dash reload, slide transitions, buffered jump expiry) keep going.
    #[default]
    FreezeMotion,
    /// Skip all three phases.
    FreezeAll,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MovementError {
    #[error("Movement mode {0:?} is already registered")]
    DuplicateMode(&'static str),
    #[error("Movement mode {0:?} is not registered")]
    UnknownMode(&'static str),
}

/// Holds the movement modules of a character and dispatches the tick phases to the active one.
///
/// The active module is chosen from the outside with [`switch_mode`](Self::switch_mode) - modules
/// never select themselves. Every switch deactivates the old module and activates the new one,
/// which resets the new module's timers and flags.
#[derive(Component)]
pub struct MovementSystem {
    default_module: Box<dyn MovementModule>,
    overrides: Vec<(&'static str, Box<dyn MovementModule>)>,
    active: MovementMode,
    needs_activation: bool,
    gate: RewindGate,
    gate_policy: GatePolicy,
}

impl MovementSystem {
    pub fn new(default_module: impl MovementModule) -> Self {
        Self {
            default_module: Box::new(default_module),
            overrides: Vec::new(),
            active: MovementMode::Default,
            needs_activation: true,
            gate: Default::default(),
            gate_policy: Default::default(),
        }
    }

    pub fn with_override(
        mut self,
        name: &'static str,
        module: impl MovementModule,
    ) -> Result<Self, MovementError> {
        self.add_override(name, module)?;
        Ok(self)
    }

    pub fn add_override(
        &mut self,
        name: &'static str,
        module: impl MovementModule,
    ) -> Result<(), MovementError> {
        if self.overrides.iter().any(|(existing, _)| *existing == name) {
            return Err(MovementError::DuplicateMode(name));
        }
        self.overrides.push((name, Box::new(module)));
        Ok(())
    }

    pub fn with_gate(mut self, gate: RewindGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_gate_policy(mut self, gate_policy: GatePolicy) -> Self {
        self.gate_policy = gate_policy;
        self
    }

    pub fn gate(&self) -> &RewindGate {
        &self.gate
    }

    pub fn active_mode(&self) -> MovementMode {
        self.active
    }

    /// Hand control to another module.
    ///
    /// Switching to the mode that is already active does nothing, except activating the initial
    /// module if no phase ran yet.
    pub fn switch_mode(
        &mut self,
        mode: MovementMode,
        motor: &mut dyn CharacterMotor,
    ) -> Result<(), MovementError> {
        if let MovementMode::Override(name) = mode {
            if !self.overrides.iter().any(|(existing, _)| *existing == name) {
                return Err(MovementError::UnknownMode(name));
            }
        }
        if mode == self.active {
            self.ensure_activated(motor);
            return Ok(());
        }
        if !self.needs_activation {
            self.active_box_mut().on_deactivated(motor);
        }
        debug!("Switching movement mode from {:?} to {:?}", self.active, mode);
        self.active = mode;
        self.active_box_mut().on_activated(motor);
        self.needs_activation = false;
        Ok(())
    }

    fn active_box(&self) -> &dyn MovementModule {
        if let MovementMode::Override(name) = self.active {
            if let Some((_, module)) = self.overrides.iter().find(|(n, _)| *n == name) {
                return &**module;
            }
        }
        &*self.default_module
    }

    fn active_box_mut(&mut self) -> &mut Box<dyn MovementModule> {
        if let MovementMode::Override(name) = self.active {
            if let Some(index) = self.overrides.iter().position(|(n, _)| *n == name) {
                return &mut self.overrides[index].1;
            }
        }
        &mut self.default_module
    }

    pub fn active_module(&self) -> &dyn MovementModule {
        self.active_box()
    }

    pub fn active_module_mut(&mut self) -> &mut dyn MovementModule {
        &mut **self.active_box_mut()
    }

    /// Find a registered module (active or not) by its concrete type.
    pub fn module<M: MovementModule>(&self) -> Option<&M> {
        std::iter::once(&self.default_module)
            .chain(self.overrides.iter().map(|(_, module)| module))
            .find_map(|module| module.as_any().downcast_ref::<M>())
    }

    pub fn module_mut<M: MovementModule>(&mut self) -> Option<&mut M> {
        std::iter::once(&mut self.default_module)
            .chain(self.overrides.iter_mut().map(|(_, module)| module))
            .find_map(|module| module.as_mut_any().downcast_mut::<M>())
    }

    pub fn set_intent(&mut self, intent: MovementIntent) {
        self.active_box_mut().set_intent(intent);
    }

    pub fn request(&mut self, request: MovementRequest) {
        self.active_box_mut().request(request);
    }

    /// Forward a contact reported by the motor's sweep to the active module.
    pub fn on_movement_hit(&mut self, hit: MovementHit, motor: &dyn CharacterMotor) {
        self.active_box_mut().on_movement_hit(hit, motor);
    }

    pub fn status(&self, motor: &dyn CharacterMotor) -> MovementStatus {
        self.active_box().status(motor)
    }

    fn ensure_activated(&mut self, motor: &mut dyn CharacterMotor) {
        if self.needs_activation {
            self.needs_activation = false;
            self.active_box_mut().on_activated(motor);
        }
    }

    pub fn update_rotation(
        &mut self,
        rotation: &mut Quaternion,
        frame_duration: Float,
        motor: &mut dyn CharacterMotor,
    ) {
        self.ensure_activated(motor);
        if self.gate.is_engaged() {
            return;
        }
        self.active_box_mut()
            .update_rotation(rotation, frame_duration, motor);
    }

    pub fn update_physics(
        &mut self,
        velocity: &mut Vector3,
        frame_duration: Float,
        motor: &mut dyn CharacterMotor,
    ) {
        self.ensure_activated(motor);
        if self.gate.is_engaged() {
            return;
        }
        self.active_box_mut()
            .update_physics(velocity, frame_duration, motor);
    }

    pub fn after_update(&mut self, frame_duration: Float, motor: &mut dyn CharacterMotor) {
        self.ensure_activated(motor);
        if self.gate.is_engaged() {
            self.active_box_mut().discard_one_shot_requests();
            if self.gate_policy == GatePolicy::FreezeAll {
                return;
            }
        }
        self.active_box_mut().after_update(frame_duration, motor);
    }

    /// Run the rotation and physics phases against the motor's current state, and write the
    /// results back as the motor's desired rotation and velocity.
    ///
    /// While the [`RewindGate`] is engaged nothing is written back.
    pub fn update_before_motor(&mut self, motor: &mut dyn CharacterMotor, frame_duration: Float) {
        self.ensure_activated(motor);
        if self.gate.is_engaged() {
            return;
        }

        let mut rotation = motor.rotation();
        self.update_rotation(&mut rotation, frame_duration, motor);
        motor.set_desired_rotation(rotation);

        let mut velocity = motor.velocity();
        self.update_physics(&mut velocity, frame_duration, motor);
        motor.set_desired_velocity(velocity);
    }
}
