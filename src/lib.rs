//! # Kinematic movement modules for Bevy character motors
//!
//! This crate decides, once per simulation tick, how a character's velocity and rotation should
//! change. It does not move the character - a character motor (a kinematic body with its own
//! collision sweep and ground probing) does that, and talks to this crate through the
//! [`CharacterMotor`] trait.
//!
//! A character gets a [`MovementSystem`] holding a default module - usually
//! [`DefaultMovementModule`] - and optionally some override modules, like the debug
//! [`NoClipModule`]. Each tick runs three phases on the active module:
//!
//! ```text
//! update_rotation -> update_physics -> [motor integrates] -> after_update
//! ```
//!
//! The phases can be driven manually by a custom loop, or by adding [`MovementPlugin`] with the
//! motor component type:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use bevy::prelude::*;
//! # use bevy_kinematic_movement::prelude::*;
//! # use bevy_kinematic_movement::math::*;
//! # use bevy_kinematic_movement::{CapsuleDimensions, CharacterPose, GroundingStatus, LayerMask};
//! # #[derive(Component)]
//! # struct MyMotor;
//! # impl CharacterMotor for MyMotor {
//! #     fn position(&self) -> Vector3 { Vector3::ZERO }
//! #     fn rotation(&self) -> Quaternion { Quaternion::IDENTITY }
//! #     fn velocity(&self) -> Vector3 { Vector3::ZERO }
//! #     fn grounding(&self) -> GroundingStatus { GroundingStatus::AIRBORNE }
//! #     fn set_desired_velocity(&mut self, _: Vector3) {}
//! #     fn set_desired_rotation(&mut self, _: Quaternion) {}
//! #     fn set_capsule_dimensions(&mut self, _: CapsuleDimensions) {}
//! #     fn overlap_count(&self, _: CharacterPose, _: LayerMask) -> usize { 0 }
//! #     fn force_unground(&mut self, _: Float) {}
//! #     fn set_collision_enabled(&mut self, _: bool) {}
//! #     fn set_ground_solving_enabled(&mut self, _: bool) {}
//! # }
//! fn setup(mut commands: Commands) {
//!     let config = Arc::new(MovementConfig::default());
//!     commands.spawn((
//!         MyMotor,
//!         MovementSystem::new(DefaultMovementModule::new(config.clone()))
//!             .with_override("noclip", NoClipModule::new(config))
//!             .unwrap(),
//!     ));
//! }
//!
//! App::new()
//!     .add_plugins(MovementPlugin::<MyMotor>::default())
//!     .add_systems(Startup, setup);
//! ```
//!
//! User controls should be applied in [`MovementPipelineSystems::UserControls`], by calling
//! [`MovementSystem::set_intent`] and [`MovementSystem::request`].
mod config;
mod crouch;
mod dash;
mod default_module;
mod intent;
mod jump;
mod module;
mod noclip;
mod plugin;
mod slide;
mod status;
mod system;
pub mod util;

pub mod prelude {
    pub use crate::{
        CharacterMotor, DefaultMovementModule, MovementConfig, MovementIntent, MovementMode,
        MovementModule, MovementPipelineSystems, MovementPlugin, MovementRequest, MovementSystem,
        NoClipModule,
    };
}

pub use bevy_kinematic_movement_motor_layer::math;
pub use bevy_kinematic_movement_motor_layer::motor::*;
pub use bevy_kinematic_movement_motor_layer::{MovementPipelineSystems, MovementSystems};

pub use config::{MovementConfig, SlideInputMode};
pub use crouch::{CrouchController, CrouchState, CrouchTransitions};
pub use dash::DashState;
pub use default_module::DefaultMovementModule;
pub use intent::{MovementIntent, MovementRequest};
pub use jump::{JumpHandler, JumpKind, JumpState};
pub use module::{MovementHit, MovementModule};
pub use noclip::NoClipModule;
pub use plugin::MovementPlugin;
pub use slide::{SlideContext, SlideHandler, SlideState};
pub use status::{LocomotionState, MovementStatus};
pub use system::{GatePolicy, MovementError, MovementMode, MovementSystem, RewindGate};
