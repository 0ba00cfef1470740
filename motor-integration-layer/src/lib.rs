use bevy::prelude::*;

pub mod math;
pub mod motor;

/// Umbrella system set for [`MovementPipelineSystems`].
///
/// Motor backends are responsible for preventing this entire system set from running while the
/// simulation itself is paused.
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub struct MovementSystems;

/// The stages of a single movement tick.
///
/// Resolution happens in two halves around the motor's own integration: the movement modules
/// compute desired rotation and velocity in [`Resolve`](Self::Resolve), the motor sweeps and
/// moves the character in [`Motors`](Self::Motors), and the modules react to the outcome in
/// [`AfterUpdate`](Self::AfterUpdate).
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub enum MovementPipelineSystems {
    /// The backend refreshes the motor view (pose, velocity, grounding).
    Sensors,
    /// User systems feed intent and requests into the movement modules.
    UserControls,
    /// The active module updates rotation and velocity.
    Resolve,
    /// The backend integrates the desired velocity and rotation.
    Motors,
    /// The active module advances its timers and resolves crouch and slide transitions.
    AfterUpdate,
}
