use crate::math::{Float, Vector3};
use crate::{CapsuleDimensions, LayerMask};

/// How a slide is started and stopped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum SlideInputMode {
    /// The slide lasts while both crouch and sprint are held.
    #[default]
    Hold,
    /// A slide request starts the slide, and a second request stops it.
    Toggle,
}

/// Tunables for the movement modules of a single character.
///
/// This is shared (usually as an `Arc<MovementConfig>`) between the modules of a character and
/// never mutated while they run. The values are not validated - negative durations or
/// sharpness coefficients will produce odd but non-crashing behavior.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct MovementConfig {
    /// Top walking speed on stable ground.
    pub max_stable_move_speed: Float,

    /// Top speed on stable ground while sprint is held.
    pub sprint_speed: Float,

    /// Top speed on stable ground while crouched.
    pub crouched_move_speed: Float,

    /// How fast the ground velocity approaches the target velocity.
    ///
    /// This is the `k` in the `1 - exp(-k * dt)` blend factor, so the result does not depend on
    /// the tick rate.
    pub stable_movement_sharpness: Float,

    /// How fast the character turns to face its movement direction. Set to `0.0` to disable
    /// turning.
    pub orientation_sharpness: Float,

    /// Keep the character's up axis aligned against [`gravity`](Self::gravity).
    ///
    /// Only needed when gravity is not vertical (planets, gravity fields).
    pub orient_towards_gravity: bool,

    /// The maximum planar speed air control can bring the character to.
    ///
    /// Faster planar speeds (e.g. from a dash) are allowed, but they decay back toward this
    /// value at [`air_overspeed_decay`](Self::air_overspeed_decay).
    pub max_air_move_speed: Float,

    /// Acceleration from move input while airborne.
    pub air_acceleration_speed: Float,

    /// Rate at which planar speed above [`max_air_move_speed`](Self::max_air_move_speed) decays
    /// back to it.
    pub air_overspeed_decay: Float,

    /// Airborne drag, applied as `velocity *= 1 / (1 + drag * dt)`.
    pub drag: Float,

    pub gravity: Vector3,

    /// Allow jumping (and refilling jumps) while resting on ground too steep to walk on.
    pub allow_jumping_on_steep_ground: bool,

    pub allow_double_jump: bool,

    pub allow_wall_jump: bool,

    /// The upward speed a jump sets. The upward component of the velocity is replaced, not
    /// added to, so the jump height does not depend on the vertical speed before the jump.
    pub jump_speed: Float,

    /// A duration, in seconds, where a player can press the jump button before landing and the
    /// jump will still happen on the landing tick.
    pub jump_pre_grounding_grace_time: Float,

    /// A duration, in seconds, after leaving the ground where the character can still make its
    /// first jump.
    pub jump_post_grounding_grace_time: Float,

    /// How long the motor stops snapping to the ground after a jump.
    pub jump_unground_duration: Float,

    /// Instant velocity added by a dash.
    pub dash_force: Float,

    pub max_dash_charges: u32,

    /// Minimal time between two dashes, even when charges are available.
    pub dash_intermission_time: Float,

    /// Time it takes to reload a single dash charge.
    pub dash_reload_time: Float,

    pub slide_input_mode: SlideInputMode,

    /// The speed a slide on flat ground settles at.
    pub base_slide_speed: Float,

    /// How fast the slide speed approaches its target speed.
    pub slide_friction: Float,

    /// How much the slope affects the slide target speed. At 90 degrees directly downhill, this
    /// is the speed added to [`base_slide_speed`](Self::base_slide_speed).
    pub slide_gravity_influence: Float,

    /// The planar speed the character must exceed to start a slide.
    ///
    /// Kept below [`min_slide_speed_to_maintain`](Self::min_slide_speed_to_maintain), so a slide
    /// started at a low speed survives only if the blend toward
    /// [`base_slide_speed`](Self::base_slide_speed) lifts it over that threshold on its first
    /// tick.
    pub min_slide_entry_speed: Float,

    /// The slide ends once its speed drops below this.
    pub min_slide_speed_to_maintain: Float,

    pub max_slide_duration: Float,

    /// Minimal time between the end of a slide and the start of the next one.
    pub slide_cooldown: Float,

    pub standing_capsule: CapsuleDimensions,

    pub crouched_capsule: CapsuleDimensions,

    /// Layers checked for obstructions before standing up from a crouch.
    pub crouch_collision_layers: LayerMask,

    pub noclip_speed: Float,

    pub noclip_sprint_speed: Float,

    pub noclip_sharpness: Float,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_stable_move_speed: 10.0,
            sprint_speed: 15.0,
            crouched_move_speed: 4.0,
            stable_movement_sharpness: 15.0,
            orientation_sharpness: 10.0,
            orient_towards_gravity: false,
            max_air_move_speed: 15.0,
            air_acceleration_speed: 15.0,
            air_overspeed_decay: 4.0,
            drag: 0.1,
            gravity: Vector3::new(0.0, -30.0, 0.0),
            allow_jumping_on_steep_ground: false,
            allow_double_jump: false,
            allow_wall_jump: false,
            jump_speed: 10.0,
            jump_pre_grounding_grace_time: 0.1,
            jump_post_grounding_grace_time: 0.1,
            jump_unground_duration: 0.1,
            dash_force: 20.0,
            max_dash_charges: 3,
            dash_intermission_time: 0.3,
            dash_reload_time: 1.5,
            slide_input_mode: SlideInputMode::Hold,
            base_slide_speed: 12.0,
            slide_friction: 2.0,
            slide_gravity_influence: 10.0,
            min_slide_entry_speed: 2.0,
            min_slide_speed_to_maintain: 3.0,
            max_slide_duration: 1.5,
            slide_cooldown: 0.5,
            standing_capsule: CapsuleDimensions::new(0.5, 2.0, 1.0),
            crouched_capsule: CapsuleDimensions::new(0.5, 1.0, 0.5),
            crouch_collision_layers: LayerMask::ALL,
            noclip_speed: 10.0,
            noclip_sprint_speed: 25.0,
            noclip_sharpness: 15.0,
        }
    }
}
