use std::marker::PhantomData;

use bevy::ecs::component::Mutable;
use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

use crate::math::AdjustPrecision;
use crate::{CharacterMotor, MovementPipelineSystems, MovementSystem, MovementSystems};

/// Ticks every entity that has both a [`MovementSystem`] and a motor component `M`.
///
/// The resolve phase runs in [`MovementPipelineSystems::Resolve`] and the post phase in
/// [`MovementPipelineSystems::AfterUpdate`]. The motor backend is expected to refresh `M` in
/// [`MovementPipelineSystems::Sensors`] and integrate it in [`MovementPipelineSystems::Motors`],
/// and user code should feed intent in [`MovementPipelineSystems::UserControls`].
pub struct MovementPlugin<M> {
    schedule: InternedScheduleLabel,
    _phantom: PhantomData<M>,
}

impl<M> MovementPlugin<M> {
    pub fn new(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
            _phantom: PhantomData,
        }
    }
}

impl<M> Default for MovementPlugin<M> {
    fn default() -> Self {
        Self::new(FixedUpdate)
    }
}

impl<M> Plugin for MovementPlugin<M>
where
    M: CharacterMotor + Component<Mutability = Mutable>,
{
    fn build(&self, app: &mut App) {
        app.configure_sets(
            self.schedule,
            (
                MovementPipelineSystems::Sensors,
                MovementPipelineSystems::UserControls,
                MovementPipelineSystems::Resolve,
                MovementPipelineSystems::Motors,
                MovementPipelineSystems::AfterUpdate,
            )
                .chain()
                .in_set(MovementSystems),
        );
        app.add_systems(
            self.schedule,
            (
                resolve_movement_system::<M>.in_set(MovementPipelineSystems::Resolve),
                after_update_movement_system::<M>.in_set(MovementPipelineSystems::AfterUpdate),
            ),
        );
    }
}

fn resolve_movement_system<M>(time: Res<Time>, mut query: Query<(&mut MovementSystem, &mut M)>)
where
    M: CharacterMotor + Component<Mutability = Mutable>,
{
    let frame_duration = time.delta_secs_f64().adjust_precision();
    if frame_duration == 0.0 {
        return;
    }
    for (mut system, mut motor) in query.iter_mut() {
        system.update_before_motor(&mut *motor, frame_duration);
    }
}

fn after_update_movement_system<M>(
    time: Res<Time>,
    mut query: Query<(&mut MovementSystem, &mut M)>,
) where
    M: CharacterMotor + Component<Mutability = Mutable>,
{
    let frame_duration = time.delta_secs_f64().adjust_precision();
    if frame_duration == 0.0 {
        return;
    }
    for (mut system, mut motor) in query.iter_mut() {
        system.after_update(frame_duration, &mut *motor);
    }
}
