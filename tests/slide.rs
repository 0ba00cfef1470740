mod common;

use bevy_kinematic_movement::math::*;
use bevy_kinematic_movement::{
    CrouchTransitions, GroundingStatus, LocomotionState, MovementConfig, MovementIntent,
    MovementRequest, SlideContext, SlideHandler, SlideInputMode,
};
use common::{approx_eq_vec, Harness, RecordingCrouch, TestMotor, DT};

const SLIDING_INTENT: MovementIntent = MovementIntent {
    move_input: Vector3::X,
    sprint_held: true,
    crouch_held: true,
};

fn ctx<'a>(config: &'a MovementConfig, intent: &'a MovementIntent, now: Float) -> SlideContext<'a> {
    SlideContext {
        config,
        intent,
        frame_duration: DT,
        now,
    }
}

fn moving_motor(grounding: GroundingStatus, velocity: Vector3) -> TestMotor {
    let mut motor = TestMotor::with_grounding(grounding);
    motor.velocity = velocity;
    motor
}

/// Request a slide and evaluate it right away.
fn start_slide(
    handler: &mut SlideHandler,
    config: &MovementConfig,
    intent: &MovementIntent,
    now: Float,
    motor: &mut TestMotor,
    crouch: &mut RecordingCrouch,
) -> bool {
    handler.request_slide();
    handler.handle_slide(&ctx(config, intent, now), motor, crouch);
    handler.is_sliding()
}

#[test]
fn slide_starts_when_sprinting_fast_enough() {
    let config = MovementConfig::default();
    let mut motor = moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(8.0, 0.0, 0.0));
    let mut crouch = RecordingCrouch::default();
    let mut handler = SlideHandler::default();

    assert!(start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        0.0,
        &mut motor,
        &mut crouch
    ));
    assert_eq!(handler.state().locked_slide_direction, Vector3::X);
    assert_eq!(crouch.enter_calls, 1);
    assert!(crouch.is_crouching);
}

#[test]
fn slide_rejected_while_crouching() {
    let config = MovementConfig::default();
    let mut motor = moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(8.0, 0.0, 0.0));
    let mut crouch = RecordingCrouch {
        is_crouching: true,
        ..Default::default()
    };
    let mut handler = SlideHandler::default();

    assert!(!start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        0.0,
        &mut motor,
        &mut crouch
    ));
    assert_eq!(crouch.enter_calls, 0);
}

#[test]
fn slide_rejected_when_too_slow_or_not_sprinting() {
    let config = MovementConfig::default();
    let mut crouch = RecordingCrouch::default();
    let mut handler = SlideHandler::default();

    let mut slow_motor =
        moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(1.5, 0.0, 0.0));
    assert!(!start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        0.0,
        &mut slow_motor,
        &mut crouch
    ));

    let mut fast_motor =
        moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(8.0, 0.0, 0.0));
    let walking = MovementIntent {
        sprint_held: false,
        ..SLIDING_INTENT
    };
    assert!(!start_slide(
        &mut handler,
        &config,
        &walking,
        0.0,
        &mut fast_motor,
        &mut crouch
    ));

    // The rejected request is not kept around.
    handler.handle_slide(&ctx(&config, &SLIDING_INTENT, 0.0), &mut fast_motor, &mut crouch);
    assert!(!handler.is_sliding());
}

#[test]
fn slide_cooldown_is_respected() {
    let config = MovementConfig::default();
    let mut motor = moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(8.0, 0.0, 0.0));
    let mut crouch = RecordingCrouch::default();
    let mut handler = SlideHandler::default();

    assert!(start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        0.5,
        &mut motor,
        &mut crouch
    ));

    motor.grounding = GroundingStatus::AIRBORNE;
    handler.handle_slide(&ctx(&config, &SLIDING_INTENT, 1.0), &mut motor, &mut crouch);
    assert!(!handler.is_sliding());
    assert_eq!(handler.state().last_exit_timestamp, 1.0);

    motor.grounding = GroundingStatus::stable(Vector3::Y);
    crouch.is_crouching = false;
    assert!(!start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        1.2,
        &mut motor,
        &mut crouch
    ));
    assert!(start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        1.6,
        &mut motor,
        &mut crouch
    ));
}

#[test]
fn slow_slide_exits_and_stands_up_unless_crouch_is_held() {
    let config = MovementConfig {
        slide_input_mode: SlideInputMode::Toggle,
        base_slide_speed: 0.0,
        ..Default::default()
    };

    for (crouch_held, expected_uncrouch_calls) in [(false, 1), (true, 0)] {
        let intent = MovementIntent {
            crouch_held,
            ..SLIDING_INTENT
        };
        let mut motor =
            moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(8.0, 0.0, 0.0));
        let mut crouch = RecordingCrouch::default();
        let mut handler = SlideHandler::default();
        assert!(start_slide(
            &mut handler,
            &config,
            &intent,
            0.0,
            &mut motor,
            &mut crouch
        ));

        let mut velocity = Vector3::new(2.0, 0.0, 0.0);
        handler.apply_slide_physics(&mut velocity, &ctx(&config, &intent, 0.0), &mut motor, &mut crouch);

        assert!(!handler.is_sliding());
        assert_eq!(velocity, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(crouch.uncrouch_calls, expected_uncrouch_calls);
        assert_eq!(crouch.is_crouching, crouch_held);
    }
}

#[test]
fn slide_speeds_up_downhill_and_slows_down_uphill() {
    let config = MovementConfig {
        slide_input_mode: SlideInputMode::Toggle,
        ..Default::default()
    };
    // Descends toward +X.
    let slope = GroundingStatus::stable(Vector3::new(0.5, 0.866_025_4, 0.0));

    for (direction, speeds_up) in [(Vector3::X, true), (Vector3::NEG_X, false)] {
        let mut motor = moving_motor(slope, direction * 8.0);
        let mut crouch = RecordingCrouch::default();
        let mut handler = SlideHandler::default();
        assert!(start_slide(
            &mut handler,
            &config,
            &SLIDING_INTENT,
            0.0,
            &mut motor,
            &mut crouch
        ));

        let mut velocity = direction * 12.0;
        handler.apply_slide_physics(
            &mut velocity,
            &ctx(&config, &SLIDING_INTENT, 0.0),
            &mut motor,
            &mut crouch,
        );

        assert!(handler.is_sliding());
        assert_eq!(12.0 < velocity.length(), speeds_up);
        assert!(approx_eq_vec(velocity.normalize(), direction, 1e-5));
    }
}

#[test]
fn slide_ends_after_max_duration() {
    let config = MovementConfig {
        slide_input_mode: SlideInputMode::Toggle,
        ..Default::default()
    };
    let mut motor = moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(12.0, 0.0, 0.0));
    let mut crouch = RecordingCrouch::default();
    let mut handler = SlideHandler::default();
    assert!(start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        0.0,
        &mut motor,
        &mut crouch
    ));

    let mut velocity = Vector3::new(12.0, 0.0, 0.0);
    let mut ticks = 0;
    while handler.is_sliding() {
        ticks += 1;
        assert!(ticks <= 80, "slide never ended");
        handler.apply_slide_physics(
            &mut velocity,
            &ctx(&config, &SLIDING_INTENT, 0.0),
            &mut motor,
            &mut crouch,
        );
    }
    assert!(70 <= ticks);
}

#[test]
fn toggle_request_while_sliding_exits() {
    let config = MovementConfig {
        slide_input_mode: SlideInputMode::Toggle,
        ..Default::default()
    };
    let intent = MovementIntent {
        crouch_held: false,
        ..SLIDING_INTENT
    };
    let mut motor = moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(8.0, 0.0, 0.0));
    let mut crouch = RecordingCrouch::default();
    let mut handler = SlideHandler::default();

    assert!(start_slide(&mut handler, &config, &intent, 0.0, &mut motor, &mut crouch));
    // A toggled slide does not need crouch to be held.
    handler.handle_slide(&ctx(&config, &intent, 0.1), &mut motor, &mut crouch);
    assert!(handler.is_sliding());

    assert!(!start_slide(&mut handler, &config, &intent, 0.2, &mut motor, &mut crouch));
    assert_eq!(crouch.uncrouch_calls, 1);
}

#[test]
fn hold_mode_exits_when_sprint_is_released() {
    let config = MovementConfig::default();
    let mut motor = moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(8.0, 0.0, 0.0));
    let mut crouch = RecordingCrouch::default();
    let mut handler = SlideHandler::default();

    assert!(start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        0.0,
        &mut motor,
        &mut crouch
    ));

    let released = MovementIntent {
        sprint_held: false,
        ..SLIDING_INTENT
    };
    handler.handle_slide(&ctx(&config, &released, 0.1), &mut motor, &mut crouch);
    assert!(!handler.is_sliding());
    // Crouch is still held, so the character stays down.
    assert_eq!(crouch.uncrouch_calls, 0);
    assert!(crouch.is_crouching);
}

#[test]
fn losing_the_ground_ends_the_slide() {
    let config = MovementConfig {
        slide_input_mode: SlideInputMode::Toggle,
        ..Default::default()
    };
    let mut motor = moving_motor(GroundingStatus::stable(Vector3::Y), Vector3::new(8.0, 0.0, 0.0));
    let mut crouch = RecordingCrouch::default();
    let mut handler = SlideHandler::default();
    assert!(start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        0.0,
        &mut motor,
        &mut crouch
    ));

    motor.grounding = GroundingStatus::AIRBORNE;
    handler.handle_slide(&ctx(&config, &SLIDING_INTENT, 0.1), &mut motor, &mut crouch);
    assert!(!handler.is_sliding());
}

#[test]
fn slow_entry_is_carried_by_the_blend_toward_base_speed() {
    let config = MovementConfig::default();
    assert!(config.min_slide_entry_speed < config.min_slide_speed_to_maintain);

    // Fast enough to start, too slow to maintain.
    let entry_speed = 2.9;
    let mut motor = moving_motor(
        GroundingStatus::stable(Vector3::Y),
        Vector3::new(entry_speed, 0.0, 0.0),
    );
    let mut crouch = RecordingCrouch::default();
    let mut handler = SlideHandler::default();
    assert!(start_slide(
        &mut handler,
        &config,
        &SLIDING_INTENT,
        0.0,
        &mut motor,
        &mut crouch
    ));

    let mut velocity = Vector3::new(entry_speed, 0.0, 0.0);
    let mut previous_speed = entry_speed;
    for _ in 0..10 {
        handler.apply_slide_physics(
            &mut velocity,
            &ctx(&config, &SLIDING_INTENT, 0.0),
            &mut motor,
            &mut crouch,
        );
        assert!(handler.is_sliding());
        assert!(config.min_slide_speed_to_maintain <= velocity.x);
        assert!(previous_speed < velocity.x);
        previous_speed = velocity.x;
    }
    assert_eq!(crouch.uncrouch_calls, 0);
}

/// A grounded character sprinting along X with crouch held, asking to slide.
fn sliding_harness() -> Harness {
    let mut motor = TestMotor::grounded();
    motor.velocity = Vector3::new(8.0, 0.0, 0.0);
    let mut harness = Harness::new(MovementConfig::default(), motor);
    harness.system.set_intent(SLIDING_INTENT);
    harness.system.request(MovementRequest::Slide);
    harness.tick();
    harness
}

#[test]
fn slide_request_crouches_and_locks_direction() {
    let mut harness = sliding_harness();
    let config = MovementConfig::default();

    assert!(harness.module().is_sliding());
    assert_eq!(harness.motor.capsule, config.crouched_capsule);
    let status = harness.system.status(&harness.motor);
    assert_eq!(status.state, LocomotionState::Sliding);
    assert!(status.is_sliding);
    assert!(status.is_crouching);

    // Steering does not bend the slide, and sprint overriding crouch does not stand it up.
    harness.system.set_intent(MovementIntent {
        move_input: Vector3::Z,
        ..SLIDING_INTENT
    });
    harness.tick_n(5);
    assert!(harness.module().is_sliding());
    assert!(0.0 < harness.motor.velocity.x);
    assert_eq!(harness.motor.velocity.y, 0.0);
    assert_eq!(harness.motor.velocity.z, 0.0);
    assert_eq!(harness.motor.capsule, config.crouched_capsule);
}

#[test]
fn releasing_sprint_ends_the_slide_in_a_crouch() {
    let mut harness = sliding_harness();
    let config = MovementConfig::default();

    harness.system.set_intent(MovementIntent {
        sprint_held: false,
        ..SLIDING_INTENT
    });
    harness.tick();
    assert!(!harness.module().is_sliding());
    assert!(harness.module().crouch_controller().is_crouching());
    assert_eq!(harness.motor.capsule, config.crouched_capsule);
    assert_eq!(
        harness.system.status(&harness.motor).state,
        LocomotionState::Crouching
    );
}

#[test]
fn slide_running_out_stands_up_while_sprinting() {
    let mut harness = sliding_harness();
    let config = MovementConfig::default();

    let mut ticks = 0;
    while harness.module().is_sliding() {
        ticks += 1;
        assert!(ticks <= 80, "slide never ended");
        harness.tick();
    }
    assert!(70 <= ticks);

    // Crouch is still held, but sprint wins once the slide lets go of the crouch.
    assert!(!harness.module().crouch_controller().is_crouching());
    assert_eq!(harness.motor.capsule, config.standing_capsule);
    assert_eq!(
        harness.system.status(&harness.motor).state,
        LocomotionState::Sprinting
    );
}
