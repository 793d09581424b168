//! Integration tests for the locomotion controller.
//!
//! These tests drive the full plugin pipeline in a Bevy app with a scripted
//! test backend. Each test checks the commands the backend received.

use bevy::prelude::*;
use locomotion_controller::backend::NoOpBackendPlugin;
use locomotion_controller::prelude::*;

/// Scripted physics body used by [`TestBackend`].
#[derive(Component, Debug, Clone, Default)]
struct TestBody {
    on_ground: bool,
    /// Physics-owned velocity. `None` makes the controller authoritative.
    velocity: Option<Vec3>,
    last_set_velocity: Option<Vec3>,
    full_sets: usize,
    horizontal_sets: usize,
    force: Vec3,
    yaw: f32,
}

/// Backend that reads and writes [`TestBody`].
struct TestBackend;

impl CharacterPhysicsBackend for TestBackend {
    fn plugin() -> impl Plugin {
        NoOpBackendPlugin
    }

    fn is_on_ground(world: &World, entity: Entity) -> bool {
        world.get::<TestBody>(entity).is_some_and(|b| b.on_ground)
    }

    fn get_velocity(world: &World, entity: Entity) -> Option<Vec3> {
        world.get::<TestBody>(entity).and_then(|b| b.velocity)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            body.full_sets += 1;
            body.last_set_velocity = Some(velocity);
            if body.velocity.is_some() {
                body.velocity = Some(velocity);
            }
        }
    }

    fn set_horizontal_velocity(world: &mut World, entity: Entity, vx: f32, vz: f32) {
        if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            body.horizontal_sets += 1;
            if let Some(v) = body.velocity.as_mut() {
                v.x = vx;
                v.z = vz;
            }
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            body.force = force;
        }
    }

    fn set_yaw(world: &mut World, entity: Entity, yaw: f32) {
        if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            body.yaw = yaw;
        }
    }
}

/// Step length used by the pipeline when `Time<Fixed>` has not advanced.
const DT: f32 = 1.0 / 60.0;

/// Create a minimal test app with the locomotion plugin.
fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(LocomotionPlugin::<TestBackend>::default());
    app.finish();
    app.cleanup();
    app
}

/// Spawn a grounded character whose velocity is owned by the controller.
fn spawn_character(app: &mut App) -> Entity {
    spawn_character_with(app, TestBody {
        on_ground: true,
        ..default()
    })
}

fn spawn_character_with(app: &mut App, body: TestBody) -> Entity {
    app.world_mut()
        .spawn((
            LocomotionController::new(),
            LocomotionConfig::default(),
            LocomotionIntent::default(),
            ActiveAnimation::default(),
            body,
        ))
        .id()
}

/// Run one fixed step.
fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

/// Run several fixed steps without touching the intent.
fn tick_n(app: &mut App, steps: usize) {
    for _ in 0..steps {
        tick(app);
    }
}

/// Run one fixed step per frame, writing the intent before each.
fn run_frames_with_intent(app: &mut App, entity: Entity, direction: Vec3, frames: usize) {
    for _ in 0..frames {
        set_direction(app, entity, direction);
        tick(app);
    }
}

fn set_direction(app: &mut App, entity: Entity, direction: Vec3) {
    app.world_mut()
        .get_mut::<LocomotionIntent>(entity)
        .unwrap()
        .set_direction(direction);
}

fn release_direction(app: &mut App, entity: Entity) {
    app.world_mut()
        .get_mut::<LocomotionIntent>(entity)
        .unwrap()
        .clear_direction();
}

fn request_jump(app: &mut App, entity: Entity) {
    app.world_mut()
        .get_mut::<LocomotionIntent>(entity)
        .unwrap()
        .request_jump();
}

fn controller(app: &App, entity: Entity) -> &LocomotionController {
    app.world().get::<LocomotionController>(entity).unwrap()
}

fn body(app: &App, entity: Entity) -> &TestBody {
    app.world().get::<TestBody>(entity).unwrap()
}

fn set_on_ground(app: &mut App, entity: Entity, on_ground: bool) {
    app.world_mut().get_mut::<TestBody>(entity).unwrap().on_ground = on_ground;
}

// ==================== Movement Tests ====================

mod movement {
    use super::*;

    #[test]
    fn intent_accelerates_character() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        set_direction(&mut app, character, Vec3::Z);
        tick(&mut app);

        let speed = controller(&app, character).current_speed();
        // min(5.5, 8.0 * DT)
        assert!((speed - 8.0 * DT).abs() < 1e-4, "speed after one step: {speed}");
        assert_eq!(body(&app, character).full_sets, 1);
        assert!(body(&app, character).force.z > 0.0);
    }

    #[test]
    fn sustained_intent_reaches_target_speed() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        // 2 seconds
        for _ in 0..120 {
            set_direction(&mut app, character, Vec3::X);
            tick(&mut app);
            assert!(controller(&app, character).current_speed() <= 5.5 + 1e-4);
        }

        let speed = controller(&app, character).current_speed();
        assert!((speed - 5.5).abs() < 0.05, "speed: {speed}");
        assert_eq!(controller(&app, character).animation_state(), AnimationState::Run);
        assert_eq!(
            app.world().get::<ActiveAnimation>(character).unwrap().0,
            AnimationState::Run
        );
    }

    #[test]
    fn held_direction_drives_every_fixed_step() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        // 30 render frames per second, two fixed steps each, for 2 seconds.
        for _ in 0..60 {
            set_direction(&mut app, character, Vec3::Z);
            tick_n(&mut app, 2);
        }

        let speed = controller(&app, character).current_speed();
        assert!((speed - 5.5).abs() < 0.05, "speed: {speed}");
    }

    #[test]
    fn direction_written_once_is_held() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        set_direction(&mut app, character, Vec3::X);
        tick_n(&mut app, 120);

        let speed = controller(&app, character).current_speed();
        assert!((speed - 5.5).abs() < 0.05, "speed: {speed}");
        assert_eq!(
            app.world().get::<LocomotionIntent>(character).unwrap().direction,
            Vec3::X
        );
    }

    #[test]
    fn jump_and_mode_requests_are_consumed() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        {
            let mut intent = app.world_mut().get_mut::<LocomotionIntent>(character).unwrap();
            intent.set_direction(Vec3::Z);
            intent.request_jump();
            intent.set_mode(MovementMode::Jog);
        }
        tick(&mut app);

        let intent = app.world().get::<LocomotionIntent>(character).unwrap();
        assert!(!intent.jump);
        assert_eq!(intent.mode, None);
        assert_eq!(intent.direction, Vec3::Z);
        assert_eq!(controller(&app, character).movement_mode(), MovementMode::Jog);
    }

    #[test]
    fn empty_intent_keeps_direct_controller_input() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        app.world_mut()
            .get_mut::<LocomotionController>(character)
            .unwrap()
            .set_intent_direction(Vec3::Z);
        tick(&mut app);

        let speed = controller(&app, character).current_speed();
        assert!((speed - 8.0 * DT).abs() < 1e-4, "speed: {speed}");
    }

    #[test]
    fn released_direction_lets_friction_act() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        set_direction(&mut app, character, Vec3::Z);
        tick(&mut app);
        let after_input = controller(&app, character).current_speed();

        release_direction(&mut app, character);
        tick(&mut app);
        let after_release = controller(&app, character).current_speed();

        assert!(after_release < after_input);
    }

    #[test]
    fn mode_intent_switches_target_speed() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        app.world_mut()
            .get_mut::<LocomotionIntent>(character)
            .unwrap()
            .set_mode(MovementMode::Walk);
        run_frames_with_intent(&mut app, character, Vec3::Z, 180);

        assert_eq!(controller(&app, character).movement_mode(), MovementMode::Walk);
        let speed = controller(&app, character).current_speed();
        assert!((speed - 1.4).abs() < 0.01, "speed: {speed}");
        assert_eq!(controller(&app, character).animation_state(), AnimationState::Walk);
    }

    #[test]
    fn character_turns_to_face_motion() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        run_frames_with_intent(&mut app, character, Vec3::X, 120);

        let facing = controller(&app, character).facing_direction();
        assert!((facing - Vec3::X).length() < 1e-2, "facing: {facing:?}");
        let yaw = body(&app, character).yaw;
        assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-2, "yaw: {yaw}");
    }

    #[test]
    fn release_on_ground_stops_character() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        run_frames_with_intent(&mut app, character, Vec3::Z, 120);
        release_direction(&mut app, character);

        let mut previous = controller(&app, character).current_speed();
        for _ in 0..60 {
            tick(&mut app);
            let speed = controller(&app, character).current_speed();
            assert!(speed <= previous);
            previous = speed;
        }
        assert_eq!(previous, 0.0);
        assert_eq!(controller(&app, character).animation_state(), AnimationState::Idle);
    }
}

// ==================== Jump Tests ====================

mod jumping {
    use super::*;

    #[test]
    fn grounded_jump_launches() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        request_jump(&mut app, character);
        tick(&mut app);

        let launched = body(&app, character).last_set_velocity.unwrap();
        let expected = LocomotionConfig::default().jump_speed();
        assert!((launched.y - expected).abs() < 1e-4);
        assert!(!controller(&app, character).jump_state().can_jump);
    }

    #[test]
    fn airborne_jump_request_is_ignored() {
        let mut app = create_test_app();
        let character = spawn_character_with(&mut app, TestBody {
            on_ground: false,
            velocity: Some(Vec3::new(0.0, -1.0, 0.0)),
            ..default()
        });

        set_direction(&mut app, character, Vec3::Z);
        request_jump(&mut app, character);
        tick(&mut app);

        let body = body(&app, character);
        assert_eq!(body.full_sets, 0);
        assert_eq!(body.horizontal_sets, 1);
        assert_eq!(body.velocity.unwrap().y, -1.0);
        assert!(!controller(&app, character).jump_state().has_jumped_since_grounded);
    }

    #[test]
    fn no_second_jump_before_landing() {
        let mut app = create_test_app();
        let character = spawn_character_with(&mut app, TestBody {
            on_ground: true,
            velocity: Some(Vec3::ZERO),
            ..default()
        });

        request_jump(&mut app, character);
        tick(&mut app);
        assert_eq!(body(&app, character).full_sets, 1);

        // Ground query still reports contact for a while (stale), well past the cooldown.
        for _ in 0..30 {
            request_jump(&mut app, character);
            tick(&mut app);
        }
        assert_eq!(body(&app, character).full_sets, 1);

        // Leave the ground, then land: jumping works again.
        set_on_ground(&mut app, character, false);
        tick(&mut app);
        set_on_ground(&mut app, character, true);
        tick(&mut app);
        assert!(!controller(&app, character).jump_state().has_jumped_since_grounded);

        request_jump(&mut app, character);
        tick(&mut app);
        assert_eq!(body(&app, character).full_sets, 2);
    }

    #[test]
    fn backend_owned_vertical_velocity_is_preserved() {
        let mut app = create_test_app();
        let character = spawn_character_with(&mut app, TestBody {
            on_ground: false,
            velocity: Some(Vec3::new(0.0, -4.0, 0.0)),
            ..default()
        });

        run_frames_with_intent(&mut app, character, Vec3::X, 10);

        let body = body(&app, character);
        assert_eq!(body.full_sets, 0);
        assert_eq!(body.horizontal_sets, 10);
        assert_eq!(body.velocity.unwrap().y, -4.0);
        assert!(body.velocity.unwrap().x > 0.0);
        // No assist force in the air
        assert_eq!(body.force, Vec3::ZERO);
    }
}

// ==================== State Marker Tests ====================

mod markers {
    use super::*;

    #[test]
    fn grounded_and_airborne_markers_follow_contact() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app);

        tick(&mut app);
        assert!(app.world().get::<Grounded>(character).is_some());
        assert!(app.world().get::<Airborne>(character).is_none());

        set_on_ground(&mut app, character, false);
        tick(&mut app);
        assert!(app.world().get::<Grounded>(character).is_none());
        assert!(app.world().get::<Airborne>(character).is_some());
    }

    #[test]
    fn missing_config_uses_default() {
        let mut app = create_test_app();
        let character = app
            .world_mut()
            .spawn((
                LocomotionController::new(),
                TestBody {
                    on_ground: true,
                    ..default()
                },
            ))
            .id();

        app.world_mut()
            .get_mut::<LocomotionController>(character)
            .unwrap()
            .set_intent_direction(Vec3::Z);
        tick(&mut app);

        assert!(controller(&app, character).current_speed() > 0.0);
    }
}
