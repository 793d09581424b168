//! The locomotion controller component.
//!
//! [`LocomotionController`] owns the per-character movement state and the jump
//! gate. Each frame it consumes the one-frame intent (direction, jump request),
//! reads ground contact from a [`CharacterBody`] and writes back velocity,
//! force, yaw and animation selection.

use bevy::prelude::*;

use crate::animation::AnimationState;
use crate::backend::CharacterBody;
use crate::config::{LocomotionConfig, MovementMode};
use crate::error::LocomotionError;
use crate::facing::FacingSmoother;
use crate::jump::{JumpInput, JumpState};

/// Movement state owned by the controller.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementState {
    /// Current linear velocity (m/s).
    pub velocity: Vec3,
    /// Desired direction for the next update only. Not normalized.
    pub intent_direction: Vec3,
    /// Facing and right vectors.
    pub facing: FacingSmoother,
}

impl MovementState {
    /// Horizontal (XZ) part of the velocity.
    #[inline]
    pub fn horizontal_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }
}

/// Per-character locomotion controller.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use locomotion_controller::prelude::*;
///
/// let mut controller = LocomotionController::new();
/// controller.set_movement_mode(MovementMode::Walk);
/// controller.set_intent_direction(Vec3::Z);
/// controller.request_jump();
/// assert!(controller.jump_requested());
/// ```
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct LocomotionController {
    mode: MovementMode,
    state: MovementState,
    jump: JumpState,
    jump_requested: bool,
    on_ground: bool,
    animation: AnimationState,
    was_moving: bool,
}

impl LocomotionController {
    /// Create a controller at rest, facing +Z, in [`MovementMode::Run`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller facing the given horizontal direction.
    pub fn facing(direction: Vec3) -> Self {
        Self {
            state: MovementState {
                facing: FacingSmoother::new(direction),
                ..default()
            },
            ..default()
        }
    }

    /// Builder: start in the given movement mode.
    pub fn with_mode(mut self, mode: MovementMode) -> Self {
        self.mode = mode;
        self
    }

    // === Commands ===

    /// Record the desired movement direction for the next update.
    ///
    /// The vector need not be normalized. Only its horizontal part is used and
    /// magnitudes below the input threshold count as no input.
    pub fn set_intent_direction(&mut self, direction: Vec3) {
        self.state.intent_direction = direction;
    }

    /// Request a jump on the next update. Repeated calls within a frame are idempotent.
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    /// Switch the active speed profile. Takes effect on the next update.
    pub fn set_movement_mode(&mut self, mode: MovementMode) {
        if self.mode != mode {
            info!("Movement mode: {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Switch mode from a raw index, falling back to the default mode when out of range.
    pub fn set_movement_mode_index(&mut self, index: u8) {
        let mode = MovementMode::try_from(index).unwrap_or_else(|err| {
            warn!("{err}, using {}", MovementMode::default());
            MovementMode::default()
        });
        self.set_movement_mode(mode);
    }

    // === Queries ===

    /// Active movement mode.
    pub fn movement_mode(&self) -> MovementMode {
        self.mode
    }

    /// Target horizontal speed of the active mode.
    pub fn target_speed(&self, config: &LocomotionConfig) -> f32 {
        config.target_speed(self.mode)
    }

    /// Movement state (velocity, pending intent, orientation).
    pub fn movement_state(&self) -> &MovementState {
        &self.state
    }

    /// Jump gate state.
    pub fn jump_state(&self) -> &JumpState {
        &self.jump
    }

    /// Whether a jump is pending for the next update.
    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    /// Current horizontal speed (m/s).
    pub fn current_speed(&self) -> f32 {
        self.state.horizontal_velocity().length()
    }

    /// Unit facing direction.
    pub fn facing_direction(&self) -> Vec3 {
        self.state.facing.facing()
    }

    /// Unit right direction, perpendicular to facing and up.
    pub fn right_direction(&self) -> Vec3 {
        self.state.facing.right()
    }

    /// Yaw committed on the last update.
    pub fn yaw(&self) -> f32 {
        self.state.facing.yaw()
    }

    /// Ground contact observed on the last update.
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Animation selected on the last update.
    pub fn animation_state(&self) -> AnimationState {
        self.animation
    }

    // === Update ===

    /// Like [`update`](Self::update), but rejects a negative or non-finite `dt`.
    pub fn try_update(
        &mut self,
        dt: f32,
        config: &LocomotionConfig,
        body: &mut impl CharacterBody,
    ) -> Result<(), LocomotionError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(LocomotionError::InvalidTimestep(dt));
        }
        self.update(dt, config, body);
        Ok(())
    }

    /// Run one frame.
    ///
    /// Queries ground contact (and velocity, if the body owns it), runs the
    /// jump gate, integrates horizontal velocity, turns the facing vector and
    /// selects an animation. Then it commits yaw, velocity, the optional assist
    /// force and the animation state to `body`, once each, and clears the
    /// one-frame intent and jump request.
    ///
    /// A `dt` of zero commits the current state without changing it. A negative
    /// or non-finite `dt` is a caller bug and is treated as zero.
    pub fn update(&mut self, dt: f32, config: &LocomotionConfig, body: &mut impl CharacterBody) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!("{}, treating as an empty frame", LocomotionError::InvalidTimestep(dt));
            0.0
        };

        let on_ground = body.is_on_ground();
        let body_velocity = body.velocity();
        if let Some(velocity) = body_velocity {
            self.state.velocity = velocity;
        }
        self.on_ground = on_ground;

        let intent = Vec3::new(
            self.state.intent_direction.x,
            0.0,
            self.state.intent_direction.z,
        );
        let intent_length = intent.length();
        // A zero threshold must still not treat a zero vector as input.
        let has_input = intent_length > 0.0 && intent_length >= config.input_threshold;
        let active = dt > 0.0;
        let mut launched = false;

        if active {
            if body_velocity.is_none() {
                self.integrate_vertical(dt, on_ground, config);
            }

            let outcome = self.jump.step(
                JumpInput {
                    dt,
                    on_ground,
                    vertical_velocity: self.state.velocity.y,
                    requested: self.jump_requested,
                },
                config.jump_cooldown,
                config.landing_rule,
            );
            if outcome.landed {
                debug!("Landed");
            }
            if outcome.launched {
                self.state.velocity.y = config.jump_speed();
                launched = true;
                debug!("Jump launched at {:.2} m/s", self.state.velocity.y);
            }

            if has_input {
                self.accelerate(intent, dt, on_ground, config);
            } else {
                self.decelerate(dt, on_ground, config);
            }

            self.state.facing.update(
                self.state.velocity,
                dt,
                config.turn_rate,
                config.turn_model,
                config.motion_threshold,
            );
        }

        if has_input && !self.was_moving {
            debug!(
                "Movement started: mode {} target speed {:.1} m/s",
                self.mode,
                config.target_speed(self.mode)
            );
        }
        self.was_moving = has_input;

        self.animation = AnimationState::select(self.current_speed(), on_ground, config);

        // Commit
        body.set_yaw(self.state.facing.yaw());
        let velocity = self.state.velocity;
        if launched || body_velocity.is_none() {
            body.set_velocity(velocity);
        } else {
            body.set_horizontal_velocity(velocity.x, velocity.z);
        }
        if let Some(force) = config.assist_force {
            if active && has_input && on_ground {
                body.apply_force(intent.normalize_or_zero() * force);
            }
        }
        body.set_animation_state(self.animation);

        self.state.intent_direction = Vec3::ZERO;
        self.jump_requested = false;
    }

    /// Local vertical integration, used when the body does not own velocity.
    fn integrate_vertical(&mut self, dt: f32, on_ground: bool, config: &LocomotionConfig) {
        let vy = &mut self.state.velocity.y;
        if on_ground {
            if *vy < 0.0 {
                *vy = 0.0;
            }
        } else {
            *vy -= config.gravity * dt;
        }
    }

    /// Accelerate horizontal velocity toward `intent * target_speed`.
    ///
    /// The step is proportional to the remaining difference and never longer
    /// than the difference itself or `acceleration * dt`, so the speed cannot
    /// overshoot the target.
    fn accelerate(&mut self, intent: Vec3, dt: f32, on_ground: bool, config: &LocomotionConfig) {
        let target = intent.normalize_or_zero() * config.target_speed(self.mode);
        let current = self.state.horizontal_velocity();
        let difference = target - current;
        let accel = config.effective_acceleration(on_ground);

        let mut delta = difference * accel * dt;
        let max_step = difference.length().min(accel * dt);
        let step = delta.length();
        if step > max_step {
            delta *= max_step / step;
        }

        self.state.velocity.x += delta.x;
        self.state.velocity.z += delta.z;
    }

    /// Slow horizontal velocity with no input: linear ground friction or
    /// quadratic air resistance. Never reverses direction.
    fn decelerate(&mut self, dt: f32, on_ground: bool, config: &LocomotionConfig) {
        let horizontal = self.state.horizontal_velocity();
        let speed = horizontal.length();
        if speed <= 0.0 {
            return;
        }

        let reduction = if on_ground {
            config.deceleration * config.ground_friction * dt
        } else {
            config.air_resistance * speed * speed * dt
        };
        let delta = -(horizontal / speed) * reduction.min(speed);

        self.state.velocity.x += delta.x;
        self.state.velocity.z += delta.z;
        if reduction >= speed {
            self.state.velocity.x = 0.0;
            self.state.velocity.z = 0.0;
        }
    }
}
