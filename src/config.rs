//! Controller configuration components.
//!
//! This module defines the movement modes, the per-mode speed table and the
//! tunables for acceleration, friction, jumping, turning and animation
//! selection. All constants are data, not code, so presets can be swapped
//! per character.

use std::fmt;

use bevy::prelude::*;

use crate::error::LocomotionError;

/// Movement gait selected by the player.
///
/// Each mode maps to a fixed target horizontal speed through a
/// [`MovementProfile`]. The default is [`MovementMode::Run`].
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementMode {
    Walk,
    Jog,
    #[default]
    Run,
    Sprint,
}

impl MovementMode {
    /// All modes in index order.
    pub const ALL: [MovementMode; 4] = [
        MovementMode::Walk,
        MovementMode::Jog,
        MovementMode::Run,
        MovementMode::Sprint,
    ];

    /// Map a raw mode index, falling back to the default mode when out of range.
    pub fn from_index(index: u8) -> Self {
        Self::try_from(index).unwrap_or_default()
    }

    /// Stable index of this mode (`Walk = 0` .. `Sprint = 3`).
    pub fn index(self) -> u8 {
        match self {
            MovementMode::Walk => 0,
            MovementMode::Jog => 1,
            MovementMode::Run => 2,
            MovementMode::Sprint => 3,
        }
    }

    /// Human readable mode name.
    pub fn name(self) -> &'static str {
        match self {
            MovementMode::Walk => "Walk",
            MovementMode::Jog => "Jog",
            MovementMode::Run => "Run",
            MovementMode::Sprint => "Sprint",
        }
    }
}

impl TryFrom<u8> for MovementMode {
    type Error = LocomotionError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(MovementMode::Walk),
            1 => Ok(MovementMode::Jog),
            2 => Ok(MovementMode::Run),
            3 => Ok(MovementMode::Sprint),
            other => Err(LocomotionError::InvalidMovementMode(other)),
        }
    }
}

impl fmt::Display for MovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target horizontal speed (m/s) for every [`MovementMode`].
///
/// Defaults follow measured human locomotion: a comfortable walk, a light
/// jog, a running pace and a sprint.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct MovementProfile {
    pub walk: f32,
    pub jog: f32,
    pub run: f32,
    pub sprint: f32,
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self {
            walk: 1.4,
            jog: 3.0,
            run: 5.5,
            sprint: 9.0,
        }
    }
}

impl MovementProfile {
    /// Look up the target speed for a mode.
    #[inline]
    pub fn target_speed(&self, mode: MovementMode) -> f32 {
        match mode {
            MovementMode::Walk => self.walk,
            MovementMode::Jog => self.jog,
            MovementMode::Run => self.run,
            MovementMode::Sprint => self.sprint,
        }
    }

    /// Builder: override the speed of a single mode.
    pub fn with_speed(mut self, mode: MovementMode, speed: f32) -> Self {
        let speed = speed.max(0.0);
        match mode {
            MovementMode::Walk => self.walk = speed,
            MovementMode::Jog => self.jog = speed,
            MovementMode::Run => self.run = speed,
            MovementMode::Sprint => self.sprint = speed,
        }
        self
    }
}

/// Predicate used to detect that the character has landed.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LandingRule {
    /// Ground contact went from false last frame to true this frame.
    #[default]
    ContactEdge,
    /// Ground contact is true and vertical velocity is not upward.
    GroundedDescending,
}

/// How the facing vector is blended toward the direction of travel.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnModel {
    /// Blend factor `1 - e^(-turn_rate * dt)`. Frame-rate independent.
    #[default]
    Exponential,
    /// Blend factor `turn_rate * dt`, clamped to 1. Turns faster on long frames.
    Linear,
}

impl TurnModel {
    /// Blend factor in `[0, 1]` for a frame of length `dt`.
    #[inline]
    pub fn blend_factor(self, turn_rate: f32, dt: f32) -> f32 {
        let rate = turn_rate.max(0.0);
        match self {
            TurnModel::Exponential => 1.0 - (-rate * dt).exp(),
            TurnModel::Linear => (rate * dt).clamp(0.0, 1.0),
        }
    }
}

/// Configuration parameters for the locomotion controller.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct LocomotionConfig {
    // === Speed Settings ===
    /// Target horizontal speed per movement mode.
    pub profile: MovementProfile,

    /// Acceleration toward the target velocity (1/s blend rate, m/s^2 at unit error).
    pub acceleration: f32,

    /// Ground deceleration when there is no input (m/s^2).
    pub deceleration: f32,

    /// Ground friction coefficient scaling `deceleration`.
    pub ground_friction: f32,

    /// Acceleration multiplier while airborne (0.0-1.0).
    pub air_control: f32,

    /// Quadratic air resistance coefficient used when airborne with no input.
    pub air_resistance: f32,

    // === Jump Settings ===
    /// Gravity magnitude (m/s^2) used for the launch speed and for local integration.
    pub gravity: f32,

    /// Apex height of a jump in meters.
    pub jump_height: f32,

    /// Minimum seconds between jump launches.
    pub jump_cooldown: f32,

    /// How landings are detected.
    pub landing_rule: LandingRule,

    // === Facing Settings ===
    /// Facing turn rate (1/s).
    pub turn_rate: f32,

    /// Blend model for the facing turn.
    pub turn_model: TurnModel,

    // === Force Settings ===
    /// Supplementary horizontal force (N) applied while grounded with input.
    /// `None` disables the assist.
    pub assist_force: Option<f32>,

    // === Thresholds ===
    /// Minimum intent magnitude treated as input.
    pub input_threshold: f32,

    /// Minimum horizontal speed (m/s) treated as motion for facing updates.
    pub motion_threshold: f32,

    // === Animation Settings ===
    /// Walk cycle plays above `walk speed * walk_cycle_factor`.
    pub walk_cycle_factor: f32,

    /// Run cycle plays above `walk speed * run_cycle_factor`.
    pub run_cycle_factor: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            // Speed settings
            profile: MovementProfile::default(),
            acceleration: 8.0,
            deceleration: 12.0,
            ground_friction: 0.85,
            air_control: 0.3,
            air_resistance: 0.02,

            // Jump settings (0.4m apex is an average standing vertical jump)
            gravity: 9.81,
            jump_height: 0.4,
            jump_cooldown: 0.15,
            landing_rule: LandingRule::ContactEdge,

            // Facing settings
            turn_rate: 8.0,
            turn_model: TurnModel::Exponential,

            // Force settings (roughly what a human produces horizontally)
            assist_force: Some(500.0),

            // Thresholds
            input_threshold: 0.1,
            motion_threshold: 0.1,

            // Animation settings
            walk_cycle_factor: 0.5,
            run_cycle_factor: 3.0,
        }
    }
}

impl LocomotionConfig {
    /// Vertical launch speed reaching `jump_height` under `gravity`: `sqrt(2gh)`.
    #[inline]
    pub fn jump_speed(&self) -> f32 {
        (2.0 * self.gravity.max(0.0) * self.jump_height.max(0.0)).sqrt()
    }

    /// Target horizontal speed for a movement mode.
    #[inline]
    pub fn target_speed(&self, mode: MovementMode) -> f32 {
        self.profile.target_speed(mode)
    }

    /// Acceleration for the current contact state.
    #[inline]
    pub fn effective_acceleration(&self, on_ground: bool) -> f32 {
        if on_ground {
            self.acceleration
        } else {
            self.acceleration * self.air_control
        }
    }

    /// Create a config tuned for a responsive player character.
    pub fn player() -> Self {
        Self {
            acceleration: 10.0,
            air_control: 0.4,
            turn_rate: 10.0,
            ..default()
        }
    }

    /// Create a config for a heavy, sluggish character.
    pub fn heavy() -> Self {
        Self {
            acceleration: 4.0,
            deceleration: 8.0,
            air_control: 0.1,
            jump_height: 0.25,
            turn_rate: 4.0,
            assist_force: Some(800.0),
            ..default()
        }
    }

    /// Builder: set the speed table.
    pub fn with_profile(mut self, profile: MovementProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Builder: set acceleration and deceleration.
    pub fn with_acceleration(mut self, acceleration: f32, deceleration: f32) -> Self {
        self.acceleration = acceleration;
        self.deceleration = deceleration;
        self
    }

    /// Builder: set ground friction.
    pub fn with_ground_friction(mut self, friction: f32) -> Self {
        self.ground_friction = friction;
        self
    }

    /// Builder: set air control multiplier.
    pub fn with_air_control(mut self, air_control: f32) -> Self {
        self.air_control = air_control;
        self
    }

    /// Builder: set air resistance coefficient.
    pub fn with_air_resistance(mut self, resistance: f32) -> Self {
        self.air_resistance = resistance;
        self
    }

    /// Builder: set jump apex height and gravity.
    pub fn with_jump(mut self, height: f32, gravity: f32) -> Self {
        self.jump_height = height;
        self.gravity = gravity;
        self
    }

    /// Builder: set jump cooldown.
    pub fn with_jump_cooldown(mut self, cooldown: f32) -> Self {
        self.jump_cooldown = cooldown;
        self
    }

    /// Builder: set landing rule.
    pub fn with_landing_rule(mut self, rule: LandingRule) -> Self {
        self.landing_rule = rule;
        self
    }

    /// Builder: set facing turn rate and model.
    pub fn with_turn(mut self, rate: f32, model: TurnModel) -> Self {
        self.turn_rate = rate;
        self.turn_model = model;
        self
    }

    /// Builder: set the supplementary ground force (`None` disables it).
    pub fn with_assist_force(mut self, force: Option<f32>) -> Self {
        self.assist_force = force;
        self
    }
}
