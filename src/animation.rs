//! Animation state selection.

use bevy::prelude::*;

use crate::config::LocomotionConfig;

/// Locomotion animation selector sent to the animation backend.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    /// Standing still or airborne. The clip is paused.
    #[default]
    Idle,
    /// Walk/jog cycle.
    Walk,
    /// Run/sprint cycle.
    Run,
}

impl AnimationState {
    /// Stable clip index (`Idle = 0`, `Walk = 1`, `Run = 2`).
    pub fn index(self) -> u32 {
        match self {
            AnimationState::Idle => 0,
            AnimationState::Walk => 1,
            AnimationState::Run => 2,
        }
    }

    /// Whether a locomotion cycle should be playing.
    pub fn is_moving(self) -> bool {
        !matches!(self, AnimationState::Idle)
    }

    /// Pick the state for a horizontal speed and ground contact.
    ///
    /// Thresholds are multiples of the walk speed. A grounded cycle is never
    /// selected while airborne.
    pub fn select(horizontal_speed: f32, on_ground: bool, config: &LocomotionConfig) -> Self {
        if !on_ground || horizontal_speed <= config.motion_threshold {
            return AnimationState::Idle;
        }

        let walk_speed = config.profile.walk;
        if horizontal_speed > walk_speed * config.run_cycle_factor {
            AnimationState::Run
        } else if horizontal_speed > walk_speed * config.walk_cycle_factor {
            AnimationState::Walk
        } else {
            AnimationState::Idle
        }
    }
}

/// Last animation state selected for a character.
///
/// Written by the default [`CharacterPhysicsBackend::set_animation_state`]
/// implementation; animation systems read it to start, switch or pause clips.
///
/// [`CharacterPhysicsBackend::set_animation_state`]: crate::backend::CharacterPhysicsBackend::set_animation_state
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[reflect(Component)]
pub struct ActiveAnimation(pub AnimationState);
