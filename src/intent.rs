//! Movement intent component.
//!
//! Intents carry the wishes of an input source (player, AI, network) into
//! the controller. Input systems write the intent whenever input changes; the
//! `apply_locomotion_intent` system forwards it to the
//! [`LocomotionController`](crate::controller::LocomotionController) right
//! before every fixed step.
//!
//! The direction is held: it stays in effect for every fixed step until the
//! input source changes or clears it. Jump and mode requests fire once and
//! are consumed by the step that forwards them.

use bevy::prelude::*;

use crate::config::MovementMode;

/// Movement intent written by an input source.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use locomotion_controller::prelude::*;
///
/// let mut intent = LocomotionIntent::new();
/// intent.set_direction(Vec3::new(0.0, 0.0, 2.0));
/// intent.request_jump();
/// assert!(intent.is_moving(0.1));
///
/// intent.clear();
/// assert!(!intent.is_moving(0.1));
/// assert!(!intent.jump);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct LocomotionIntent {
    /// Held movement direction. Need not be normalized.
    pub direction: Vec3,
    /// Pending jump request, consumed by the next fixed step.
    pub jump: bool,
    /// Pending movement mode switch, if any.
    pub mode: Option<MovementMode>,
}

impl LocomotionIntent {
    /// Create a new empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement direction.
    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction;
    }

    /// Add to the movement direction, e.g. one key at a time.
    pub fn add_direction(&mut self, direction: Vec3) {
        self.direction += direction;
    }

    /// Request a jump.
    pub fn request_jump(&mut self) {
        self.jump = true;
    }

    /// Request a movement mode switch.
    pub fn set_mode(&mut self, mode: MovementMode) {
        self.mode = Some(mode);
    }

    /// Whether the horizontal direction is at least `threshold` long.
    pub fn is_moving(&self, threshold: f32) -> bool {
        Vec3::new(self.direction.x, 0.0, self.direction.z).length() >= threshold
    }

    /// Clear all pending wishes.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Release the held direction, keeping pending requests.
    pub fn clear_direction(&mut self) {
        self.direction = Vec3::ZERO;
    }

    /// Consume the pending jump request.
    pub fn take_jump_request(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    /// Consume the pending mode switch.
    pub fn take_mode(&mut self) -> Option<MovementMode> {
        self.mode.take()
    }
}
