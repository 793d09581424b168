//! Facing direction smoothing.

use bevy::prelude::*;

use crate::config::TurnModel;

/// Squared length below which a blended facing vector is considered degenerate.
const DEGENERATE_SQ: f32 = 1.0e-6;

/// Low-pass filter that turns the facing vector toward the direction of travel.
///
/// `facing` and `right` are horizontal unit vectors; `right` is always
/// `up × facing`. The initial orientation faces +Z with +X to the right.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct FacingSmoother {
    facing: Vec3,
    right: Vec3,
}

impl Default for FacingSmoother {
    fn default() -> Self {
        Self {
            facing: Vec3::Z,
            right: Vec3::X,
        }
    }
}

impl FacingSmoother {
    /// Create a smoother facing the given horizontal direction.
    ///
    /// Falls back to +Z when the direction has no horizontal component.
    pub fn new(facing: Vec3) -> Self {
        let flat = Vec3::new(facing.x, 0.0, facing.z);
        if flat.length_squared() < DEGENERATE_SQ {
            return Self::default();
        }
        let facing = flat.normalize();
        Self {
            facing,
            right: Vec3::Y.cross(facing).normalize(),
        }
    }

    /// Current facing direction.
    #[inline]
    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    /// Current right direction.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Yaw about +Y in radians, `atan2(facing.x, facing.z)`.
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.facing.x.atan2(self.facing.z)
    }

    /// Turn toward the horizontal direction of `velocity`.
    ///
    /// Does nothing when the horizontal speed is at or below `motion_threshold`
    /// or when `dt` is zero. Returns whether the facing changed.
    pub fn update(
        &mut self,
        velocity: Vec3,
        dt: f32,
        turn_rate: f32,
        model: TurnModel,
        motion_threshold: f32,
    ) -> bool {
        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        let speed = horizontal.length();
        if speed <= motion_threshold || speed == 0.0 || dt <= 0.0 {
            return false;
        }

        let target = horizontal / speed;
        let t = model.blend_factor(turn_rate, dt);
        if t <= 0.0 {
            return false;
        }

        let mut blended = self.facing.lerp(target, t);
        if blended.length_squared() < DEGENERATE_SQ {
            // Target is directly behind: swing through the right-hand side.
            blended = self.right;
        }

        self.facing = blended.normalize();
        self.right = Vec3::Y.cross(self.facing).normalize();
        true
    }
}
