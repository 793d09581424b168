//! Physics backend abstraction.
//!
//! Two layers live here:
//! - [`CharacterBody`] is the narrow per-character interface the controller
//!   talks to during an update (ground query, velocity, force, yaw, animation).
//! - [`CharacterPhysicsBackend`] is implemented by physics engine integrations
//!   and operates on the ECS [`World`]. [`BackendBody`] adapts one entity of a
//!   backend into a [`CharacterBody`].

use std::marker::PhantomData;

use bevy::prelude::*;

use crate::animation::{ActiveAnimation, AnimationState};

/// Per-character boundary used by [`LocomotionController::update`].
///
/// Commands are fire-and-forget. Queries reflect the backend state at the
/// time of the call.
///
/// [`LocomotionController::update`]: crate::controller::LocomotionController::update
pub trait CharacterBody {
    /// True if the character rests on a walkable surface.
    fn is_on_ground(&self) -> bool;

    /// Physics-owned velocity, if the backend maintains one.
    ///
    /// Returning `None` makes the controller's own velocity authoritative.
    fn velocity(&self) -> Option<Vec3>;

    /// Overwrite the full velocity.
    fn set_velocity(&mut self, velocity: Vec3);

    /// Overwrite horizontal velocity, keeping the backend's vertical component.
    fn set_horizontal_velocity(&mut self, vx: f32, vz: f32);

    /// Apply a force for the current step.
    fn apply_force(&mut self, force: Vec3);

    /// Set the orientation about the vertical axis.
    fn set_yaw(&mut self, yaw: f32);

    /// Select the visible animation clip.
    fn set_animation_state(&mut self, state: AnimationState);
}

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the locomotion
/// controller. See the `rapier` module's `Rapier3dBackend` (feature
/// `rapier3d`) for a full implementation.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Whether the entity is in contact with walkable ground.
    fn is_on_ground(world: &World, entity: Entity) -> bool;

    /// Get the physics-owned velocity of an entity.
    ///
    /// Backends that apply gravity themselves return `Some`.
    fn get_velocity(world: &World, entity: Entity) -> Option<Vec3>;

    /// Set the full velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Set the horizontal (XZ) velocity of an entity, preserving Y.
    fn set_horizontal_velocity(world: &mut World, entity: Entity, vx: f32, vz: f32);

    /// Apply a force to an entity.
    ///
    /// Force is applied over the physics timestep.
    fn apply_force(world: &mut World, entity: Entity, force: Vec3);

    /// Set the yaw (radians about +Y) of an entity.
    fn set_yaw(world: &mut World, entity: Entity, yaw: f32);

    /// Select the animation state of an entity.
    ///
    /// The default writes [`ActiveAnimation`] when the entity has one.
    fn set_animation_state(world: &mut World, entity: Entity, state: AnimationState) {
        if let Some(mut active) = world.get_mut::<ActiveAnimation>(entity) {
            if active.0 != state {
                active.0 = state;
            }
        }
    }

    /// Get the fixed timestep delta time.
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}

/// One entity of a [`CharacterPhysicsBackend`], viewed as a [`CharacterBody`].
pub struct BackendBody<'w, B: CharacterPhysicsBackend> {
    world: &'w mut World,
    entity: Entity,
    _marker: PhantomData<B>,
}

impl<'w, B: CharacterPhysicsBackend> BackendBody<'w, B> {
    /// Wrap `entity` of `world`.
    pub fn new(world: &'w mut World, entity: Entity) -> Self {
        Self {
            world,
            entity,
            _marker: PhantomData,
        }
    }

    /// The wrapped entity.
    pub fn entity(&self) -> Entity {
        self.entity
    }
}

impl<B: CharacterPhysicsBackend> CharacterBody for BackendBody<'_, B> {
    fn is_on_ground(&self) -> bool {
        B::is_on_ground(self.world, self.entity)
    }

    fn velocity(&self) -> Option<Vec3> {
        B::get_velocity(self.world, self.entity)
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        B::set_velocity(self.world, self.entity, velocity);
    }

    fn set_horizontal_velocity(&mut self, vx: f32, vz: f32) {
        B::set_horizontal_velocity(self.world, self.entity, vx, vz);
    }

    fn apply_force(&mut self, force: Vec3) {
        B::apply_force(self.world, self.entity, force);
    }

    fn set_yaw(&mut self, yaw: f32) {
        B::set_yaw(self.world, self.entity, yaw);
    }

    fn set_animation_state(&mut self, state: AnimationState) {
        B::set_animation_state(self.world, self.entity, state);
    }
}
