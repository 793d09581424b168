//! Core controller systems.
//!
//! These systems drive [`LocomotionController`] once per fixed step. They are
//! generic over the physics backend so different physics engines can be used.

use bevy::prelude::*;

use crate::backend::{BackendBody, CharacterPhysicsBackend};
use crate::config::LocomotionConfig;
use crate::controller::LocomotionController;
use crate::intent::LocomotionIntent;
use crate::state::{Airborne, Grounded};

/// Forward intents into their controllers.
///
/// Runs before [`update_locomotion`] on every fixed step. The held direction
/// is forwarded each step without being cleared, so input written once per
/// render frame drives all fixed steps of that frame. Jump and mode requests
/// are consumed. An empty direction is not forwarded, which leaves a direction
/// set directly on the controller in place; a non-empty intent direction wins.
pub fn apply_locomotion_intent(
    mut q: Query<(&mut LocomotionIntent, &mut LocomotionController)>,
) {
    for (mut intent, mut controller) in &mut q {
        if let Some(mode) = intent.take_mode() {
            controller.set_movement_mode(mode);
        }
        if intent.direction != Vec3::ZERO {
            controller.set_intent_direction(intent.direction);
        }
        if intent.take_jump_request() {
            controller.request_jump();
        }
    }
}

/// Run one controller update per character against the physics backend.
///
/// Characters without a [`LocomotionConfig`] use the default config.
pub fn update_locomotion<B: CharacterPhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<(Entity, LocomotionConfig, LocomotionController)> = world
        .query::<(Entity, Option<&LocomotionConfig>, &LocomotionController)>()
        .iter(world)
        .map(|(e, config, controller)| (e, config.copied().unwrap_or_default(), controller.clone()))
        .collect();

    for (entity, config, mut controller) in entities {
        {
            let mut body = BackendBody::<B>::new(world, entity);
            controller.update(dt, &config, &mut body);
        }

        if let Some(mut stored) = world.get_mut::<LocomotionController>(entity) {
            *stored = controller;
        }
    }
}

/// Sync [`Grounded`]/[`Airborne`] markers with the controller's last ground contact.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &LocomotionController, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, controller, has_grounded, has_airborne) in &q_controllers {
        if controller.is_on_ground() && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !controller.is_on_ground() && !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}
