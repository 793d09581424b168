//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::animation::ActiveAnimation;
use crate::backend::CharacterPhysicsBackend;
use crate::controller::LocomotionController;
use crate::LocomotionSet;

/// Rapier3D physics backend for the locomotion controller.
///
/// Rapier owns the velocity (including gravity), so the controller only
/// overwrites the horizontal component except on jump frames. Ground contact
/// comes from a downward ray cast by [`rapier_ground_detection`] into
/// [`GroundProbe`].
pub struct Rapier3dBackend;

impl CharacterPhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn is_on_ground(world: &World, entity: Entity) -> bool {
        world
            .get::<GroundProbe>(entity)
            .is_some_and(|probe| probe.on_ground)
    }

    fn get_velocity(world: &World, entity: Entity) -> Option<Vec3> {
        world.get::<Velocity>(entity).map(|v| v.linvel)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn set_horizontal_velocity(world: &mut World, entity: Entity, vx: f32, vz: f32) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel.x = vx;
            vel.linvel.z = vz;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        // Accumulate instead of writing ExternalForce directly, so user forces survive.
        // apply_controller_forces moves the total into ExternalForce at the end of the step.
        if let Some(mut forces) = world.get_mut::<ControllerForces>(entity) {
            forces.pending += force;
        } else if let Some(mut ext_force) = world.get_mut::<ExternalForce>(entity) {
            ext_force.force += force;
        }
    }

    fn set_yaw(world: &mut World, entity: Entity, yaw: f32) {
        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.rotation = Quat::from_rotation_y(yaw);
        }
    }
}

/// Plugin that sets up Rapier3D-specific systems for the locomotion controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GroundProbe>();

        app.add_systems(
            FixedUpdate,
            clear_controller_forces.in_set(LocomotionSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            rapier_ground_detection.in_set(LocomotionSet::Sensors),
        );
        app.add_systems(
            FixedUpdate,
            apply_controller_forces.in_set(LocomotionSet::FinalApplication),
        );
    }
}

/// Downward ground probe.
///
/// The ray starts at the body center and reaches `max_distance` past the
/// bottom of the collider.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct GroundProbe {
    /// Distance below the collider bottom that still counts as ground contact.
    pub max_distance: f32,
    /// Result of the last probe.
    pub on_ground: bool,
    /// Distance from body center to the hit, if any.
    pub hit_distance: Option<f32>,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self {
            max_distance: 0.1,
            on_ground: false,
            hit_distance: None,
        }
    }
}

impl GroundProbe {
    /// Create a probe with the given tolerance below the collider.
    pub fn new(max_distance: f32) -> Self {
        Self {
            max_distance,
            ..default()
        }
    }
}

/// Forces applied by the controller, kept apart from user forces.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ControllerForces {
    /// Accumulated this step.
    pub pending: Vec3,
    /// Written into `ExternalForce` last step.
    pub applied: Vec3,
}

/// Get the distance from collider center to bottom for a given collider.
/// For capsules, this is half_height + radius.
pub fn get_collider_bottom_offset(collider: &Collider) -> f32 {
    if let Some(capsule) = collider.as_capsule() {
        let segment = capsule.segment();
        let half_height = (segment.a().y - segment.b().y).abs() / 2.0;
        half_height + capsule.radius()
    } else if let Some(ball) = collider.as_ball() {
        ball.radius()
    } else if let Some(cuboid) = collider.as_cuboid() {
        cuboid.half_extents().y
    } else {
        // Unknown shape: probe from the center
        0.0
    }
}

/// Rapier-specific ground detection using a downward raycast.
pub fn rapier_ground_detection(
    rapier_context: ReadRapierContext,
    mut q_probes: Query<(
        Entity,
        &GlobalTransform,
        &mut GroundProbe,
        Option<&Collider>,
        Option<&CollisionGroups>,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, mut probe, collider, collision_groups) in &mut q_probes {
        let origin = transform.translation();
        let bottom_offset = collider.map(get_collider_bottom_offset).unwrap_or(0.0);
        let cast_length = bottom_offset + probe.max_distance.max(0.0);

        let mut filter = QueryFilter::default()
            .exclude_rigid_body(entity)
            .exclude_sensors();
        if let Some(groups) = collision_groups {
            filter = filter.groups(*groups);
        }

        let hit = context.cast_ray(origin, Vec3::NEG_Y, cast_length, true, filter);
        probe.hit_distance = hit.map(|(_, toi)| toi);
        probe.on_ground = hit.is_some();
    }
}

/// Remove last step's controller forces from `ExternalForce`.
pub fn clear_controller_forces(mut q: Query<(&mut ExternalForce, &mut ControllerForces)>) {
    for (mut ext_force, mut forces) in &mut q {
        ext_force.force -= forces.applied;
        forces.applied = Vec3::ZERO;
    }
}

/// Move this step's accumulated controller forces into `ExternalForce`.
pub fn apply_controller_forces(mut q: Query<(&mut ExternalForce, &mut ControllerForces)>) {
    for (mut ext_force, mut forces) in &mut q {
        let pending = std::mem::take(&mut forces.pending);
        ext_force.force += pending;
        forces.applied = pending;
    }
}

/// Bundle of Rapier components for a locomotion-controlled character.
///
/// Add a `Collider` and a `Transform` alongside it.
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use locomotion_controller::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 1.0, 0.0),
///         Collider::capsule_y(0.5, 0.3),
///         Rapier3dCharacterBundle::new(),
///     ));
/// }
/// ```
#[derive(Bundle)]
pub struct Rapier3dCharacterBundle {
    pub controller: LocomotionController,
    pub animation: ActiveAnimation,
    pub probe: GroundProbe,
    pub forces: ControllerForces,
    pub rigid_body: RigidBody,
    pub velocity: Velocity,
    pub external_force: ExternalForce,
    pub locked_axes: LockedAxes,
    pub mass: AdditionalMassProperties,
}

impl Default for Rapier3dCharacterBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rapier3dCharacterBundle {
    /// Dynamic body with rotation locked (yaw is driven by the controller) and a 70kg mass.
    pub fn new() -> Self {
        Self {
            controller: LocomotionController::new(),
            animation: ActiveAnimation::default(),
            probe: GroundProbe::default(),
            forces: ControllerForces::default(),
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_force: ExternalForce::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            mass: AdditionalMassProperties::Mass(70.0),
        }
    }

    /// Builder: set the ground probe tolerance.
    pub fn with_probe_distance(mut self, distance: f32) -> Self {
        self.probe.max_distance = distance;
        self
    }

    /// Builder: set the body mass (kg).
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = AdditionalMassProperties::Mass(mass);
        self
    }
}
