//! Ground contact markers.
//!
//! `sync_state_markers` keeps exactly one of [`Grounded`] or [`Airborne`] on
//! every controlled character, matching the contact seen by its last update.
//! Gameplay systems can filter on them instead of reading the controller.

use bevy::prelude::*;

/// The character touched the ground on its last update.
///
/// ```rust
/// use bevy::prelude::*;
/// use locomotion_controller::prelude::*;
///
/// fn count_landed(q: Query<(), (With<LocomotionController>, With<Grounded>)>) -> usize {
///     q.iter().count()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// The character had no ground contact on its last update.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
