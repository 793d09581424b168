//! # `locomotion_controller`
//!
//! A per-frame locomotion controller for player characters with physics backend abstraction.
//!
//! This crate turns "intent + ground contact" into "velocity, force, yaw and
//! animation selection" every fixed step:
//! - Accelerates toward a per-mode target speed (Walk, Jog, Run, Sprint) without overshoot
//! - Slows down with ground friction or quadratic air resistance when there is no input
//! - Gates jumps with a cooldown and a single jump per ground contact
//! - Smoothly turns the character to face its direction of travel
//! - Selects an Idle / Walk / Run animation state
//! - Abstracts the physics backend (Rapier3D included behind the `rapier3d` feature)
//!
//! ## Architecture
//!
//! The controller only talks to the world through a narrow interface:
//! 1. Query ground contact and, if the backend owns it, the current velocity
//! 2. Run the jump gate, then integrate horizontal velocity
//! 3. Turn the facing vector and pick an animation
//! 4. Commit yaw, velocity, an optional assist force and the animation state
//!
//! [`controller::LocomotionController::update`] can be driven directly with any
//! [`backend::CharacterBody`], or through [`LocomotionPlugin`] which runs it for
//! every character entity in `FixedUpdate`.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use locomotion_controller::prelude::*;
//!
//! // Components for a player character
//! let controller = LocomotionController::new().with_mode(MovementMode::Jog);
//! let config = LocomotionConfig::player();
//! let intent = LocomotionIntent::default();
//!
//! // These can be spawned with the backend's physics components
//! ```

use bevy::prelude::*;

pub mod animation;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod facing;
pub mod intent;
pub mod jump;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::animation::{ActiveAnimation, AnimationState};
    pub use crate::backend::{BackendBody, CharacterBody, CharacterPhysicsBackend};
    pub use crate::config::{LandingRule, LocomotionConfig, MovementMode, MovementProfile, TurnModel};
    pub use crate::controller::{LocomotionController, MovementState};
    pub use crate::error::LocomotionError;
    pub use crate::facing::FacingSmoother;
    pub use crate::intent::LocomotionIntent;
    pub use crate::jump::JumpState;
    pub use crate::state::{Airborne, Grounded};
    pub use crate::{LocomotionPlugin, LocomotionSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{GroundProbe, Rapier3dBackend, Rapier3dCharacterBundle};
}

/// Ordered phases of the per-step pipeline, run in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Backend bookkeeping from the previous step.
    Preparation,
    /// Backend sensors (ground contact).
    Sensors,
    /// Intents are forwarded into controllers.
    Input,
    /// Controllers update and commit to the backend.
    Update,
    /// Backend applies accumulated commands to physics.
    FinalApplication,
}

/// Main plugin for the locomotion controller.
///
/// This plugin is generic over a physics backend `B` which provides the actual
/// physics operations (ground query, velocity, force, rotation).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier3dBackend`)
///
/// # Examples
///
/// With Rapier3D backend:
/// ```rust,ignore
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use locomotion_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(LocomotionPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct LocomotionPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for LocomotionPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for LocomotionPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<controller::LocomotionController>();
        app.register_type::<config::LocomotionConfig>();
        app.register_type::<intent::LocomotionIntent>();
        app.register_type::<animation::ActiveAnimation>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        app.configure_sets(
            FixedUpdate,
            (
                LocomotionSet::Preparation,
                LocomotionSet::Sensors,
                LocomotionSet::Input,
                LocomotionSet::Update,
                LocomotionSet::FinalApplication,
            )
                .chain(),
        );

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            systems::apply_locomotion_intent.in_set(LocomotionSet::Input),
        );
        app.add_systems(
            FixedUpdate,
            (systems::update_locomotion::<B>, systems::sync_state_markers)
                .chain()
                .in_set(LocomotionSet::Update),
        );
    }
}
