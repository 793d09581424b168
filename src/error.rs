//! Error types for the locomotion API edges.
//!
//! The per-frame update never fails. These errors only surface from the
//! checked entry points (`TryFrom<u8>` for modes, `try_update`).

use thiserror::Error;

/// Errors returned by the checked locomotion entry points.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LocomotionError {
    /// A raw movement mode index outside `0..=3`.
    #[error("invalid movement mode index {0}, expected 0..=3")]
    InvalidMovementMode(u8),

    /// A frame delta that is negative or not finite.
    #[error("invalid timestep {0}s, expected a finite value >= 0")]
    InvalidTimestep(f32),
}
