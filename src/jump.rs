//! Jump gating state machine.
//!
//! A jump may launch only when the character is on the ground, the cooldown
//! has elapsed and no earlier jump is still waiting for a landing. Launching
//! marks the jump as outstanding immediately, so stale ground contact right
//! after take-off cannot produce a double jump.

use bevy::prelude::*;

use crate::config::LandingRule;

/// Per-frame inputs to the jump gate.
#[derive(Debug, Clone, Copy)]
pub struct JumpInput {
    /// Elapsed seconds this frame.
    pub dt: f32,
    /// Ground contact reported this frame.
    pub on_ground: bool,
    /// Vertical velocity before any launch this frame.
    pub vertical_velocity: f32,
    /// Whether a jump was requested this frame.
    pub requested: bool,
}

/// What the jump gate decided this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JumpOutcome {
    /// A landing was detected this frame.
    pub landed: bool,
    /// A jump launched this frame.
    pub launched: bool,
}

/// Jump gating state.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct JumpState {
    /// True when the cooldown has elapsed and contact conditions allow a jump.
    pub can_jump: bool,
    /// Seconds since the last launch, advanced while `can_jump` is false.
    pub jump_timer: f32,
    /// A jump launched and no landing has happened since.
    pub has_jumped_since_grounded: bool,
    /// Ground contact seen on the previous frame.
    pub was_on_ground_last_frame: bool,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            can_jump: true,
            jump_timer: 0.0,
            has_jumped_since_grounded: false,
            was_on_ground_last_frame: false,
        }
    }
}

impl JumpState {
    /// Create a fresh jump state, ready to jump.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a launch would be allowed with the given ground contact.
    #[inline]
    pub fn launch_allowed(&self, on_ground: bool) -> bool {
        on_ground && self.can_jump && !self.has_jumped_since_grounded
    }

    /// Advance the gate by one frame.
    ///
    /// Order: cooldown, landing, launch, then the ground edge is latched.
    pub fn step(&mut self, input: JumpInput, cooldown: f32, rule: LandingRule) -> JumpOutcome {
        let mut outcome = JumpOutcome::default();

        if !self.can_jump {
            self.jump_timer += input.dt;
            if self.jump_timer >= cooldown {
                self.can_jump = true;
                self.jump_timer = 0.0;
            }
        }

        let landed = match rule {
            LandingRule::ContactEdge => input.on_ground && !self.was_on_ground_last_frame,
            LandingRule::GroundedDescending => input.on_ground && input.vertical_velocity <= 0.0,
        };
        if landed {
            outcome.landed = self.has_jumped_since_grounded;
            self.has_jumped_since_grounded = false;
            self.can_jump = true;
            self.jump_timer = 0.0;
        }

        if input.requested && self.launch_allowed(input.on_ground) {
            self.can_jump = false;
            self.has_jumped_since_grounded = true;
            self.jump_timer = 0.0;
            outcome.launched = true;
        }

        self.was_on_ground_last_frame = input.on_ground;
        outcome
    }
}
