//! Marquee viewport scrolling.
//!
//! The [`ScrollController`] chases a target offset that keeps the read-head
//! word centred in the viewport. Distance picks the speed: far behind uses
//! the catch-up speed, moderately behind 1.5x base, close uses base. While the
//! operator holds a direction key the offset is driven manually with a
//! linearly ramping acceleration, and the target follows it so releasing the
//! key never snaps the view back.

mod config;
mod controller;

pub use config::{ScrollConfig, ScrollConfigError};
pub use controller::ScrollController;

use serde::{Deserialize, Serialize};

/// Direction of a manual hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldDirection {
    /// Reveal later words; text moves left.
    Forward,
    /// Reveal earlier words; text moves right.
    Backward,
}

impl HoldDirection {
    /// Sign applied to the offset per manual tick.
    pub fn sign(self) -> f32 {
        match self {
            HoldDirection::Forward => -1.0,
            HoldDirection::Backward => 1.0,
        }
    }
}

/// Snapshot of the scroll controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub current_offset: f32,
    pub target_offset: f32,
    /// -1, 0 or +1, matching [`HoldDirection::sign`].
    pub manual_direction: i8,
    pub hold_accel: f32,
}
