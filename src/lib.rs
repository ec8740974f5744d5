//! Gatekeeper - timed port-crack processes with procedural grid reveals
//!
//! Core modules:
//! - `sim`: Crack process state machine, progress clock, reveal styles, mini-games
//! - `renderer`: Host-neutral frames, palette, ANSI text output
//! - `target`: Collaborator traits for target state and credentials
//! - `tunables`: Live-tunable layout/style configuration
//! - `hardware`: CPU tier speed multipliers

pub mod error;
pub mod hardware;
pub mod renderer;
pub mod sim;
pub mod target;
pub mod tunables;

pub use error::{CrackFailure, HostError, TunableError};
pub use hardware::CpuTier;
pub use tunables::{LiveTunables, Tunables};

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Engine constants
pub mod consts {
    /// Accumulated draw time between symbol scrambles (~12 Hz)
    pub const FLICKER_INTERVAL: f32 = 0.08;

    /// Layout scale never drops below this (legibility floor)
    pub const MIN_CELL_SCALE: f32 = 0.45;
    /// Layout scale never exceeds native cell size
    pub const MAX_CELL_SCALE: f32 = 1.0;

    /// Native cell size of the host's small font, in pixels
    pub const DEFAULT_CELL_W: f32 = 6.0;
    pub const DEFAULT_CELL_H: f32 = 11.0;

    /// Horizontal inset of the grid inside the module bounds (each side)
    pub const CONTENT_INSET_X: i32 = 4;
    /// Gap kept below the grid
    pub const CONTENT_INSET_BOTTOM: i32 = 4;

    /// Only this tier may escalate to the next tier's protocol
    pub const ESCALATION_TIER: u8 = 2;
    /// Tiers at or above this address ports by protocol name
    pub const NAMED_PORT_TIER: u8 = 2;

    /// Slack (seconds) when comparing elapsed time against solve time
    pub const SOLVE_EPSILON: f32 = 1e-3;

    /// Minimum seconds between live-tunable reload attempts
    pub const TUNABLES_POLL_INTERVAL: f32 = 1.0;
}

/// Integer pixel rectangle supplied by the host (module bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: IVec2::new(x, y),
            size: IVec2::new(width, height),
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.origin.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.origin.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size.y
    }

    /// Y coordinate one past the last pixel row
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.y
    }

    /// Horizontal center
    #[inline]
    pub fn center_x(&self) -> i32 {
        self.origin.x + self.size.x / 2
    }
}
