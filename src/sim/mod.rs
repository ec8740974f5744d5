//! Crack simulation
//!
//! Everything here is deterministic given a seed and a dt sequence:
//! - Each process owns its seeded RNG
//! - Collaborators are reached only through `target::Host`
//! - No terminal or platform dependencies

pub mod clock;
pub mod cracker;
pub mod event;
pub mod grid;
pub mod injection;
pub mod layout;
pub mod minigame;
pub mod packet_sort;
pub mod process;
pub mod reveal;
pub mod signal_sync;

pub use clock::ProgressClock;
pub use cracker::{CrackSpec, CrackerKind, Family};
pub use event::CrackEvent;
pub use grid::GridState;
pub use layout::{CellMetrics, GridLayout, compute_layout, content_area, module_height};
pub use minigame::{MiniGame, MiniGameKind, MiniGameView};
pub use process::{CrackProcess, ProcessFlags, Stage, TickInput};
pub use reveal::{CellClass, RevealStyle};
