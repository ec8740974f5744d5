//! Interactive mini-games that replace the passive timer on gated crackers
//!
//! Every variant consumes one "action just pressed" edge per frame and
//! reports its own progress. Once complete, `update` is a no-op until the
//! game is re-initialized.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cracker::Family;
use super::injection::{InjectionTiming, InjectionView};
use super::packet_sort::{PacketSort, PacketSortView};
use super::signal_sync::{SignalSync, SignalSyncView};
use crate::Rect;

/// Which mini-game a gated family plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MiniGameKind {
    SignalSync,
    PacketSort,
    InjectionTiming,
}

impl MiniGameKind {
    pub fn for_family(family: Family) -> Self {
        match family {
            Family::Ssh => MiniGameKind::SignalSync,
            Family::Ftp => MiniGameKind::PacketSort,
            Family::Web => MiniGameKind::InjectionTiming,
        }
    }
}

/// Feedback flash after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flash {
    Good,
    Bad,
}

/// Timed flash feedback
#[derive(Debug, Clone, Copy, Default)]
pub struct FlashTimer {
    kind: Option<Flash>,
    timer: f32,
}

impl FlashTimer {
    pub fn trigger(&mut self, kind: Flash, duration: f32) {
        self.kind = Some(kind);
        self.timer = duration;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.timer > 0.0 {
            self.timer -= dt;
        }
    }

    /// Flash currently showing, if any
    pub fn active(&self) -> Option<Flash> {
        if self.timer > 0.0 { self.kind } else { None }
    }
}

/// Minimum spacing between registered actions
#[derive(Debug, Clone, Copy, Default)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
    }

    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn start(&mut self, duration: f32) {
        self.remaining = duration;
    }
}

/// Derives the press edge from a per-frame "key down" sample
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionEdge {
    was_down: bool,
}

impl ActionEdge {
    /// True only on the frame the key goes from released to pressed
    pub fn sample(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}

/// Drawing snapshot of the active mini-game
#[derive(Debug, Clone, PartialEq)]
pub enum MiniGameView {
    SignalSync(SignalSyncView),
    PacketSort(PacketSortView),
    InjectionTiming(InjectionView),
}

/// The active mini-game
#[derive(Debug, Clone)]
pub enum MiniGame {
    SignalSync(SignalSync),
    PacketSort(PacketSort),
    InjectionTiming(InjectionTiming),
}

impl MiniGame {
    pub fn new(kind: MiniGameKind) -> Self {
        match kind {
            MiniGameKind::SignalSync => MiniGame::SignalSync(SignalSync::default()),
            MiniGameKind::PacketSort => MiniGame::PacketSort(PacketSort::default()),
            MiniGameKind::InjectionTiming => MiniGame::InjectionTiming(InjectionTiming::default()),
        }
    }

    pub fn kind(&self) -> MiniGameKind {
        match self {
            MiniGame::SignalSync(_) => MiniGameKind::SignalSync,
            MiniGame::PacketSort(_) => MiniGameKind::PacketSort,
            MiniGame::InjectionTiming(_) => MiniGameKind::InjectionTiming,
        }
    }

    /// (Re)start: resets counters and re-rolls randomized parameters
    pub fn init<R: Rng + ?Sized>(&mut self, bounds: Rect, header_h: i32, rng: &mut R) {
        match self {
            MiniGame::SignalSync(game) => game.init(bounds, header_h, rng),
            MiniGame::PacketSort(game) => game.init(bounds, header_h, rng),
            MiniGame::InjectionTiming(game) => game.init(bounds, header_h),
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, action_pressed: bool, rng: &mut R) {
        match self {
            MiniGame::SignalSync(game) => game.update(dt, action_pressed, rng),
            MiniGame::PacketSort(game) => game.update(dt, action_pressed, rng),
            MiniGame::InjectionTiming(game) => game.update(dt, action_pressed),
        }
    }

    pub fn progress(&self) -> f32 {
        match self {
            MiniGame::SignalSync(game) => game.progress(),
            MiniGame::PacketSort(game) => game.progress(),
            MiniGame::InjectionTiming(game) => game.progress(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn view(&self) -> MiniGameView {
        match self {
            MiniGame::SignalSync(game) => MiniGameView::SignalSync(game.view()),
            MiniGame::PacketSort(game) => MiniGameView::PacketSort(game.view()),
            MiniGame::InjectionTiming(game) => MiniGameView::InjectionTiming(game.view()),
        }
    }
}
