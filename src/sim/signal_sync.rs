//! Signal Sync (SSH): press the action while the oscillating indicator
//! crosses the centered target zone

use rand::Rng;

use super::minigame::{Cooldown, Flash, FlashTimer};
use crate::Rect;

/// Successful syncs needed to finish
pub const TOTAL_SYNCS: u32 = 5;

const MIN_SPEED: f32 = 1.2;
const MAX_SPEED: f32 = 3.5;
const MAX_ACCEL: f32 = 0.5;
const ACCEL_JITTER: f32 = 0.4;
const ACTION_COOLDOWN: f32 = 0.35;
const GOOD_FLASH: f32 = 0.45;
const BAD_FLASH: f32 = 0.30;
/// Horizontal margin of the track inside the bounds (total)
const TRACK_MARGIN: i32 = 32;
const TRACK_H: i32 = 22;

#[derive(Debug, Clone, Default)]
pub struct SignalSync {
    bounds: Rect,
    header_h: i32,
    phase: f32,
    speed: f32,
    accel: f32,
    synced: u32,
    cooldown: Cooldown,
    flash: FlashTimer,
    won: bool,
    progress: f32,
}

/// Drawing snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSyncView {
    pub track: Rect,
    pub zone: Rect,
    pub indicator_x: i32,
    pub in_zone: bool,
    pub flash: Option<Flash>,
    pub synced: u32,
    pub total: u32,
    pub won: bool,
}

impl SignalSync {
    pub fn init<R: Rng + ?Sized>(&mut self, bounds: Rect, header_h: i32, rng: &mut R) {
        *self = Self {
            bounds,
            header_h,
            speed: 1.8 + rng.random::<f32>() * 0.8,
            ..Self::default()
        };
    }

    fn track_w(&self) -> i32 {
        self.bounds.width() - TRACK_MARGIN
    }

    fn zone_w(&self) -> i32 {
        (self.track_w() / 6).max(20)
    }

    /// Max indicator offset from center
    fn travel(&self) -> i32 {
        self.track_w() / 2 - self.zone_w() / 2
    }

    fn indicator_offset(&self) -> f32 {
        self.phase.sin() * self.travel() as f32
    }

    fn in_zone(&self) -> bool {
        self.indicator_offset().abs() < (self.zone_w() / 2) as f32
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, action_pressed: bool, rng: &mut R) {
        if self.won {
            return;
        }

        // Speed random-walks inside [MIN_SPEED, MAX_SPEED]
        self.accel += dt * (rng.random::<f32>() - 0.5) * ACCEL_JITTER;
        self.accel = self.accel.clamp(-MAX_ACCEL, MAX_ACCEL);
        self.speed = (self.speed + self.accel * dt).clamp(MIN_SPEED, MAX_SPEED);
        self.phase += self.speed * dt;

        self.flash.tick(dt);
        self.cooldown.tick(dt);

        if action_pressed && self.cooldown.ready() {
            self.cooldown.start(ACTION_COOLDOWN);
            if self.in_zone() {
                self.synced += 1;
                self.flash.trigger(Flash::Good, GOOD_FLASH);
            } else {
                self.flash.trigger(Flash::Bad, BAD_FLASH);
            }
        }

        self.progress = (self.synced as f32 / TOTAL_SYNCS as f32).min(1.0);
        if self.synced >= TOTAL_SYNCS {
            self.won = true;
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn synced(&self) -> u32 {
        self.synced
    }

    pub fn view(&self) -> SignalSyncView {
        let track_w = self.track_w();
        let content_h = self.bounds.height() - self.header_h;
        let track = Rect::new(
            self.bounds.x() + TRACK_MARGIN / 2,
            self.bounds.y() + self.header_h + content_h / 2 - TRACK_H / 2,
            track_w,
            TRACK_H,
        );
        let center = track.x() + track_w / 2;
        let zone_w = self.zone_w();
        SignalSyncView {
            track,
            zone: Rect::new(center - zone_w / 2, track.y() + 1, zone_w, TRACK_H - 2),
            indicator_x: center + self.indicator_offset() as i32,
            in_zone: self.in_zone(),
            flash: self.flash.active(),
            synced: self.synced,
            total: TOTAL_SYNCS,
            won: self.won,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::FRAC_PI_2;

    fn game(rng: &mut Pcg32) -> SignalSync {
        let mut game = SignalSync::default();
        game.init(Rect::new(0, 0, 200, 120), 28, rng);
        game
    }

    /// Let the cooldown lapse, park the indicator at `phase`, then press
    fn press_at(game: &mut SignalSync, phase: f32, rng: &mut Pcg32) {
        game.update(0.4, false, rng);
        game.phase = phase;
        game.update(0.001, true, rng);
    }

    #[test]
    fn test_five_in_zone_presses_complete() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut game = game(&mut rng);
        for i in 1..=TOTAL_SYNCS {
            press_at(&mut game, 0.0, &mut rng);
            assert_eq!(game.synced(), i);
        }
        assert!(game.progress() >= 1.0);
        assert!(game.view().won);
    }

    #[test]
    fn test_out_of_zone_presses_do_not_count() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut game = game(&mut rng);
        for _ in 0..TOTAL_SYNCS {
            press_at(&mut game, FRAC_PI_2, &mut rng);
            assert_eq!(game.view().flash, Some(Flash::Bad));
        }
        assert_eq!(game.synced(), 0);
        assert_eq!(game.progress(), 0.0);
    }

    #[test]
    fn test_cooldown_blocks_rapid_presses() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut game = game(&mut rng);
        press_at(&mut game, 0.0, &mut rng);
        game.phase = 0.0;
        game.update(0.01, true, &mut rng);
        assert_eq!(game.synced(), 1);
    }

    #[test]
    fn test_speed_stays_bounded() {
        let mut rng = Pcg32::seed_from_u64(14);
        let mut game = game(&mut rng);
        for _ in 0..10_000 {
            game.update(0.05, false, &mut rng);
            assert!((MIN_SPEED..=MAX_SPEED).contains(&game.speed));
            assert!(game.accel.abs() <= MAX_ACCEL);
        }
    }

    #[test]
    fn test_completion_freezes_state() {
        let mut rng = Pcg32::seed_from_u64(15);
        let mut game = game(&mut rng);
        for _ in 0..TOTAL_SYNCS {
            press_at(&mut game, 0.0, &mut rng);
        }
        let phase = game.phase;
        game.update(1.0, true, &mut rng);
        assert_eq!(game.phase, phase);
        assert_eq!(game.synced(), TOTAL_SYNCS);
    }
}
