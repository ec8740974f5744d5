//! Packet Sort (FTP): labeled packets fall through a column; press the
//! action to catch the lowest packet in the catch band. Only packets
//! carrying the target label count.

use rand::Rng;

use super::grid::random_hex;
use super::minigame::{Cooldown, Flash, FlashTimer};
use crate::Rect;

/// Correct catches needed to finish
pub const NEEDED_CATCHES: u32 = 10;

/// Packet height in pixels
pub const PACKET_H: i32 = 12;
/// Catch band height at the bottom of the bounds
pub const CATCH_BAND_H: i32 = 14;

const BASE_SPAWN_INTERVAL: f32 = 0.65;
const MIN_SPAWN_INTERVAL: f32 = 0.38;
const SPAWN_INTERVAL_STEP: f32 = 0.015;
const BASE_FALL_SPEED: f32 = 36.0;
const FALL_SPEED_STEP: f32 = 1.2;
const TARGET_CHANCE: f64 = 0.38;
const ACTION_COOLDOWN: f32 = 0.15;
const HIT_FLASH: f32 = 0.25;
const PENALTY_FLASH: f32 = 0.30;
/// Spawn line sits this far below the header
const SPAWN_OFFSET: i32 = 14;
const MAX_COLUMN_W: i32 = 72;

/// A falling packet
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    /// Top edge, pixels
    pub y: f32,
    pub label: String,
    pub is_target: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PacketSort {
    bounds: Rect,
    header_h: i32,
    packets: Vec<Packet>,
    target: String,
    spawn_timer: f32,
    spawn_interval: f32,
    speed: f32,
    caught: u32,
    cooldown: Cooldown,
    flash: FlashTimer,
    won: bool,
    progress: f32,
}

/// Drawing snapshot of one packet
#[derive(Debug, Clone, PartialEq)]
pub struct PacketView {
    pub y: i32,
    pub label: String,
    pub is_target: bool,
    pub in_band: bool,
}

/// Drawing snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct PacketSortView {
    pub target: String,
    pub column: Rect,
    pub catch_band: Rect,
    pub packets: Vec<PacketView>,
    pub flash: Option<Flash>,
    pub caught: u32,
    pub needed: u32,
    pub won: bool,
}

/// Random bracketed two-digit hex label, e.g. `[3F]`
pub fn random_label<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("[{}{}]", random_hex(rng), random_hex(rng))
}

impl PacketSort {
    pub fn init<R: Rng + ?Sized>(&mut self, bounds: Rect, header_h: i32, rng: &mut R) {
        *self = Self {
            bounds,
            header_h,
            target: random_label(rng),
            spawn_interval: BASE_SPAWN_INTERVAL,
            speed: BASE_FALL_SPEED,
            ..Self::default()
        };
    }

    fn spawn_y(&self) -> f32 {
        (self.bounds.y() + self.header_h + SPAWN_OFFSET) as f32
    }

    fn catch_top(&self) -> f32 {
        (self.bounds.bottom() - CATCH_BAND_H) as f32
    }

    fn in_band(&self, packet: &Packet) -> bool {
        packet.y + PACKET_H as f32 >= self.catch_top() && packet.y <= self.bounds.bottom() as f32
    }

    fn spawn_packet<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let is_target = rng.random_bool(TARGET_CHANCE);
        let label = if is_target {
            self.target.clone()
        } else {
            // Distractors never carry the target label
            loop {
                let label = random_label(rng);
                if label != self.target {
                    break label;
                }
            }
        };
        self.packets.push(Packet {
            y: self.spawn_y(),
            label,
            is_target,
        });
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, action_pressed: bool, rng: &mut R) {
        if self.won {
            return;
        }

        self.flash.tick(dt);
        self.cooldown.tick(dt);

        self.spawn_timer += dt;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0.0;
            self.spawn_interval = (BASE_SPAWN_INTERVAL - self.caught as f32 * SPAWN_INTERVAL_STEP)
                .max(MIN_SPAWN_INTERVAL);
            // Skip this slot if the previous packet hasn't cleared the spawn line
            let crowded_above = self.spawn_y() + (PACKET_H * 2) as f32;
            if !self.packets.iter().any(|p| p.y < crowded_above) {
                self.spawn_packet(rng);
            }
        }

        let floor = self.bounds.bottom() as f32;
        for packet in &mut self.packets {
            packet.y += self.speed * dt;
        }
        self.packets.retain(|p| p.y <= floor);
        self.speed = BASE_FALL_SPEED + self.caught as f32 * FALL_SPEED_STEP;

        if action_pressed && self.cooldown.ready() {
            self.cooldown.start(ACTION_COOLDOWN);
            // Lowest packet in the band is closest to escaping
            let best = self
                .packets
                .iter()
                .enumerate()
                .filter(|(_, p)| self.in_band(p))
                .max_by(|(_, a), (_, b)| a.y.total_cmp(&b.y))
                .map(|(i, _)| i);
            if let Some(index) = best {
                let packet = self.packets.remove(index);
                if packet.is_target {
                    self.caught += 1;
                    self.flash.trigger(Flash::Good, HIT_FLASH);
                } else {
                    self.flash.trigger(Flash::Bad, PENALTY_FLASH);
                }
            }
        }

        self.progress = (self.caught as f32 / NEEDED_CATCHES as f32).min(1.0);
        if self.caught >= NEEDED_CATCHES {
            self.won = true;
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn caught(&self) -> u32 {
        self.caught
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn view(&self) -> PacketSortView {
        let column_w = MAX_COLUMN_W.min(self.bounds.width() - 24);
        let column_top = self.bounds.y() + self.header_h + 13;
        let column = Rect::new(
            self.bounds.center_x() - column_w / 2,
            column_top,
            column_w,
            self.bounds.bottom() - column_top,
        );
        PacketSortView {
            target: self.target.clone(),
            column,
            catch_band: Rect::new(
                column.x() + 1,
                self.catch_top() as i32,
                column_w - 2,
                CATCH_BAND_H - 1,
            ),
            packets: self
                .packets
                .iter()
                .map(|p| PacketView {
                    y: p.y as i32,
                    label: p.label.clone(),
                    is_target: p.is_target,
                    in_band: self.in_band(p),
                })
                .collect(),
            flash: self.flash.active(),
            caught: self.caught,
            needed: NEEDED_CATCHES,
            won: self.won,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn game(rng: &mut Pcg32) -> PacketSort {
        let mut game = PacketSort::default();
        game.init(Rect::new(0, 0, 160, 200), 28, rng);
        game
    }

    fn drop_into_band(game: &mut PacketSort, is_target: bool) {
        let label = if is_target {
            game.target.clone()
        } else {
            "[ZZ]".to_string()
        };
        game.packets.push(Packet {
            y: game.catch_top(),
            label,
            is_target,
        });
    }

    #[test]
    fn test_ten_target_catches_complete() {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut game = game(&mut rng);
        // 20 packets, every other one carries the target label
        for i in 0..20 {
            drop_into_band(&mut game, i % 2 == 0);
            let before = game.progress();
            game.update(0.16, true, &mut rng);
            if i % 2 == 1 && !game.view().won {
                assert_eq!(game.progress(), before, "distractor changed progress");
            }
        }
        assert_eq!(game.caught(), NEEDED_CATCHES);
        assert_eq!(game.progress(), 1.0);
        assert!(game.view().won);
    }

    #[test]
    fn test_distractor_catch_flashes_without_penalty() {
        let mut rng = Pcg32::seed_from_u64(22);
        let mut game = game(&mut rng);
        drop_into_band(&mut game, true);
        game.update(0.16, true, &mut rng);
        assert_eq!(game.caught(), 1);

        drop_into_band(&mut game, false);
        game.update(0.16, true, &mut rng);
        assert_eq!(game.caught(), 1);
        assert_eq!(game.view().flash, Some(Flash::Bad));
        assert!(game.packets().iter().all(|p| p.label != "[ZZ]"));
    }

    #[test]
    fn test_lowest_packet_in_band_is_caught() {
        let mut rng = Pcg32::seed_from_u64(23);
        let mut game = game(&mut rng);
        let top = game.catch_top();
        game.packets.push(Packet {
            y: top - 4.0,
            label: "[AA]".into(),
            is_target: false,
        });
        game.packets.push(Packet {
            y: top + 6.0,
            label: game.target.clone(),
            is_target: true,
        });
        game.update(0.0, true, &mut rng);
        assert_eq!(game.caught(), 1);
        assert_eq!(game.packets().len(), 1);
        assert_eq!(game.packets()[0].label, "[AA]");
    }

    #[test]
    fn test_packets_leave_below_play_area() {
        let mut rng = Pcg32::seed_from_u64(24);
        let mut game = game(&mut rng);
        for _ in 0..600 {
            game.update(0.05, false, &mut rng);
        }
        let floor = game.bounds.bottom() as f32;
        assert!(game.packets().iter().all(|p| p.y <= floor));
        assert!(!game.packets().is_empty());
    }

    #[test]
    fn test_distractors_never_share_target_label() {
        let mut rng = Pcg32::seed_from_u64(25);
        let mut game = game(&mut rng);
        for _ in 0..500 {
            game.spawn_packet(&mut rng);
        }
        for p in game.packets() {
            assert_eq!(p.is_target, p.label == game.target);
        }
    }

    #[test]
    fn test_cadence_tightens_with_catches() {
        let mut rng = Pcg32::seed_from_u64(26);
        let mut game = game(&mut rng);
        game.caught = 9;
        game.spawn_timer = game.spawn_interval;
        game.update(0.0, false, &mut rng);
        assert!((game.spawn_interval - (0.65 - 9.0 * 0.015)).abs() < 1e-6);
        assert!((game.speed - (36.0 + 9.0 * 1.2)).abs() < 1e-4);
    }
}
