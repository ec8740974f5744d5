//! Injection Timing (Web): request headers scroll upward in a loop; press
//! the action while the exploit line crosses the injection band

use super::minigame::{Cooldown, Flash, FlashTimer};
use crate::Rect;

/// Successful injections needed to finish
pub const TOTAL_HITS: u32 = 10;

/// Scrolling request, one entry per line
pub const LINES: [&str; 11] = [
    "GET / HTTP/1.1",
    "Host: target.node",
    "Connection: keep-alive",
    "Accept: */*",
    "X-GP-CRACK: v3",
    "X-Port: 80",
    ">>> EXPLOIT_PAYLOAD <<<",
    "Cookie: sess=inject",
    "Pragma: no-cache",
    "X-Tier: 3",
    "Content-Length: 0",
];
/// Index of the line that must be injected
pub const EXPLOIT_INDEX: usize = 6;

pub const LINE_H: i32 = 11;
pub const BAND_H: i32 = 14;

const BASE_SCROLL_SPEED: f32 = 38.0;
const SCROLL_SPEED_STEP: f32 = 2.0;
/// Band center as a fraction of the scrolling area
const BAND_FRACTION: f32 = 0.55;
/// Scrolling text starts this far below the header
const TEXT_OFFSET: i32 = 16;
const ACTION_COOLDOWN: f32 = 0.3;
const HIT_FLASH: f32 = 0.35;
const MISS_FLASH: f32 = 0.25;

#[derive(Debug, Clone, Default)]
pub struct InjectionTiming {
    bounds: Rect,
    header_h: i32,
    scroll_y: f32,
    speed: f32,
    hits: u32,
    misses: u32,
    cooldown: Cooldown,
    flash: FlashTimer,
    won: bool,
    progress: f32,
}

/// Drawing snapshot of one visible line
#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    pub text: &'static str,
    pub y: i32,
    pub is_exploit: bool,
    pub in_band: bool,
}

/// Drawing snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionView {
    pub band: Rect,
    pub lines: Vec<LineView>,
    pub flash: Option<Flash>,
    pub hits: u32,
    pub misses: u32,
    pub total: u32,
    pub won: bool,
}

impl InjectionTiming {
    pub fn init(&mut self, bounds: Rect, header_h: i32) {
        *self = Self {
            bounds,
            header_h,
            speed: BASE_SCROLL_SPEED,
            ..Self::default()
        };
    }

    /// Pixel length of one full scroll cycle
    fn period() -> f32 {
        (LINES.len() as i32 * LINE_H) as f32
    }

    fn text_top(&self) -> i32 {
        self.bounds.y() + self.header_h + TEXT_OFFSET
    }

    fn band_y(&self) -> i32 {
        let scroll_h = self.bounds.height() - self.header_h - TEXT_OFFSET;
        self.text_top() + (scroll_h as f32 * BAND_FRACTION) as i32
    }

    /// Current screen Y of the exploit line, wrapped into one scroll period
    fn exploit_y(&self) -> f32 {
        let offset = (EXPLOIT_INDEX as i32 * LINE_H) as f32 - self.scroll_y;
        self.text_top() as f32 + offset.rem_euclid(Self::period())
    }

    fn on_band(&self, y: f32) -> bool {
        (y - self.band_y() as f32).abs() < (BAND_H / 2 + LINE_H / 2) as f32
    }

    pub fn update(&mut self, dt: f32, action_pressed: bool) {
        if self.won {
            return;
        }

        self.scroll_y += self.speed * dt;
        self.flash.tick(dt);
        self.cooldown.tick(dt);
        self.speed = BASE_SCROLL_SPEED + self.hits as f32 * SCROLL_SPEED_STEP;

        if action_pressed && self.cooldown.ready() {
            self.cooldown.start(ACTION_COOLDOWN);
            if self.on_band(self.exploit_y()) {
                self.hits += 1;
                self.flash.trigger(Flash::Good, HIT_FLASH);
            } else {
                self.misses += 1;
                self.flash.trigger(Flash::Bad, MISS_FLASH);
            }
        }

        self.progress = (self.hits as f32 / TOTAL_HITS as f32).min(1.0);
        if self.hits >= TOTAL_HITS {
            self.won = true;
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn view(&self) -> InjectionView {
        let period = Self::period();
        let scroll = self.scroll_y.rem_euclid(period);
        let visible_top = self.bounds.y() + self.header_h;
        let visible_bottom = self.bounds.bottom() + LINE_H;

        // Three passes of the text cover the wrap seam
        let lines = (0..LINES.len() * 3)
            .filter_map(|i| {
                let y = self.text_top() as f32 + (i as i32 * LINE_H) as f32 - scroll;
                let yi = y as i32;
                if yi < visible_top || yi > visible_bottom {
                    return None;
                }
                let is_exploit = i % LINES.len() == EXPLOIT_INDEX;
                Some(LineView {
                    text: LINES[i % LINES.len()],
                    y: yi,
                    is_exploit,
                    in_band: is_exploit && self.on_band(y),
                })
            })
            .collect();

        InjectionView {
            band: Rect::new(
                self.bounds.x(),
                self.band_y() - BAND_H / 2,
                self.bounds.width(),
                BAND_H,
            ),
            lines,
            flash: self.flash.active(),
            hits: self.hits,
            misses: self.misses,
            total: TOTAL_HITS,
            won: self.won,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> InjectionTiming {
        let mut game = InjectionTiming::default();
        game.init(Rect::new(0, 0, 200, 160), 28);
        game
    }

    /// Scroll offset that puts the exploit line exactly on the band
    fn aligned_scroll(game: &InjectionTiming) -> f32 {
        let target = (game.band_y() - game.text_top()) as f32;
        ((EXPLOIT_INDEX as i32 * LINE_H) as f32 - target).rem_euclid(InjectionTiming::period())
    }

    #[test]
    fn test_aligned_press_hits() {
        let mut game = game();
        game.scroll_y = aligned_scroll(&game);
        assert!(game.on_band(game.exploit_y()));
        game.update(0.001, true);
        assert_eq!(game.hits(), 1);
        assert_eq!(game.view().flash, Some(Flash::Good));
    }

    #[test]
    fn test_misaligned_press_counts_miss() {
        let mut game = game();
        game.scroll_y = aligned_scroll(&game) + 50.0;
        game.update(0.001, true);
        assert_eq!(game.hits(), 0);
        assert_eq!(game.misses(), 1);
        assert_eq!(game.progress(), 0.0);
    }

    #[test]
    fn test_exploit_position_wraps() {
        let mut game = game();
        let base = aligned_scroll(&game);
        game.scroll_y = base;
        let y0 = game.exploit_y();
        game.scroll_y = base + InjectionTiming::period() * 3.0;
        assert!((game.exploit_y() - y0).abs() < 1e-3);
    }

    #[test]
    fn test_ten_hits_complete_and_freeze() {
        let mut game = game();
        for _ in 0..TOTAL_HITS {
            game.update(0.5, false);
            game.scroll_y = aligned_scroll(&game);
            game.update(0.001, true);
        }
        assert_eq!(game.hits(), TOTAL_HITS);
        assert_eq!(game.progress(), 1.0);

        let scroll = game.scroll_y;
        game.update(1.0, true);
        assert_eq!(game.scroll_y, scroll);
        assert_eq!(game.misses(), 0);
    }

    #[test]
    fn test_view_marks_exploit_in_band() {
        let mut game = game();
        game.scroll_y = aligned_scroll(&game);
        let view = game.view();
        assert!(view.lines.iter().any(|l| l.is_exploit && l.in_band));
        assert!(view.lines.iter().filter(|l| !l.is_exploit).all(|l| !l.in_band));
    }
}
