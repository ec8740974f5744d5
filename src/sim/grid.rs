//! Random symbol grid with per-cell reveal thresholds
//!
//! Thresholds are rolled once when the grid is created and stay fixed for
//! its lifetime; symbols keep scrambling on the flicker cadence.

use rand::Rng;

use super::reveal::RevealStyle;
use crate::consts::FLICKER_INTERVAL;

/// Symbol alphabet
pub const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Random hex digit
pub fn random_hex<R: Rng + ?Sized>(rng: &mut R) -> char {
    HEX_CHARS[rng.random_range(0..HEX_CHARS.len())] as char
}

/// Row-major symbol and threshold buffers plus the flicker accumulator
#[derive(Debug, Clone)]
pub struct GridState {
    cols: usize,
    rows: usize,
    symbols: Vec<char>,
    thresholds: Vec<f32>,
    flicker_timer: f32,
}

impl GridState {
    /// Fill a fresh grid with random symbols and thresholds in [0, 1)
    pub fn new<R: Rng + ?Sized>(cols: usize, rows: usize, rng: &mut R) -> Self {
        let len = cols * rows;
        let mut symbols = Vec::with_capacity(len);
        let mut thresholds = Vec::with_capacity(len);
        for _ in 0..len {
            symbols.push(random_hex(rng));
            thresholds.push(rng.random::<f32>());
        }
        Self {
            cols,
            rows,
            symbols,
            thresholds,
            flicker_timer: 0.0,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Whether the buffers already have these dimensions
    pub fn matches(&self, cols: usize, rows: usize) -> bool {
        self.cols == cols && self.rows == rows
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn symbol(&self, row: usize, col: usize) -> char {
        self.symbols[self.index(row, col)]
    }

    pub fn threshold(&self, row: usize, col: usize) -> f32 {
        self.thresholds[self.index(row, col)]
    }

    /// Advance the flicker accumulator; on each interval, re-roll the symbol
    /// of every cell the style still treats as uncracked.
    ///
    /// Returns true when a scramble happened.
    pub fn tick_flicker<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        style: RevealStyle,
        progress: f32,
        rng: &mut R,
    ) -> bool {
        self.flicker_timer += dt;
        if self.flicker_timer < FLICKER_INTERVAL {
            return false;
        }
        self.flicker_timer = 0.0;

        let (rows, cols) = (self.rows, self.cols);
        for row in 0..rows {
            for col in 0..cols {
                let i = self.index(row, col);
                if style.flickers(self.thresholds[i], progress, row, col, rows, cols) {
                    self.symbols[i] = random_hex(rng);
                }
            }
        }
        true
    }
}

/// Keep `slot` holding a grid of exactly (cols, rows), recreating it on change
pub fn ensure_grid<'a, R: Rng + ?Sized>(
    slot: &'a mut Option<GridState>,
    cols: usize,
    rows: usize,
    rng: &mut R,
) -> &'a mut GridState {
    if slot.as_ref().is_some_and(|g| !g.matches(cols, rows)) {
        *slot = None;
    }
    slot.get_or_insert_with(|| {
        log::debug!("grid created at {}x{}", cols, rows);
        GridState::new(cols, rows, rng)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_thresholds_in_unit_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let grid = GridState::new(30, 6, &mut rng);
        for r in 0..6 {
            for c in 0..30 {
                let t = grid.threshold(r, c);
                assert!((0.0..1.0).contains(&t));
                assert!(HEX_CHARS.contains(&(grid.symbol(r, c) as u8)));
            }
        }
    }

    #[test]
    fn test_ensure_grid_keeps_matching_buffers() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut slot = None;
        let first = ensure_grid(&mut slot, 10, 4, &mut rng).threshold(3, 9);
        let again = ensure_grid(&mut slot, 10, 4, &mut rng).threshold(3, 9);
        assert_eq!(first, again);

        let resized = ensure_grid(&mut slot, 12, 4, &mut rng);
        assert_eq!(resized.cols(), 12);
        assert_eq!(resized.rows(), 4);
    }

    #[test]
    fn test_flicker_waits_for_interval() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut grid = GridState::new(8, 2, &mut rng);
        assert!(!grid.tick_flicker(0.05, RevealStyle::Matrix, 0.0, &mut rng));
        assert!(grid.tick_flicker(0.05, RevealStyle::Matrix, 0.0, &mut rng));
        assert!(!grid.tick_flicker(0.01, RevealStyle::Matrix, 0.0, &mut rng));
    }

    #[test]
    fn test_cracked_cells_hold_their_symbol() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut grid = GridState::new(20, 6, &mut rng);
        let before = grid.symbols.clone();
        for _ in 0..10 {
            grid.tick_flicker(0.1, RevealStyle::Packets, 0.5, &mut rng);
        }
        // Rows 0..3 are cracked at half progress on a 6-row grid
        assert_eq!(&grid.symbols[..60], &before[..60]);
    }
}
