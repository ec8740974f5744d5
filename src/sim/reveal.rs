//! Reveal styles: progress -> per-cell cracked/edge/uncracked classification
//!
//! Each style also decides which cells keep flickering (symbol scramble).
//! Flicker never changes classification, only the displayed symbol.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/// Width (in column fraction) of the waveform's leading edge
pub const WAVE_EDGE_WIDTH: f32 = 0.06;
/// Amplitude of the waveform's per-row ripple
const WAVE_RIPPLE: f32 = 0.08;
/// Row-to-row ripple frequency
const WAVE_ROW_FREQ: f32 = 1.5;
/// Total lag of the last row behind the first
const WAVE_ROW_LAG: f32 = 0.3;

/// Procedural reveal algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealStyle {
    /// Per-cell random thresholds: unordered "popcorn" reveal
    #[default]
    Matrix,
    /// Row-major sweep with a single bright edge cell
    Packets,
    /// Sine-rippled front sweeping left to right
    Waveform,
}

/// Classification of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    Cracked,
    /// Leading edge of the reveal (drawn toward white)
    Edge,
    Uncracked,
}

impl RevealStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealStyle::Matrix => "matrix",
            RevealStyle::Packets => "packets",
            RevealStyle::Waveform => "waveform",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "matrix" => Some(RevealStyle::Matrix),
            "packets" => Some(RevealStyle::Packets),
            "waveform" => Some(RevealStyle::Waveform),
            _ => None,
        }
    }

    /// Classify cell (row, col). `threshold` is only read by Matrix.
    pub fn classify(
        &self,
        threshold: f32,
        progress: f32,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> CellClass {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            RevealStyle::Matrix => {
                if threshold <= progress {
                    CellClass::Cracked
                } else {
                    CellClass::Uncracked
                }
            }
            RevealStyle::Packets => {
                let edge = packets_edge(progress, rows, cols);
                if row < edge.row || (row == edge.row && col < edge.col) {
                    CellClass::Cracked
                } else if row == edge.row && col == edge.col {
                    CellClass::Edge
                } else {
                    CellClass::Uncracked
                }
            }
            RevealStyle::Waveform => {
                // Endpoints are pinned so the sweep starts empty and ends full
                if progress <= 0.0 {
                    return CellClass::Uncracked;
                }
                if progress >= 1.0 {
                    return CellClass::Cracked;
                }
                let front = wave_front(progress, row, rows);
                let col_pct = col as f32 / cols.max(1) as f32;
                if col_pct <= front - WAVE_EDGE_WIDTH {
                    CellClass::Cracked
                } else if col_pct <= front {
                    CellClass::Edge
                } else {
                    CellClass::Uncracked
                }
            }
        }
    }

    /// Whether cell (row, col) is still scrambling at this progress
    pub fn flickers(
        &self,
        threshold: f32,
        progress: f32,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> bool {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            RevealStyle::Matrix => threshold > progress,
            RevealStyle::Packets => {
                let edge = packets_edge(progress, rows, cols);
                row > edge.row || (row == edge.row && col >= edge.col)
            }
            RevealStyle::Waveform => {
                if progress <= 0.0 {
                    return true;
                }
                if progress >= 1.0 {
                    return false;
                }
                col as f32 / cols.max(1) as f32 > wave_front(progress, row, rows)
            }
        }
    }
}

/// First not-yet-cracked cell of the Packets sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketsEdge {
    /// Number of fully cracked rows (== rows when complete)
    pub row: usize,
    /// Cracked cells in the partial row (always < cols)
    pub col: usize,
}

/// `crackedRows = floor(p*rows)`, `crackedCols = floor(frac(p*rows)*cols)`
pub fn packets_edge(progress: f32, rows: usize, cols: usize) -> PacketsEdge {
    let scaled = progress.clamp(0.0, 1.0) * rows as f32;
    let row = (scaled.floor() as usize).min(rows);
    let col = ((scaled - row as f32) * cols as f32).floor().max(0.0) as usize;
    PacketsEdge {
        row,
        col: col.min(cols.saturating_sub(1)),
    }
}

/// Waveform front (column fraction) for a row
pub fn wave_front(progress: f32, row: usize, rows: usize) -> f32 {
    let row_phase = row as f32 / rows.max(1) as f32 * WAVE_ROW_LAG;
    progress + WAVE_RIPPLE * (row as f32 * WAVE_ROW_FREQ + progress * TAU).sin() - row_phase
}

/// How far into the leading edge a waveform cell sits, as a white-mix factor in 0.4..=1.0
pub fn wave_edge_mix(progress: f32, row: usize, col: usize, rows: usize, cols: usize) -> f32 {
    let front = wave_front(progress.clamp(0.0, 1.0), row, rows);
    let col_pct = col as f32 / cols.max(1) as f32;
    ((front - col_pct) / WAVE_EDGE_WIDTH * 0.6 + 0.4).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(style: RevealStyle, progress: f32, rows: usize, cols: usize, class: CellClass) -> usize {
        let mut n = 0;
        for r in 0..rows {
            for c in 0..cols {
                // Deterministic spread of thresholds for Matrix
                let threshold = ((r * cols + c) as f32 * 0.618_034).fract();
                if style.classify(threshold, progress, r, c, rows, cols) == class {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_packets_endpoints() {
        assert_eq!(count(RevealStyle::Packets, 0.0, 6, 40, CellClass::Cracked), 0);
        assert_eq!(count(RevealStyle::Packets, 1.0, 6, 40, CellClass::Cracked), 240);
        // Edge cell sits outside the grid once complete
        assert_eq!(count(RevealStyle::Packets, 1.0, 6, 40, CellClass::Edge), 0);
    }

    #[test]
    fn test_packets_fills_row_major() {
        // Halfway through 4 rows of 10: rows 0 and 1 done, edge at (2, 0)
        let edge = packets_edge(0.5, 4, 10);
        assert_eq!(edge, PacketsEdge { row: 2, col: 0 });
        let style = RevealStyle::Packets;
        assert_eq!(style.classify(0.0, 0.5, 1, 9, 4, 10), CellClass::Cracked);
        assert_eq!(style.classify(0.0, 0.5, 2, 0, 4, 10), CellClass::Edge);
        assert_eq!(style.classify(0.0, 0.5, 2, 1, 4, 10), CellClass::Uncracked);
        assert!(style.flickers(0.0, 0.5, 2, 0, 4, 10));
        assert!(!style.flickers(0.0, 0.5, 1, 9, 4, 10));
    }

    #[test]
    fn test_matrix_uses_threshold() {
        let style = RevealStyle::Matrix;
        assert_eq!(style.classify(0.3, 0.3, 0, 0, 1, 1), CellClass::Cracked);
        assert_eq!(style.classify(0.31, 0.3, 0, 0, 1, 1), CellClass::Uncracked);
        assert!(style.flickers(0.31, 0.3, 0, 0, 1, 1));
    }

    #[test]
    fn test_waveform_edge_present_mid_sweep() {
        for step in 1..20 {
            let p = step as f32 / 20.0;
            assert!(
                count(RevealStyle::Waveform, p, 6, 40, CellClass::Edge) > 0,
                "no leading edge at p={}",
                p
            );
        }
        assert_eq!(count(RevealStyle::Waveform, 0.0, 6, 40, CellClass::Edge), 0);
        assert_eq!(count(RevealStyle::Waveform, 1.0, 6, 40, CellClass::Edge), 0);
        assert_eq!(count(RevealStyle::Waveform, 1.0, 6, 40, CellClass::Cracked), 240);
    }

    #[test]
    fn test_waveform_flicker_only_ahead_of_front() {
        let style = RevealStyle::Waveform;
        let p = 0.5;
        for c in 0..40 {
            let class = style.classify(0.0, p, 0, c, 6, 40);
            if class == CellClass::Cracked {
                assert!(!style.flickers(0.0, p, 0, c, 6, 40));
            }
        }
    }

    #[test]
    fn test_style_names() {
        assert_eq!(RevealStyle::from_str(" Packets "), Some(RevealStyle::Packets));
        assert_eq!(RevealStyle::from_str("plasma"), None);
        assert_eq!(RevealStyle::Waveform.as_str(), "waveform");
    }
}
