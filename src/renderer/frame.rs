//! Host-neutral frame description produced by `CrackProcess::draw`

use glam::IVec2;

use super::palette::{self, Rgb};
use crate::sim::cracker::CrackSpec;
use crate::sim::grid::GridState;
use crate::sim::layout::GridLayout;
use crate::sim::minigame::MiniGameView;
use crate::sim::process::Stage;
use crate::sim::reveal::{CellClass, RevealStyle, wave_edge_mix};
use crate::{Rect, Tunables};

/// Module header strip
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub bounds: Rect,
    pub label: String,
    /// Target node id, or "TEST" for test and loop runs
    pub target: String,
    pub background: Rgb,
    pub label_color: Rgb,
    /// Height of the tier-colored accent bar along the top edge
    pub accent_h: i32,
    /// Label baseline relative to the module top
    pub label_y: i32,
    /// Gated crack; draw the `[KEY]` marker
    pub keyed: bool,
}

/// One drawn grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub symbol: char,
    pub class: CellClass,
    pub color: Rgb,
}

/// Classified, colored grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    /// Top-left pixel of cell (0, 0)
    pub origin: IVec2,
    pub layout: GridLayout,
    pub style: RevealStyle,
    /// Row-major
    pub cells: Vec<Cell>,
}

impl GridFrame {
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.layout.rows || col >= self.layout.cols {
            return None;
        }
        self.cells.get(row * self.layout.cols + col)
    }

    pub fn count(&self, class: CellClass) -> usize {
        self.cells.iter().filter(|c| c.class == class).count()
    }

    /// Pixel position of a cell's top-left corner
    pub fn cell_origin(&self, row: usize, col: usize) -> IVec2 {
        self.origin + IVec2::new(col as i32 * self.layout.char_w, row as i32 * self.layout.char_h)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameBody {
    /// Module too small for content
    Empty,
    Grid(GridFrame),
    MiniGame(MiniGameView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub header: Header,
    pub body: FrameBody,
    pub stage: Stage,
    pub progress: f32,
}

pub fn build_header(spec: &CrackSpec, target: &str, bounds: Rect, tunables: &Tunables) -> Header {
    Header {
        bounds: Rect::new(bounds.x(), bounds.y(), bounds.width(), tunables.header_h),
        label: spec.display_name.clone(),
        target: target.to_string(),
        background: palette::HEADER_BG,
        label_color: palette::label_color(spec.tier),
        accent_h: tunables.accent_h,
        label_y: tunables.label_offset,
        keyed: spec.is_gated(),
    }
}

pub fn build_grid(
    grid: &GridState,
    layout: GridLayout,
    origin: IVec2,
    style: RevealStyle,
    progress: f32,
    tier: u8,
) -> GridFrame {
    let (rows, cols) = (grid.rows(), grid.cols());
    let cracked = palette::cracked_color(tier);

    let mut cells = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let class = style.classify(grid.threshold(row, col), progress, row, col, rows, cols);
            let color = match class {
                CellClass::Cracked => cracked,
                CellClass::Uncracked => palette::UNCRACKED,
                CellClass::Edge if style == RevealStyle::Waveform => {
                    cracked.lerp(palette::EDGE, wave_edge_mix(progress, row, col, rows, cols))
                }
                CellClass::Edge => palette::EDGE,
            };
            cells.push(Cell {
                symbol: grid.symbol(row, col),
                class,
                color,
            });
        }
    }

    GridFrame {
        origin,
        layout,
        style,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cracker::CrackerKind;
    use crate::sim::layout::{CellMetrics, compute_layout};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid_frame(style: RevealStyle, progress: f32) -> GridFrame {
        let mut rng = Pcg32::seed_from_u64(3);
        let layout = compute_layout(232, 66, 6, CellMetrics::default());
        let grid = GridState::new(layout.cols, layout.rows, &mut rng);
        build_grid(&grid, layout, IVec2::new(4, 28), style, progress, 2)
    }

    #[test]
    fn test_header_marks_gated() {
        let tunables = Tunables::default();
        let spec = CrackSpec::for_cracker(CrackerKind::WebV3, None, &tunables);
        let header = build_header(&spec, "TEST", Rect::new(0, 40, 200, 100), &tunables);
        assert!(header.keyed);
        assert_eq!(header.bounds, Rect::new(0, 40, 200, 28));
        assert_eq!(header.label_color, palette::label_color(3));
    }

    #[test]
    fn test_packets_single_edge_is_white() {
        let frame = grid_frame(RevealStyle::Packets, 0.5);
        assert_eq!(frame.count(CellClass::Edge), 1);
        let edge = frame.cells.iter().find(|c| c.class == CellClass::Edge);
        assert_eq!(edge.map(|c| c.color), Some(Rgb::WHITE));
    }

    #[test]
    fn test_full_progress_is_all_cracked() {
        for style in [RevealStyle::Matrix, RevealStyle::Packets, RevealStyle::Waveform] {
            let frame = grid_frame(style, 1.0);
            assert_eq!(frame.count(CellClass::Cracked), frame.cells.len());
            assert!(frame.cells.iter().all(|c| c.color == palette::cracked_color(2)));
        }
    }

    #[test]
    fn test_cell_lookup_bounds() {
        let frame = grid_frame(RevealStyle::Matrix, 0.0);
        assert!(frame.cell(0, 0).is_some());
        assert!(frame.cell(frame.layout.rows, 0).is_none());
        assert_eq!(frame.cell_origin(1, 2), IVec2::new(4 + 2 * frame.layout.char_w, 28 + frame.layout.char_h));
    }
}
