//! Layout policy: fit a character grid into the module's content area
//!
//! The cell scale is derived from the target row count and clamped so the
//! grid never upscales past the font's native size and never shrinks below
//! legibility.

use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::{
    CONTENT_INSET_BOTTOM, CONTENT_INSET_X, DEFAULT_CELL_H, DEFAULT_CELL_W, MAX_CELL_SCALE,
    MIN_CELL_SCALE,
};

/// Native (unscaled) character cell size supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: DEFAULT_CELL_W,
            height: DEFAULT_CELL_H,
        }
    }
}

/// Result of fitting the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
    pub scale: f32,
    /// Scaled cell width in pixels
    pub char_w: i32,
    /// Scaled cell height in pixels
    pub char_h: i32,
}

/// Fit a grid into `content_w` x `content_h` pixels aiming for `target_rows` rows
pub fn compute_layout(
    content_w: i32,
    content_h: i32,
    target_rows: usize,
    metrics: CellMetrics,
) -> GridLayout {
    let target_rows = target_rows.max(1);

    if content_h <= 0 {
        return GridLayout {
            cols: 1,
            rows: 0,
            scale: MIN_CELL_SCALE,
            char_w: ((metrics.width * MIN_CELL_SCALE) as i32).max(1),
            char_h: ((metrics.height * MIN_CELL_SCALE) as i32).max(1),
        };
    }

    let scale = (content_h as f32 / (target_rows as f32 * metrics.height))
        .clamp(MIN_CELL_SCALE, MAX_CELL_SCALE);
    let char_w = ((metrics.width * scale).floor() as i32).max(1);
    let char_h = ((metrics.height * scale).floor() as i32).max(1);

    let rows = ((content_h / char_h).max(1) as usize).min(target_rows);
    let cols = (content_w / char_w).max(1) as usize;

    GridLayout {
        cols,
        rows,
        scale,
        char_w,
        char_h,
    }
}

/// Content area below the header, inset from the module edges
pub fn content_area(bounds: Rect, header_h: i32) -> Rect {
    Rect::new(
        bounds.x() + CONTENT_INSET_X,
        bounds.y() + header_h,
        bounds.width() - 2 * CONTENT_INSET_X,
        bounds.height() - header_h - CONTENT_INSET_BOTTOM,
    )
}

/// Module pixel height proportional to its share of the player's RAM
pub fn module_height(ram_cost: i32, player_ram: i32, panel_full_h: i32) -> i32 {
    if player_ram <= 0 {
        return panel_full_h.max(20);
    }
    let share = ram_cost as f32 / player_ram as f32;
    ((share * panel_full_h as f32).round() as i32).max(20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_size_when_room_to_spare() {
        let layout = compute_layout(300, 200, 6, CellMetrics::default());
        assert_eq!(layout.scale, 1.0);
        assert_eq!(layout.char_w, 6);
        assert_eq!(layout.char_h, 11);
        assert_eq!(layout.rows, 6);
        assert_eq!(layout.cols, 50);
    }

    #[test]
    fn test_shrinks_to_fit_target_rows() {
        // 33px for 6 rows of 11px -> scale 0.5
        let layout = compute_layout(120, 33, 6, CellMetrics::default());
        assert!((layout.scale - 0.5).abs() < 1e-6);
        assert_eq!(layout.char_w, 3);
        assert_eq!(layout.char_h, 5);
        assert_eq!(layout.rows, 6);
        assert_eq!(layout.cols, 40);
    }

    #[test]
    fn test_scale_floor_limits_rows() {
        let layout = compute_layout(60, 10, 6, CellMetrics::default());
        assert_eq!(layout.scale, MIN_CELL_SCALE);
        assert_eq!(layout.char_h, 4);
        assert_eq!(layout.rows, 2);
    }

    #[test]
    fn test_degenerate_height() {
        let layout = compute_layout(100, 0, 6, CellMetrics::default());
        assert_eq!((layout.cols, layout.rows), (1, 0));
        assert_eq!(layout.char_w, 2);
        assert_eq!(layout.char_h, 4);
    }

    #[test]
    fn test_content_area_insets() {
        let area = content_area(Rect::new(10, 20, 200, 100), 28);
        assert_eq!(area, Rect::new(14, 48, 192, 68));
    }

    #[test]
    fn test_module_height_share() {
        assert_eq!(module_height(256, 1024, 400), 100);
        assert_eq!(module_height(1, 4096, 400), 20);
    }
}
