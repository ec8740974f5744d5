//! Property tests for reveal classification and grid layout

use proptest::prelude::*;

use gatekeeper::sim::{CellClass, CellMetrics, RevealStyle, compute_layout};

fn style() -> impl Strategy<Value = RevealStyle> {
    prop_oneof![
        Just(RevealStyle::Matrix),
        Just(RevealStyle::Packets),
        Just(RevealStyle::Waveform),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn cracked_cells_stay_cracked(
        style in style(),
        threshold in 0.0f32..1.0,
        p1 in 0.0f32..1.0,
        delta in 0.001f32..1.0,
        rows in 1usize..12,
        cols in 1usize..80,
        row_seed in 0usize..1000,
        col_seed in 0usize..1000,
    ) {
        let (row, col) = (row_seed % rows, col_seed % cols);
        let p2 = (p1 + delta).min(1.0);
        let before = style.classify(threshold, p1, row, col, rows, cols);
        let after = style.classify(threshold, p2, row, col, rows, cols);
        if before == CellClass::Cracked {
            prop_assert_eq!(after, CellClass::Cracked);
        }
    }

    #[test]
    fn cracked_cells_never_flicker(
        style in style(),
        threshold in 0.0f32..1.0,
        progress in -0.5f32..1.5,
        rows in 1usize..12,
        cols in 1usize..80,
        row_seed in 0usize..1000,
        col_seed in 0usize..1000,
    ) {
        let (row, col) = (row_seed % rows, col_seed % cols);
        if style.classify(threshold, progress, row, col, rows, cols) == CellClass::Cracked {
            prop_assert!(!style.flickers(threshold, progress, row, col, rows, cols));
        }
    }

    #[test]
    fn endpoints_are_empty_and_full(
        style in style(),
        threshold in 0.001f32..1.0,
        rows in 1usize..12,
        cols in 1usize..80,
        row_seed in 0usize..1000,
        col_seed in 0usize..1000,
    ) {
        let (row, col) = (row_seed % rows, col_seed % cols);
        prop_assert_eq!(style.classify(threshold, 1.0, row, col, rows, cols), CellClass::Cracked);
        prop_assert_ne!(style.classify(threshold, 0.0, row, col, rows, cols), CellClass::Cracked);
    }

    #[test]
    fn packets_has_exactly_one_edge(
        progress in 0.0f32..0.999,
        rows in 1usize..10,
        cols in 1usize..40,
    ) {
        let mut edges = 0;
        for row in 0..rows {
            for col in 0..cols {
                if RevealStyle::Packets.classify(0.5, progress, row, col, rows, cols) == CellClass::Edge {
                    edges += 1;
                }
            }
        }
        prop_assert_eq!(edges, 1);
    }

    #[test]
    fn layout_stays_within_bounds(
        content_w in 1i32..2000,
        content_h in 1i32..2000,
        target_rows in 1usize..24,
    ) {
        let layout = compute_layout(content_w, content_h, target_rows, CellMetrics::default());
        prop_assert!((0.45..=1.0).contains(&layout.scale));
        prop_assert!(layout.rows >= 1 && layout.rows <= target_rows);
        prop_assert!(layout.cols >= 1);
        prop_assert!(layout.char_w >= 1 && layout.char_h >= 1);
    }
}
