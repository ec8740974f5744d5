//! Truecolor terminal rendering of a `Frame`
//!
//! One text row per grid row. Mini-games are drawn as a compact status
//! block since pixel positions have no terminal equivalent.

use std::fmt::Write;

use super::frame::{Frame, FrameBody, GridFrame, Header};
use super::palette::Rgb;
use crate::sim::injection::InjectionView;
use crate::sim::minigame::{Flash, MiniGameView};
use crate::sim::packet_sort::PacketSortView;
use crate::sim::signal_sync::SignalSyncView;

const RESET: &str = "\x1b[0m";
/// Text columns used for mini-game tracks
const TRACK_COLS: i32 = 40;

fn fg(out: &mut String, c: Rgb) {
    let _ = write!(out, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b);
}

fn bg(out: &mut String, c: Rgb) {
    let _ = write!(out, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b);
}

fn flash_color(flash: Option<Flash>) -> Option<Rgb> {
    flash.map(|f| match f {
        Flash::Good => Rgb::new(0, 220, 90),
        Flash::Bad => Rgb::new(220, 40, 40),
    })
}

/// Render a full frame as ANSI text
pub fn render(frame: &Frame) -> String {
    let mut out = String::new();
    render_header(&mut out, &frame.header, frame.progress);
    match &frame.body {
        FrameBody::Empty => {}
        FrameBody::Grid(grid) => render_grid(&mut out, grid),
        FrameBody::MiniGame(view) => match view {
            MiniGameView::SignalSync(v) => render_signal_sync(&mut out, v),
            MiniGameView::PacketSort(v) => render_packet_sort(&mut out, v),
            MiniGameView::InjectionTiming(v) => render_injection(&mut out, v),
        },
    }
    out
}

fn render_header(out: &mut String, header: &Header, progress: f32) {
    bg(out, header.background);
    fg(out, header.label_color);
    out.push_str(&header.label);
    if header.keyed {
        out.push_str(" [KEY]");
    }
    let _ = write!(out, "  {}  {:>3.0}%", header.target, progress * 100.0);
    out.push_str(RESET);
    out.push('\n');
}

fn render_grid(out: &mut String, grid: &GridFrame) {
    for row in 0..grid.layout.rows {
        for col in 0..grid.layout.cols {
            if let Some(cell) = grid.cell(row, col) {
                fg(out, cell.color);
                out.push(cell.symbol);
            }
        }
        out.push_str(RESET);
        out.push('\n');
    }
}

/// Map a pixel x inside `[left, left + width)` to a text column
fn to_col(x: i32, left: i32, width: i32) -> usize {
    if width <= 0 {
        return 0;
    }
    (((x - left) * TRACK_COLS) / width).clamp(0, TRACK_COLS - 1) as usize
}

fn render_signal_sync(out: &mut String, view: &SignalSyncView) {
    let track = view.track;
    let zone_l = to_col(view.zone.x(), track.x(), track.width());
    let zone_r = to_col(view.zone.x() + view.zone.width(), track.x(), track.width());
    let dot = to_col(view.indicator_x, track.x(), track.width());

    let mut line: Vec<char> = (0..TRACK_COLS as usize)
        .map(|i| if (zone_l..=zone_r).contains(&i) { '=' } else { '-' })
        .collect();
    line[dot] = if view.in_zone { '#' } else { 'o' };

    if let Some(c) = flash_color(view.flash) {
        fg(out, c);
    }
    let _ = writeln!(
        out,
        "[{}]{} SYNC {}/{}",
        line.into_iter().collect::<String>(),
        RESET,
        view.synced,
        view.total
    );
}

fn render_packet_sort(out: &mut String, view: &PacketSortView) {
    if let Some(c) = flash_color(view.flash) {
        fg(out, c);
    }
    let _ = writeln!(out, "CATCH {}  {}/{}{}", view.target, view.caught, view.needed, RESET);
    for packet in &view.packets {
        let marker = if packet.in_band { '>' } else { ' ' };
        let _ = writeln!(out, "{} {:>4} {}", marker, packet.y, packet.label);
    }
}

fn render_injection(out: &mut String, view: &InjectionView) {
    for line in &view.lines {
        if line.is_exploit {
            fg(out, Rgb::new(255, 80, 80));
        }
        let marker = if line.in_band { '>' } else { ' ' };
        let _ = writeln!(out, "{} {}{}", marker, line.text, RESET);
    }
    if let Some(c) = flash_color(view.flash) {
        fg(out, c);
    }
    let _ = writeln!(
        out,
        "INJECT {}/{}  miss {}{}",
        view.hits, view.total, view.misses, RESET
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cracker::{CrackSpec, CrackerKind};
    use crate::sim::layout::CellMetrics;
    use crate::sim::process::{CrackProcess, ProcessFlags};
    use crate::{Rect, Tunables};

    #[test]
    fn test_grid_frame_renders_one_line_per_row() {
        let tunables = Tunables::default();
        let spec = CrackSpec::for_cracker(CrackerKind::SshV2, None, &tunables);
        let mut process = CrackProcess::new(spec, ProcessFlags::default(), Rect::new(0, 0, 200, 100), 28, 1);
        let frame = process.draw(0.016, &tunables, CellMetrics::default());

        let text = render(&frame);
        let FrameBody::Grid(grid) = &frame.body else {
            panic!("expected grid body");
        };
        assert_eq!(text.lines().count(), 1 + grid.layout.rows);
        assert!(text.starts_with("\x1b[48;2;18;18;30m"));
        assert!(text.contains("SSHcrack"));
    }

    #[test]
    fn test_column_mapping_clamps() {
        assert_eq!(to_col(-5, 0, 100), 0);
        assert_eq!(to_col(500, 0, 100), (TRACK_COLS - 1) as usize);
        assert_eq!(to_col(50, 0, 100), 20);
        assert_eq!(to_col(3, 0, 0), 0);
    }
}
