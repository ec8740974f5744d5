//! Gatekeeper demo entry point
//!
//! Spawns one cracker against an in-memory node and runs it to completion,
//! drawing to the terminal. Mini-games are played by a simple autopilot.
//!
//! ```text
//! gatekeeper <cracker> [--test] [--infinity] [--cpu tN] [--key] [--headless] [--seed N]
//!            [--tunables FILE]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use gatekeeper::renderer::ansi;
use gatekeeper::sim::{
    CellMetrics, CrackProcess, CrackSpec, CrackerKind, MiniGameView, ProcessFlags, TickInput,
    module_height,
};
use gatekeeper::target::{Host, InMemoryTarget};
use gatekeeper::{CpuTier, LiveTunables, Rect, Tunables};

const NODE: &str = "10.0.0.7";
const PLAYER: &str = "player-pc";
const FIXED_DT: f32 = 1.0 / 30.0;
/// Simulated seconds before the demo gives up
const MAX_RUN_TIME: f32 = 120.0;
/// Loop-mode runs stop after this many cycles
const DEMO_LOOPS: u32 = 3;
const PLAYER_RAM: i32 = 1024;
const PANEL_W: i32 = 240;
const PANEL_H: i32 = 400;

struct Args {
    kind: CrackerKind,
    flags: ProcessFlags,
    cpu: CpuTier,
    key: bool,
    headless: bool,
    seed: u64,
    tunables: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let mut kind = CrackerKind::SshV2;
    let mut cpu = CpuTier::T1;
    let mut key = false;
    let mut headless = false;
    let mut seed = 0x5eed;
    let mut tunables = None;

    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--test" | "--infinity" => {}
            "--key" => key = true,
            "--headless" => headless = true,
            "--cpu" => {
                let value = iter.next().ok_or("--cpu needs a tier (t1..t4)")?;
                cpu = CpuTier::from_str(value).ok_or_else(|| format!("unknown cpu tier {}", value))?;
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a number")?;
                seed = value.parse().map_err(|_| format!("bad seed {}", value))?;
            }
            "--tunables" => {
                let value = iter.next().ok_or("--tunables needs a file path")?;
                tunables = Some(PathBuf::from(value));
            }
            name => {
                kind = CrackerKind::from_name(name).ok_or_else(|| format!("unknown cracker {}", name))?;
            }
        }
    }

    Ok(Args {
        kind,
        flags: ProcessFlags::from_args(&raw),
        cpu,
        key,
        headless,
        seed,
        tunables,
    })
}

/// Build a node carrying every port the catalog can attack
fn demo_node() -> InMemoryTarget {
    let mut target = InMemoryTarget::new();
    for kind in CrackerKind::ALL {
        let spec = CrackSpec::for_cracker(kind, None, &Tunables::default());
        target.add_port(NODE, &spec.protocol);
        target.add_numbered_port(NODE, spec.port_number);
    }
    target
}

/// File modification time as a reload revision
fn file_revision(path: &Path) -> Option<u64> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let since = modified.duration_since(UNIX_EPOCH).ok()?;
    Some(since.as_millis() as u64)
}

/// Press on the rising edge of an opportunity, releasing in between
struct Autopilot {
    was_down: bool,
}

impl Autopilot {
    fn action(&mut self, view: Option<MiniGameView>) -> bool {
        let opportunity = match view {
            Some(MiniGameView::SignalSync(v)) => v.in_zone,
            Some(MiniGameView::PacketSort(v)) => v.packets.iter().any(|p| p.is_target && p.in_band),
            Some(MiniGameView::InjectionTiming(v)) => {
                v.lines.iter().any(|l| l.is_exploit && l.in_band)
            }
            None => false,
        };
        let down = opportunity && !self.was_down;
        self.was_down = down;
        down
    }
}

fn reload_tunables(live: &mut LiveTunables, path: &Path) {
    let Some(revision) = file_revision(path) else {
        log::debug!("tunables file {} not readable", path.display());
        return;
    };
    // Errors are logged inside; the previous values stay active
    let _ = live.reload_if_changed(revision, || std::fs::read_to_string(path));
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let mut live = LiveTunables::new(Tunables::default());
    if let Some(path) = &args.tunables {
        reload_tunables(&mut live, path);
    }
    let tunables = live.current().clone();
    let spec = CrackSpec::for_cracker(args.kind, Some(NODE.to_string()), &tunables);
    let height = module_height(spec.ram_cost, PLAYER_RAM, PANEL_H);
    let bounds = Rect::new(0, 0, PANEL_W, height);
    log::info!(
        "Gatekeeper starting: {} cpu={} seed={}",
        spec.display_name,
        args.cpu.number(),
        args.seed
    );

    let mut target = demo_node();
    let mut credentials = HashSet::new();
    if args.key {
        if let Some(key_file) = &spec.key_file {
            credentials.insert(key_file.clone());
        }
    }

    let mut process = CrackProcess::new(spec, args.flags, bounds, tunables.header_h, args.seed);
    let mut autopilot = Autopilot { was_down: false };
    let metrics = CellMetrics::default();
    let mut sim_time = 0.0;

    while !process.needs_removal() && sim_time < MAX_RUN_TIME && process.loops() < DEMO_LOOPS {
        let input = TickInput {
            action_down: autopilot.action(process.minigame().map(|g| g.view())),
            speed_multiplier: args.cpu.multiplier(),
        };
        {
            let mut host = Host::new(&mut target, &credentials, PLAYER);
            process.update(FIXED_DT, &input, &mut host);
        }
        for event in process.drain_events() {
            println!("{}", event);
        }

        if let Some(path) = &args.tunables {
            if live.poll(FIXED_DT) {
                reload_tunables(&mut live, path);
                process.set_bounds(bounds, live.current().header_h);
            }
        }
        let frame = process.draw(FIXED_DT, live.current(), metrics);
        if !args.headless {
            print!("\x1b[H\x1b[2J{}", ansi::render(&frame));
            std::thread::sleep(Duration::from_secs_f32(FIXED_DT));
        }
        sim_time += FIXED_DT;
    }

    log::info!(
        "Gatekeeper finished: stage={:?} t={:.1}s opens={}",
        process.stage(),
        sim_time,
        target.open_calls().len()
    );
}
