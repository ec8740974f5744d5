//! Crack process state machine
//!
//! One instance per spawned crack. The host calls `update` then `draw` every
//! frame and detaches the process once `needs_removal` is set.
//!
//! ```text
//! Uninitialized -> Validating -> [Gated] -> Solving | MiniGame -> Complete
//!                       |            |                    |
//!                       +------------+--> Failed          +-> Looping -> (active stage)
//! ```

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::ProgressClock;
use super::cracker::{CrackSpec, escalated_protocol};
use super::event::CrackEvent;
use super::grid::{GridState, ensure_grid};
use super::layout::{CellMetrics, compute_layout, content_area};
use super::minigame::{ActionEdge, MiniGame};
use crate::renderer::frame::{Frame, FrameBody, build_grid, build_header};
use crate::target::Host;
use crate::{CrackFailure, HostError, Rect, Tunables};

/// Lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Spawned, not yet ticked
    Uninitialized,
    /// Checking target and port preconditions
    Validating,
    /// Waiting on the key-file check
    Gated,
    /// Passive timer running
    Solving,
    /// Interactive mini-game running
    MiniGame,
    Complete,
    Failed,
    /// Loop mode wrapped around; resumes the active stage next tick
    Looping,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Complete | Stage::Failed)
    }
}

/// Spawn flags, parsed from the cracker's arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessFlags {
    /// `--test`: one cycle, no node side effects
    pub test: bool,
    /// `--infinity`: never finish, regenerate and restart
    pub looping: bool,
}

impl ProcessFlags {
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for arg in args {
            match arg.as_ref() {
                "--test" => flags.test = true,
                "--infinity" => flags.looping = true,
                _ => {}
            }
        }
        flags
    }

    /// Test and loop runs need no connected node
    pub fn skips_validation(&self) -> bool {
        self.test || self.looping
    }
}

/// Per-frame input
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Action key currently held (the process derives the press edge)
    pub action_down: bool,
    /// Passive solve speed (CPU tier multiplier)
    pub speed_multiplier: f32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            action_down: false,
            speed_multiplier: 1.0,
        }
    }
}

/// A running crack
#[derive(Debug)]
pub struct CrackProcess {
    spec: CrackSpec,
    flags: ProcessFlags,
    stage: Stage,
    /// Protocol actually attacked; differs from `CrackSpec::protocol` after escalation
    resolved_protocol: String,
    clock: ProgressClock,
    minigame: Option<MiniGame>,
    action: ActionEdge,
    grid: Option<GridState>,
    bounds: Rect,
    header_h: i32,
    rng: Pcg32,
    failure: Option<CrackFailure>,
    events: Vec<CrackEvent>,
    needs_removal: bool,
    timer_logged: bool,
    metrics_logged: bool,
    loops: u32,
}

impl CrackProcess {
    pub fn new(spec: CrackSpec, flags: ProcessFlags, bounds: Rect, header_h: i32, seed: u64) -> Self {
        let minigame = spec.minigame_kind().map(MiniGame::new);
        Self {
            resolved_protocol: spec.protocol.clone(),
            clock: ProgressClock::new(spec.solve_time),
            spec,
            flags,
            stage: Stage::Uninitialized,
            minigame,
            action: ActionEdge::default(),
            grid: None,
            bounds,
            header_h,
            rng: Pcg32::seed_from_u64(seed),
            failure: None,
            events: Vec::new(),
            needs_removal: false,
            timer_logged: false,
            metrics_logged: false,
            loops: 0,
        }
    }

    pub fn spec(&self) -> &CrackSpec {
        &self.spec
    }

    pub fn flags(&self) -> ProcessFlags {
        self.flags
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn resolved_protocol(&self) -> &str {
        &self.resolved_protocol
    }

    pub fn failure(&self) -> Option<&CrackFailure> {
        self.failure.as_ref()
    }

    pub fn needs_removal(&self) -> bool {
        self.needs_removal
    }

    /// Completed loop cycles (loop mode only)
    pub fn loops(&self) -> u32 {
        self.loops
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Crack progress in 0..=1 (0 before the first tick)
    pub fn progress(&self) -> f32 {
        if self.stage == Stage::Uninitialized {
            0.0
        } else {
            self.clock.progress()
        }
    }

    pub fn minigame(&self) -> Option<&MiniGame> {
        self.minigame.as_ref()
    }

    pub fn grid(&self) -> Option<&GridState> {
        self.grid.as_ref()
    }

    /// Take queued events for the player's terminal
    pub fn drain_events(&mut self) -> Vec<CrackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Module was resized or moved by the host
    pub fn set_bounds(&mut self, bounds: Rect, header_h: i32) {
        self.bounds = bounds;
        self.header_h = header_h;
    }

    /// Advance one frame. No-op once the process is terminal.
    pub fn update(&mut self, dt: f32, input: &TickInput, host: &mut Host<'_>) {
        // Instant stages fall through so the first tick already advances the crack
        loop {
            match self.stage {
                Stage::Complete | Stage::Failed => return,
                Stage::Uninitialized => self.stage = Stage::Validating,
                Stage::Validating => self.validate(host),
                Stage::Gated => self.check_credential(host),
                Stage::Looping => self.stage = self.active_stage(),
                Stage::Solving => {
                    self.advance_timer(dt, input, host);
                    return;
                }
                Stage::MiniGame => {
                    self.advance_minigame(dt, input, host);
                    return;
                }
            }
        }
    }

    fn active_stage(&self) -> Stage {
        if self.minigame.is_some() {
            Stage::MiniGame
        } else {
            Stage::Solving
        }
    }

    fn enter_active_stage(&mut self) {
        if let Some(game) = self.minigame.as_mut() {
            game.init(self.bounds, self.header_h, &mut self.rng);
        }
        self.stage = self.active_stage();
    }

    fn validate(&mut self, host: &mut Host<'_>) {
        if self.flags.skips_validation() {
            log::info!(
                "{} {}",
                self.spec.display_name,
                if self.flags.looping {
                    "--infinity loop"
                } else {
                    "--test one-shot"
                }
            );
            self.enter_active_stage();
            return;
        }

        let Some(target) = self.spec.target.clone() else {
            self.fail(CrackFailure::NoTarget);
            return;
        };
        if !settle(host.target.target_exists(&target), "target_exists") {
            self.fail(CrackFailure::NoTarget);
            return;
        }

        if self.spec.uses_named_port() {
            let mut exists = settle(
                host.target.port_exists(&target, &self.resolved_protocol),
                "port_exists",
            );

            if !exists {
                if let Some(next) = escalated_protocol(&self.resolved_protocol, self.spec.tier) {
                    if settle(host.target.port_exists(&target, &next), "port_exists") {
                        log::info!(
                            "{} escalating target: {} -> {}",
                            self.spec.display_name,
                            self.resolved_protocol,
                            next
                        );
                        self.events.push(CrackEvent::Escalated {
                            from: self.resolved_protocol.clone(),
                            to: next.clone(),
                        });
                        self.resolved_protocol = next;
                        exists = true;
                    }
                }
            }

            if !exists {
                log::warn!("abort: port={} missing on {}", self.resolved_protocol, target);
                self.fail(CrackFailure::PortNotFound {
                    port: self.resolved_protocol.clone(),
                    target,
                });
                return;
            }
        }

        let port = self.spec.port(&self.resolved_protocol);
        if settle(host.target.is_port_open(&target, port), "is_port_open") {
            let port = port.to_string();
            self.fail(CrackFailure::AlreadyOpen { port });
            return;
        }

        if self.spec.is_gated() {
            self.stage = Stage::Gated;
        } else {
            self.begin_attack(&target, host);
        }
    }

    fn check_credential(&mut self, host: &mut Host<'_>) {
        if let Some(key_file) = self.spec.key_file.clone() {
            if !host.credentials.has_credential(&key_file) {
                log::warn!("abort: {} missing key file {}", self.spec.display_name, key_file);
                self.fail(CrackFailure::HandshakeFailed { key_file });
                return;
            }
        }
        // Gating only follows a successful target check
        let target = self.spec.target.clone().unwrap_or_default();
        self.begin_attack(&target, host);
    }

    fn begin_attack(&mut self, target: &str, host: &mut Host<'_>) {
        if let Err(e) = host.target.notify_hostile_action(target) {
            log::warn!("hostile action notify failed: {}", e);
        }
        self.enter_active_stage();
    }

    fn advance_timer(&mut self, dt: f32, input: &TickInput, host: &mut Host<'_>) {
        self.clock.advance(dt, input.speed_multiplier);

        if !self.timer_logged {
            self.timer_logged = true;
            log::info!(
                "timer started: {} solveTime={}s target={}",
                self.resolved_protocol,
                self.clock.solve_time(),
                self.target_text()
            );
        }

        if self.clock.is_done() {
            log::info!(
                "timer done: {} elapsed={:.1}s",
                self.resolved_protocol,
                self.clock.elapsed()
            );
            self.finish_cycle(host);
        }
    }

    fn advance_minigame(&mut self, dt: f32, input: &TickInput, host: &mut Host<'_>) {
        let pressed = self.action.sample(input.action_down);
        let Some(game) = self.minigame.as_mut() else {
            return;
        };
        game.update(dt, pressed, &mut self.rng);
        // Drawing code reads progress through the clock
        self.clock.mirror(game.progress());

        if game.is_complete() {
            log::info!(
                "mini-game done: {} target={}",
                self.resolved_protocol,
                self.target_text()
            );
            self.finish_cycle(host);
        }
    }

    /// Progress reached 1: loop, finish a test run, or open the port
    fn finish_cycle(&mut self, host: &mut Host<'_>) {
        if self.flags.looping {
            self.restart_loop();
            return;
        }

        let name = self.spec.display_name.clone();
        if self.flags.test {
            self.complete(CrackEvent::TestComplete { name });
            return;
        }

        let target = self.spec.target.clone().unwrap_or_default();
        let port = self.spec.port(&self.resolved_protocol);

        if let Err(e) = host.target.open_port(&target, port, host.caller) {
            log::warn!("openPort failed: {}", e);
        }

        // Re-read to confirm; an unconfirmed open still completes
        match host.target.is_port_open(&target, port) {
            Ok(true) => log::info!("port verify: {} isOpen=true", name),
            Ok(false) => log::info!(
                "port verify: {} isOpen=false, openPort may have failed silently",
                name
            ),
            Err(e) => log::warn!("port verify failed: {}", e),
        }

        let event = if self.spec.tier >= 3 {
            CrackEvent::HandshakeComplete { name }
        } else {
            CrackEvent::Breached { name }
        };
        self.complete(event);
    }

    fn restart_loop(&mut self) {
        self.loops += 1;
        self.clock.reset();
        if let Some(grid) = self.grid.as_ref() {
            let (cols, rows) = (grid.cols(), grid.rows());
            self.grid = Some(GridState::new(cols, rows, &mut self.rng));
        }
        if let Some(game) = self.minigame.as_mut() {
            game.init(self.bounds, self.header_h, &mut self.rng);
        }
        self.stage = Stage::Looping;
        log::debug!("{} loop {} restarted", self.spec.display_name, self.loops);
    }

    fn complete(&mut self, event: CrackEvent) {
        self.events.push(event);
        self.stage = Stage::Complete;
        self.needs_removal = true;
    }

    fn fail(&mut self, failure: CrackFailure) {
        self.events.push(CrackEvent::Failed(failure.clone()));
        self.failure = Some(failure);
        self.stage = Stage::Failed;
        self.needs_removal = true;
    }

    /// Mini-game cracks show the grid until the game is initialized
    fn shows_minigame(&self) -> bool {
        matches!(
            self.stage,
            Stage::MiniGame | Stage::Looping | Stage::Complete
        )
    }

    fn target_text(&self) -> &str {
        if self.flags.skips_validation() {
            "TEST"
        } else {
            self.spec.target.as_deref().unwrap_or("-")
        }
    }

    /// Build this frame's drawing. `dt` drives the flicker cadence.
    pub fn draw(&mut self, dt: f32, tunables: &Tunables, metrics: CellMetrics) -> Frame {
        let progress = self.progress();
        let header = build_header(&self.spec, self.target_text(), self.bounds, tunables);
        let content = content_area(self.bounds, tunables.header_h);

        let body = if content.height() <= 0 {
            FrameBody::Empty
        } else if let (Some(game), true) = (&self.minigame, self.shows_minigame()) {
            FrameBody::MiniGame(game.view())
        } else {
            if !self.metrics_logged {
                self.metrics_logged = true;
                log::info!(
                    "cell metrics: W={:.2} H={:.2}",
                    metrics.width,
                    metrics.height
                );
            }

            let layout = compute_layout(
                content.width(),
                content.height(),
                tunables.target_rows(),
                metrics,
            );
            let style = tunables.style_for(self.spec.family);
            let grid = ensure_grid(&mut self.grid, layout.cols, layout.rows, &mut self.rng);
            grid.tick_flicker(dt, style, progress, &mut self.rng);
            FrameBody::Grid(build_grid(
                grid,
                layout,
                content.origin,
                style,
                progress,
                self.spec.tier,
            ))
        };

        Frame {
            header,
            body,
            stage: self.stage,
            progress,
        }
    }
}

/// Collapse a collaborator query to a bool, logging faults as "no"
fn settle(result: Result<bool, HostError>, what: &str) -> bool {
    result.unwrap_or_else(|e| {
        log::warn!("{} failed: {}", what, e);
        false
    })
}
