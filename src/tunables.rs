//! Live-tunable layout and style parameters
//!
//! Accepted formats:
//! - line-oriented `key = value` text (`#` comments, case-insensitive keys)
//! - JSON with camelCase keys, as persisted by settings panels
//!
//! Every field is validated on its own: unknown keys and malformed numbers are
//! skipped, string values are lower-cased, integers are clamped to a floor.

use serde::{Deserialize, Serialize};

use crate::TunableError;
use crate::consts::TUNABLES_POLL_INTERVAL;
use crate::sim::{Family, RevealStyle};

/// Smallest header that still fits the module label
pub const MIN_HEADER_H: i32 = 16;

/// Layout and style parameters read by every crack process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tunables {
    /// Pixels below the module top where content starts
    pub header_h: i32,
    /// Rows the grid tries to show
    pub target_rows: i32,
    /// RAM cost of tier-2 crackers (module height is proportional)
    pub ram_cost_v2: i32,
    /// RAM cost of tier-3 crackers
    pub ram_cost_v3: i32,
    /// Accent bar height at the bottom of the header
    pub accent_h: i32,
    /// Header text baseline sits this far above the header bottom
    pub label_offset: i32,
    /// Reveal style per cracker family ("matrix" | "packets" | "waveform")
    pub ssh_style: String,
    pub ftp_style: String,
    pub web_style: String,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            header_h: 28,
            target_rows: 6,
            ram_cost_v2: 256,
            ram_cost_v3: 384,
            accent_h: 3,
            label_offset: 11,
            ssh_style: "matrix".to_string(),
            ftp_style: "packets".to_string(),
            web_style: "matrix".to_string(),
        }
    }
}

impl Tunables {
    /// Apply a single `key = value` line. Returns true if a field changed.
    pub fn apply_line(&mut self, raw: &str) -> bool {
        let line = raw.trim();
        if line.starts_with('#') {
            return false;
        }
        let Some((key, value)) = line.split_once('=') else {
            return false;
        };
        self.apply_field(key, value)
    }

    /// Set one field from its textual value. Keys are case-insensitive.
    fn apply_field(&mut self, key: &str, value: &str) -> bool {
        let key = key.trim().to_lowercase();
        let value = value.trim();

        // String values first
        let style = match key.as_str() {
            "sshstyle" => Some(&mut self.ssh_style),
            "ftpstyle" => Some(&mut self.ftp_style),
            "webstyle" => Some(&mut self.web_style),
            _ => None,
        };
        if let Some(slot) = style {
            *slot = value.to_lowercase();
            return true;
        }

        let Ok(v) = value.parse::<i32>() else {
            return false;
        };
        let (slot, floor) = match key.as_str() {
            "headerh" => (&mut self.header_h, MIN_HEADER_H),
            "targetrows" => (&mut self.target_rows, 1),
            "ramcostv2" => (&mut self.ram_cost_v2, 1),
            "ramcostv3" => (&mut self.ram_cost_v3, 1),
            "accenth" => (&mut self.accent_h, 1),
            "labeloffset" => (&mut self.label_offset, 1),
            _ => return false,
        };
        *slot = v.max(floor);
        true
    }

    /// Apply every line of a `key = value` document, returning how many applied
    pub fn apply_text(&mut self, text: &str) -> usize {
        text.lines().filter(|line| self.apply_line(line)).count()
    }

    /// Apply a JSON object key by key, returning how many applied.
    ///
    /// Only a document that is not a JSON object is an error; bad fields are
    /// skipped and absent keys keep their current values.
    pub fn apply_json(&mut self, json: &str) -> Result<usize, TunableError> {
        let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut applied = 0;
        for (key, value) in &fields {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => {
                    log::debug!("tunables: skipping {} (unsupported value)", key);
                    continue;
                }
            };
            if self.apply_field(key, &text) {
                applied += 1;
            } else {
                log::debug!("tunables: ignored {} = {}", key, text);
            }
        }
        Ok(applied)
    }

    /// Defaults overlaid with a JSON document
    pub fn from_json(json: &str) -> Result<Self, TunableError> {
        let mut tunables = Self::default();
        tunables.apply_json(json)?;
        Ok(tunables)
    }

    /// Clamp integers to their floors and lower-case style names
    pub fn sanitized(mut self) -> Self {
        self.header_h = self.header_h.max(MIN_HEADER_H);
        self.target_rows = self.target_rows.max(1);
        self.ram_cost_v2 = self.ram_cost_v2.max(1);
        self.ram_cost_v3 = self.ram_cost_v3.max(1);
        self.accent_h = self.accent_h.max(1);
        self.label_offset = self.label_offset.max(1);
        self.ssh_style = self.ssh_style.to_lowercase();
        self.ftp_style = self.ftp_style.to_lowercase();
        self.web_style = self.web_style.to_lowercase();
        self
    }

    /// Reveal style configured for a cracker family (unknown names fall back to matrix)
    pub fn style_for(&self, family: Family) -> RevealStyle {
        let name = match family {
            Family::Ssh => &self.ssh_style,
            Family::Ftp => &self.ftp_style,
            Family::Web => &self.web_style,
        };
        RevealStyle::from_str(name).unwrap_or_default()
    }

    /// RAM cost for a cracker tier
    pub fn ram_cost(&self, tier: u8) -> i32 {
        if tier >= 3 {
            self.ram_cost_v3
        } else {
            self.ram_cost_v2
        }
    }

    /// Target row count as a grid dimension
    pub fn target_rows(&self) -> usize {
        self.target_rows.max(1) as usize
    }

    fn summary(&self) -> String {
        format!(
            "headerH={} accentH={} labelOffset={} rows={} ramV2={} ramV3={} ssh={} ftp={} web={}",
            self.header_h,
            self.accent_h,
            self.label_offset,
            self.target_rows,
            self.ram_cost_v2,
            self.ram_cost_v3,
            self.ssh_style,
            self.ftp_style,
            self.web_style
        )
    }
}

/// Current tunables plus reload bookkeeping.
///
/// The host decides where the document lives and what its revision is
/// (e.g. a file's modification time); this type never touches a clock.
#[derive(Debug, Clone, Default)]
pub struct LiveTunables {
    current: Tunables,
    last_revision: Option<u64>,
    poll_acc: f32,
}

impl LiveTunables {
    pub fn new(initial: Tunables) -> Self {
        Self {
            current: initial.sanitized(),
            last_revision: None,
            poll_acc: 0.0,
        }
    }

    pub fn current(&self) -> &Tunables {
        &self.current
    }

    /// Accumulate frame time; true at most once per poll interval
    pub fn poll(&mut self, dt: f32) -> bool {
        self.poll_acc += dt;
        if self.poll_acc < TUNABLES_POLL_INTERVAL {
            return false;
        }
        self.poll_acc = 0.0;
        true
    }

    /// Re-read the document if `revision` is newer than the last one seen.
    ///
    /// Returns `Ok(true)` when values were reloaded. On a read or parse
    /// error the previous values are kept and the error is returned; the
    /// revision is still recorded so a broken document is not retried until
    /// it changes again.
    pub fn reload_if_changed<F>(&mut self, revision: u64, read: F) -> Result<bool, TunableError>
    where
        F: FnOnce() -> std::io::Result<String>,
    {
        if self.last_revision.is_some_and(|last| revision <= last) {
            return Ok(false);
        }
        self.last_revision = Some(revision);

        let text = read().inspect_err(|e| log::warn!("tunables read error: {}", e))?;

        let mut next = self.current.clone();
        if text.trim_start().starts_with('{') {
            next.apply_json(&text).inspect_err(|e| log::warn!("{}", e))?;
        } else {
            next.apply_text(&text);
        }

        self.current = next;
        log::info!("tunables reloaded: {}", self.current.summary());
        Ok(true)
    }
}
