//! Cracker catalog and the immutable per-process `CrackSpec`
//!
//! Tier is encoded in the protocol name (`ssh_v2`, `ssh_v3`), not the port
//! number: every tier of a family shares the vanilla port (22/21/80).

use serde::{Deserialize, Serialize};

use super::minigame::MiniGameKind;
use crate::Tunables;
use crate::consts::{ESCALATION_TIER, NAMED_PORT_TIER};
use crate::target::PortRef;

/// Protocol family; selects the reveal style bucket and the mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Ssh,
    Ftp,
    Web,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Ssh => "ssh",
            Family::Ftp => "ftp",
            Family::Web => "web",
        }
    }

    /// Vanilla port number shared by every tier of the family
    pub fn port_number(&self) -> u16 {
        match self {
            Family::Ssh => 22,
            Family::Ftp => 21,
            Family::Web => 80,
        }
    }
}

/// The registered crackers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrackerKind {
    SshV2,
    FtpV2,
    WebV2,
    SshV3,
    FtpV3,
    WebV3,
}

impl CrackerKind {
    pub const ALL: [CrackerKind; 6] = [
        CrackerKind::SshV2,
        CrackerKind::FtpV2,
        CrackerKind::WebV2,
        CrackerKind::SshV3,
        CrackerKind::FtpV3,
        CrackerKind::WebV3,
    ];

    pub fn family(&self) -> Family {
        match self {
            CrackerKind::SshV2 | CrackerKind::SshV3 => Family::Ssh,
            CrackerKind::FtpV2 | CrackerKind::FtpV3 => Family::Ftp,
            CrackerKind::WebV2 | CrackerKind::WebV3 => Family::Web,
        }
    }

    pub fn tier(&self) -> u8 {
        match self {
            CrackerKind::SshV2 | CrackerKind::FtpV2 | CrackerKind::WebV2 => 2,
            CrackerKind::SshV3 | CrackerKind::FtpV3 | CrackerKind::WebV3 => 3,
        }
    }

    /// Name shown in the RAM panel
    pub fn display_name(&self) -> &'static str {
        match self {
            CrackerKind::SshV2 => "SSHcrack_v2",
            CrackerKind::FtpV2 => "FTPBounce_v2",
            CrackerKind::WebV2 => "WebServerWorm_v2",
            CrackerKind::SshV3 => "SSHcrack_v3",
            CrackerKind::FtpV3 => "FTPBounce_v3",
            CrackerKind::WebV3 => "WebServerWorm_v3",
        }
    }

    /// Whether this cracker needs a key file in the player's home
    pub fn is_gated(&self) -> bool {
        self.tier() >= 3
    }

    /// Look up by display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(name))
    }
}

/// Base solve time in seconds for a tier
pub fn base_solve_time(tier: u8) -> f32 {
    match tier {
        0 | 1 => 0.0,
        2 => 10.0,
        _ => 15.0,
    }
}

/// Protocol name for a family at a tier, e.g. `ftp_v3`
pub fn protocol_name(family: Family, tier: u8) -> String {
    format!("{}_v{}", family.as_str(), tier)
}

/// Key file gating a family at a tier, e.g. `ssh_v3_key.dat`
pub fn key_file_name(family: Family, tier: u8) -> String {
    format!("{}_key.dat", protocol_name(family, tier))
}

/// Next-tier protocol to try when the native one is absent.
///
/// Only the escalation tier escalates, and only one step.
pub fn escalated_protocol(protocol: &str, tier: u8) -> Option<String> {
    if tier != ESCALATION_TIER {
        return None;
    }
    let suffix = format!("_v{}", tier);
    protocol
        .strip_suffix(&suffix)
        .map(|stem| format!("{}_v{}", stem, tier + 1))
}

/// Immutable description of one crack, fixed at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackSpec {
    /// Node the crack runs against (None when not connected)
    pub target: Option<String>,
    pub tier: u8,
    /// Protocol name used for tier >= 2
    pub protocol: String,
    /// Port number used for tier 1
    pub port_number: u16,
    pub display_name: String,
    pub family: Family,
    /// Required key file (None = ungated)
    pub key_file: Option<String>,
    /// Seconds to solve at 1.0x speed
    pub solve_time: f32,
    /// RAM cost at spawn time
    pub ram_cost: i32,
}

impl CrackSpec {
    /// Catalog entry aimed at `target`
    pub fn for_cracker(kind: CrackerKind, target: Option<String>, tunables: &Tunables) -> Self {
        let family = kind.family();
        let tier = kind.tier();
        Self {
            target,
            tier,
            protocol: protocol_name(family, tier),
            port_number: family.port_number(),
            display_name: kind.display_name().to_string(),
            family,
            key_file: kind.is_gated().then(|| key_file_name(family, tier)),
            solve_time: base_solve_time(tier),
            ram_cost: tunables.ram_cost(tier),
        }
    }

    pub fn is_gated(&self) -> bool {
        self.key_file.is_some()
    }

    /// Gated specs replace the passive timer with their family's mini-game
    pub fn minigame_kind(&self) -> Option<MiniGameKind> {
        self.is_gated()
            .then(|| MiniGameKind::for_family(self.family))
    }

    /// Whether ports are addressed by protocol name rather than number
    pub fn uses_named_port(&self) -> bool {
        self.tier >= NAMED_PORT_TIER
    }

    /// Port reference for a resolved protocol name
    pub fn port<'a>(&self, resolved_protocol: &'a str) -> PortRef<'a> {
        if self.uses_named_port() {
            PortRef::Protocol(resolved_protocol)
        } else {
            PortRef::Number(self.port_number)
        }
    }
}
