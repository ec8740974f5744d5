//! Player hardware tiers
//!
//! Only the CPU tier affects cracking: it scales passive solve speed.

use serde::{Deserialize, Serialize};

/// CPU upgrade level, read from host flags `cpu_t2` / `cpu_t3` / `cpu_t4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum CpuTier {
    #[default]
    T1,
    T2,
    T3,
    T4,
}

impl CpuTier {
    /// Highest tier whose flag is present (T1 when none are)
    pub fn from_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        flags
            .into_iter()
            .filter_map(|flag| match flag.as_ref() {
                "cpu_t2" => Some(CpuTier::T2),
                "cpu_t3" => Some(CpuTier::T3),
                "cpu_t4" => Some(CpuTier::T4),
                _ => None,
            })
            .max()
            .unwrap_or_default()
    }

    pub fn number(&self) -> u8 {
        match self {
            CpuTier::T1 => 1,
            CpuTier::T2 => 2,
            CpuTier::T3 => 3,
            CpuTier::T4 => 4,
        }
    }

    /// Passive crack speed multiplier
    pub fn multiplier(&self) -> f32 {
        match self {
            CpuTier::T1 => 1.0,
            CpuTier::T2 => 1.5,
            CpuTier::T3 => 2.25,
            CpuTier::T4 => 3.0,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "t1" | "1" => Some(CpuTier::T1),
            "t2" | "2" => Some(CpuTier::T2),
            "t3" | "3" => Some(CpuTier::T3),
            "t4" | "4" => Some(CpuTier::T4),
            _ => None,
        }
    }
}
