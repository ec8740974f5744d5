//! Events emitted by a crack process.
//! The host drains these into the player's terminal and its own logs.

use std::fmt;

use crate::CrackFailure;

#[derive(Debug, Clone, PartialEq)]
pub enum CrackEvent {
    /// Native port absent; retrying against the next tier's protocol
    Escalated { from: String, to: String },
    /// Precondition failed; the process is finished
    Failed(CrackFailure),
    /// One-shot test run finished without touching any node
    TestComplete { name: String },
    /// Tier < 3 crack finished
    Breached { name: String },
    /// Tier >= 3 crack finished
    HandshakeComplete { name: String },
}

impl CrackEvent {
    /// Whether this event ends the process
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CrackEvent::Escalated { .. })
    }
}

impl fmt::Display for CrackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrackEvent::Escalated { from, to } => {
                write!(f, "{} absent, attempting {} (buffs recommended)", from, to)
            }
            CrackEvent::Failed(failure) => write!(f, "ERROR: {}", failure),
            CrackEvent::TestComplete { name } => write!(f, "{} test complete", name),
            CrackEvent::Breached { name } => write!(f, "{} breached", name),
            CrackEvent::HandshakeComplete { name } => write!(f, "{} handshake complete", name),
        }
    }
}
