//! Error taxonomy
//!
//! - `CrackFailure`: precondition failures, shown to the player, end the process
//! - `HostError`: faults raised by the target-state collaborator, logged and swallowed
//! - `TunableError`: configuration faults, previous values are retained

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a crack process ended in `Failed`.
///
/// The `Display` text is the user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CrackFailure {
    #[error("no target, connect to a node first")]
    NoTarget,
    #[error("{port} not found on {target}")]
    PortNotFound { port: String, target: String },
    #[error("{port} already open")]
    AlreadyOpen { port: String },
    #[error("handshake failed, key file required: {key_file}")]
    HandshakeFailed { key_file: String },
}

/// Fault reported by the target-state collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("target {0} is unreachable")]
    Unreachable(String),
    #[error("{target} rejected the request: {reason}")]
    Rejected { target: String, reason: String },
    #[error("port {port} is not registered on {target}")]
    UnknownPort { target: String, port: String },
}

/// Live-tunable configuration could not be loaded
#[derive(Debug, Error)]
pub enum TunableError {
    #[error("tunables read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("tunables json error: {0}")]
    Json(#[from] serde_json::Error),
}
