//! Collaborator seams: target node state and the player's credentials
//!
//! The crack engine never owns node state. Hosts implement these traits;
//! `InMemoryTarget` is a self-contained implementation for demos and tests.

mod memory;

pub use memory::{FaultPlan, InMemoryTarget, OpenCall};

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::HostError;

/// How a port is addressed on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRef<'a> {
    /// Named protocol port (tier >= 2), e.g. `ssh_v3`
    Protocol(&'a str),
    /// Vanilla numeric port (tier 1)
    Number(u16),
}

impl fmt::Display for PortRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRef::Protocol(name) => f.write_str(name),
            PortRef::Number(n) => write!(f, "port {}", n),
        }
    }
}

/// Node state owned by the host.
///
/// Any method may fail; the engine logs the fault and treats it as
/// "did not succeed".
pub trait TargetHost {
    fn target_exists(&self, target: &str) -> Result<bool, HostError>;

    /// Whether the node carries a port with this protocol name (open or not)
    fn port_exists(&self, target: &str, protocol: &str) -> Result<bool, HostError>;

    fn is_port_open(&self, target: &str, port: PortRef<'_>) -> Result<bool, HostError>;

    fn open_port(&mut self, target: &str, port: PortRef<'_>, caller: &str) -> Result<(), HostError>;

    /// Tell the node it is under attack (starts trace, alerts admins, ...)
    fn notify_hostile_action(&mut self, target: &str) -> Result<(), HostError>;
}

/// Key files available to the player
pub trait CredentialStore {
    fn has_credential(&self, file_name: &str) -> bool;
}

impl CredentialStore for HashSet<String> {
    fn has_credential(&self, file_name: &str) -> bool {
        self.contains(file_name)
    }
}

impl CredentialStore for BTreeSet<String> {
    fn has_credential(&self, file_name: &str) -> bool {
        self.contains(file_name)
    }
}

/// Everything a crack process talks to during `update`
pub struct Host<'a> {
    pub target: &'a mut dyn TargetHost,
    pub credentials: &'a dyn CredentialStore,
    /// Identifier of the attacking machine, passed to `open_port`
    pub caller: &'a str,
}

impl<'a> Host<'a> {
    pub fn new(
        target: &'a mut dyn TargetHost,
        credentials: &'a dyn CredentialStore,
        caller: &'a str,
    ) -> Self {
        Self {
            target,
            credentials,
            caller,
        }
    }
}
