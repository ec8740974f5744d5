//! In-memory node table with call recording and fault injection

use std::collections::BTreeMap;

use super::{PortRef, TargetHost};
use crate::HostError;

/// A recorded `open_port` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCall {
    pub target: String,
    /// Protocol name, or the port number rendered as text
    pub port: String,
    pub caller: String,
}

/// Which collaborator calls should fail
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultPlan {
    pub open_port: bool,
    pub is_port_open: bool,
    pub port_exists: bool,
    pub hostile_action: bool,
}

#[derive(Debug, Clone, Default)]
struct Node {
    /// Named ports: protocol -> open
    named: BTreeMap<String, bool>,
    /// Vanilla ports: number -> open
    numbered: BTreeMap<u16, bool>,
    hostile_actions: u32,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTarget {
    nodes: BTreeMap<String, Node>,
    open_calls: Vec<OpenCall>,
    pub faults: FaultPlan,
}

impl InMemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str) -> &mut Self {
        self.nodes.entry(id.to_string()).or_default();
        self
    }

    /// Register a closed named port (creates the node if needed)
    pub fn add_port(&mut self, id: &str, protocol: &str) -> &mut Self {
        self.nodes
            .entry(id.to_string())
            .or_default()
            .named
            .insert(protocol.to_string(), false);
        self
    }

    /// Register a closed vanilla port
    pub fn add_numbered_port(&mut self, id: &str, number: u16) -> &mut Self {
        self.nodes
            .entry(id.to_string())
            .or_default()
            .numbered
            .insert(number, false);
        self
    }

    pub fn set_open(&mut self, id: &str, port: PortRef<'_>, open: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            match port {
                PortRef::Protocol(name) => {
                    if let Some(slot) = node.named.get_mut(name) {
                        *slot = open;
                    }
                }
                PortRef::Number(n) => {
                    if let Some(slot) = node.numbered.get_mut(&n) {
                        *slot = open;
                    }
                }
            }
        }
    }

    pub fn open_calls(&self) -> &[OpenCall] {
        &self.open_calls
    }

    pub fn hostile_actions(&self, id: &str) -> u32 {
        self.nodes.get(id).map(|n| n.hostile_actions).unwrap_or(0)
    }

    /// Close every port on a node, returning how many were open
    pub fn reset_ports(&mut self, id: &str) -> usize {
        let Some(node) = self.nodes.get_mut(id) else {
            return 0;
        };
        let mut closed = 0;
        for open in node.named.values_mut().chain(node.numbered.values_mut()) {
            if *open {
                closed += 1;
            }
            *open = false;
        }
        closed
    }

    fn node(&self, id: &str) -> Result<&Node, HostError> {
        self.nodes
            .get(id)
            .ok_or_else(|| HostError::Unreachable(id.to_string()))
    }
}

impl TargetHost for InMemoryTarget {
    fn target_exists(&self, target: &str) -> Result<bool, HostError> {
        Ok(self.nodes.contains_key(target))
    }

    fn port_exists(&self, target: &str, protocol: &str) -> Result<bool, HostError> {
        if self.faults.port_exists {
            return Err(HostError::Unreachable(target.to_string()));
        }
        Ok(self.node(target)?.named.contains_key(protocol))
    }

    fn is_port_open(&self, target: &str, port: PortRef<'_>) -> Result<bool, HostError> {
        if self.faults.is_port_open {
            return Err(HostError::Unreachable(target.to_string()));
        }
        let node = self.node(target)?;
        // Absent ports read as closed
        Ok(match port {
            PortRef::Protocol(name) => node.named.get(name).copied().unwrap_or(false),
            PortRef::Number(n) => node.numbered.get(&n).copied().unwrap_or(false),
        })
    }

    fn open_port(&mut self, target: &str, port: PortRef<'_>, caller: &str) -> Result<(), HostError> {
        self.open_calls.push(OpenCall {
            target: target.to_string(),
            port: match port {
                PortRef::Protocol(name) => name.to_string(),
                PortRef::Number(n) => n.to_string(),
            },
            caller: caller.to_string(),
        });
        if self.faults.open_port {
            return Err(HostError::Rejected {
                target: target.to_string(),
                reason: "open refused".to_string(),
            });
        }
        let node = self
            .nodes
            .get_mut(target)
            .ok_or_else(|| HostError::Unreachable(target.to_string()))?;
        let slot = match port {
            PortRef::Protocol(name) => node.named.get_mut(name),
            PortRef::Number(n) => node.numbered.get_mut(&n),
        };
        match slot {
            Some(open) => {
                *open = true;
                Ok(())
            }
            None => Err(HostError::UnknownPort {
                target: target.to_string(),
                port: port.to_string(),
            }),
        }
    }

    fn notify_hostile_action(&mut self, target: &str) -> Result<(), HostError> {
        if self.faults.hostile_action {
            return Err(HostError::Unreachable(target.to_string()));
        }
        let node = self
            .nodes
            .get_mut(target)
            .ok_or_else(|| HostError::Unreachable(target.to_string()))?;
        node.hostile_actions += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_read_back() {
        let mut target = InMemoryTarget::new();
        target.add_port("10.0.0.1", "ssh_v2").add_numbered_port("10.0.0.1", 22);

        assert!(!target.is_port_open("10.0.0.1", PortRef::Protocol("ssh_v2")).unwrap());
        target
            .open_port("10.0.0.1", PortRef::Protocol("ssh_v2"), "player")
            .unwrap();
        assert!(target.is_port_open("10.0.0.1", PortRef::Protocol("ssh_v2")).unwrap());
        assert!(!target.is_port_open("10.0.0.1", PortRef::Number(22)).unwrap());
        assert_eq!(target.open_calls().len(), 1);
        assert_eq!(target.reset_ports("10.0.0.1"), 1);
    }

    #[test]
    fn test_unknown_port_is_an_error() {
        let mut target = InMemoryTarget::new();
        target.add_node("n");
        let err = target.open_port("n", PortRef::Protocol("web_v3"), "p");
        assert!(matches!(err, Err(HostError::UnknownPort { .. })));
        assert!(!target.port_exists("n", "web_v3").unwrap());
    }

    #[test]
    fn test_faults_are_injected() {
        let mut target = InMemoryTarget::new();
        target.add_port("n", "ftp_v2");
        target.faults.open_port = true;
        assert!(target.open_port("n", PortRef::Protocol("ftp_v2"), "p").is_err());
        assert_eq!(target.open_calls().len(), 1);
    }
}
