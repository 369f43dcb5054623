//! Agent identity and environment, as delivered by the infrastructure.
//!
//! Settings are read once at startup and shared read-only by every action.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level agent settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub agent_id: String,
    pub blobstore: BlobstoreSettings,
    pub disks: Disks,
    pub env: Env,
    pub networks: BTreeMap<String, Network>,
    pub ntp: Vec<String>,
    pub mbus: String,
    pub vm: Vm,
}

/// Blobstore provider selection plus provider-specific options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlobstoreSettings {
    pub provider: String,
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Disks {
    pub system: String,
    pub ephemeral: String,
    pub persistent: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Env {
    pub bosh: EnvCredentials,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnvCredentials {
    pub password: String,
}

/// One network the VM is attached to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Network {
    /// Which defaults this network provides (`"dns"`, `"gateway"`).
    pub default: Vec<String>,
    pub dns: Vec<String>,
    pub gateway: String,
    pub ip: String,
    pub netmask: String,
    pub mac: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Vm {
    pub name: String,
}

impl Settings {
    /// IP of the network that carries the default gateway.
    ///
    /// Falls back to the only network when exactly one is configured.
    #[must_use]
    pub fn default_ip(&self) -> Option<&str> {
        let gateway = self
            .networks
            .values()
            .find(|n| n.default.iter().any(|d| d == "gateway"));
        let network = match gateway {
            Some(n) => Some(n),
            None if self.networks.len() == 1 => self.networks.values().next(),
            None => None,
        };
        network.map(|n| n.ip.as_str()).filter(|ip| !ip.is_empty())
    }
}
