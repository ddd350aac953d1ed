//! Externally provisioned nodes for bring-your-own-node cluster tests.
//!
//! Nodes either come from a cloud creator supplied by the caller or from a
//! static inventory in the `externalNodes` config section. See
//! [`ExternalNodeProvider::setup`].

pub mod providers;

pub use providers::{
    CONFIG_NODE_PROVIDER, EC2_NODE_PROVIDER, ExternalNodeProvider, NodeProviderKind,
    NodeProviderSources, StaticNodeCreator,
};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Config section holding the static node inventory.
pub const EXTERNAL_NODE_CONFIG_KEY: &str = "externalNodes";

/// A machine that can be registered into a custom cluster.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Node {
    #[serde(rename = "nodeID")]
    pub node_id: String,
    #[serde(rename = "publicIPAddress")]
    pub public_ip_address: String,
    #[serde(rename = "privateIPAddress", default)]
    pub private_ip_address: String,
    #[serde(rename = "sshUser")]
    pub ssh_user: String,
    #[serde(rename = "sshKeyName")]
    pub ssh_key_name: String,
    /// Private key contents, attached after loading.
    #[serde(skip)]
    pub ssh_key: Vec<u8>,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("node_id", &self.node_id)
            .field("public_ip_address", &self.public_ip_address)
            .field("private_ip_address", &self.private_ip_address)
            .field("ssh_user", &self.ssh_user)
            .field("ssh_key_name", &self.ssh_key_name)
            .field("ssh_key", &format_args!("<{} bytes>", self.ssh_key.len()))
            .finish()
    }
}

/// The `externalNodes` section: node lists keyed by how many nodes they hold.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalNodeConfig {
    #[serde(default)]
    pub nodes: BTreeMap<usize, Vec<Node>>,

    /// Directory holding the private keys. Defaults to `$HOME/.ssh`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_dir: Option<PathBuf>,
}

impl ExternalNodeConfig {
    /// Directory private keys are read from.
    pub fn key_dir(&self) -> Result<PathBuf> {
        match &self.ssh_key_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_ssh_key_dir(),
        }
    }
}

/// Creates nodes on demand.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NodeCreator: Send + Sync {
    async fn create_nodes(&self, count: usize) -> Result<Vec<Node>>;
}

/// `$HOME/.ssh`.
pub fn default_ssh_key_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".ssh"))
        .ok_or_else(|| Error::Config("HOME is not set; configure sshKeyDir".to_string()))
}

/// Read the private key `name` from `dir`.
pub async fn read_ssh_key(dir: &Path, name: &str) -> Result<Vec<u8>> {
    let path = dir.join(name);
    tokio::fs::read(&path)
        .await
        .map_err(|e| Error::io(path.display(), e))
}
