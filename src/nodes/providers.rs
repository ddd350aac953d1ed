//! Selection of the external node provider by name.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::TestConfig;
use crate::error::{Error, Result};
use crate::nodes::{EXTERNAL_NODE_CONFIG_KEY, ExternalNodeConfig, Node, NodeCreator, read_ssh_key};

/// Provider name for cloud VMs created through EC2.
pub const EC2_NODE_PROVIDER: &str = "ec2";

/// Provider name for the static `externalNodes` inventory.
pub const CONFIG_NODE_PROVIDER: &str = "config";

/// Known external node providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeProviderKind {
    Ec2,
    Config,
}

impl NodeProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeProviderKind::Ec2 => EC2_NODE_PROVIDER,
            NodeProviderKind::Config => CONFIG_NODE_PROVIDER,
        }
    }
}

impl fmt::Display for NodeProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            EC2_NODE_PROVIDER => Ok(NodeProviderKind::Ec2),
            CONFIG_NODE_PROVIDER => Ok(NodeProviderKind::Config),
            other => Err(Error::UnknownNodeProvider(other.to_string())),
        }
    }
}

/// What a provider may draw its nodes from.
#[derive(Clone)]
pub struct NodeProviderSources {
    /// Cloud node creator, required for `ec2`.
    pub cloud: Option<Arc<dyn NodeCreator>>,
    /// Test configuration, read by `config`.
    pub config: Arc<TestConfig>,
}

impl NodeProviderSources {
    pub fn new(config: Arc<TestConfig>) -> Self {
        Self {
            cloud: None,
            config,
        }
    }

    pub fn with_cloud(mut self, creator: Arc<dyn NodeCreator>) -> Self {
        self.cloud = Some(creator);
        self
    }
}

/// A named node creator chosen by [`ExternalNodeProvider::setup`].
#[derive(Clone)]
pub struct ExternalNodeProvider {
    pub name: String,
    pub creator: Arc<dyn NodeCreator>,
}

impl fmt::Debug for ExternalNodeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalNodeProvider")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ExternalNodeProvider {
    /// Pick the node provider named `kind`.
    ///
    /// An unknown name is an [`Error::UnknownNodeProvider`]; test setup
    /// should abort on it.
    pub fn setup(kind: &str, sources: &NodeProviderSources) -> Result<Self> {
        let parsed: NodeProviderKind = kind.parse()?;
        let creator: Arc<dyn NodeCreator> = match parsed {
            NodeProviderKind::Ec2 => sources.cloud.clone().ok_or_else(|| {
                Error::Config(format!(
                    "node provider {} requires a cloud node creator",
                    EC2_NODE_PROVIDER
                ))
            })?,
            NodeProviderKind::Config => {
                Arc::new(StaticNodeCreator::new(Arc::clone(&sources.config)))
            }
        };

        debug!(provider = %parsed, "Selected external node provider");
        Ok(Self {
            name: parsed.as_str().to_string(),
            creator,
        })
    }

    pub async fn create_nodes(&self, count: usize) -> Result<Vec<Node>> {
        self.creator.create_nodes(count).await
    }
}

/// Serves nodes from the `externalNodes` inventory.
///
/// The section is read on every call, and each node gets the private key
/// named by its `sshKeyName` attached.
pub struct StaticNodeCreator {
    config: Arc<TestConfig>,
}

impl StaticNodeCreator {
    pub fn new(config: Arc<TestConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl NodeCreator for StaticNodeCreator {
    async fn create_nodes(&self, count: usize) -> Result<Vec<Node>> {
        let mut inventory: ExternalNodeConfig = self.config.section(EXTERNAL_NODE_CONFIG_KEY)?;
        let key_dir = inventory.key_dir()?;

        let mut nodes = inventory.nodes.remove(&count).ok_or_else(|| {
            Error::NodeInventory(format!("no node list configured for {} node(s)", count))
        })?;

        for node in &mut nodes {
            node.ssh_key = read_ssh_key(&key_dir, &node.ssh_key_name).await?;
        }

        info!(count, nodes = nodes.len(), "Loaded nodes from configuration");
        Ok(nodes)
    }
}
