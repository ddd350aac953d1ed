//! Hosted GKE cluster creation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::RancherApi;
use crate::clusters::{ClusterFeatureFlags, ManagementCluster};
use crate::config::TestConfig;
use crate::error::{Result, ignore_not_found};

/// Config section holding the GKE cluster template.
pub const GKE_CLUSTER_CONFIG_KEY: &str = "gkeClusterConfig";

const DOCKER_ROOT_DIR: &str = "/var/lib/docker";

/// GKE cluster template (`gkeConfig` of a management cluster).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkeClusterConfig {
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub description: String,
    /// Cloud credential secret, filled in from the credential ID.
    #[serde(default)]
    pub google_credential_secret: String,
    #[serde(default)]
    pub imported: bool,

    #[serde(rename = "projectID", default)]
    pub project_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,
    #[serde(default)]
    pub enable_kubernetes_alpha: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnetwork: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_policy_enabled: Option<bool>,
    #[serde(rename = "clusterIpv4Cidr", default, skip_serializing_if = "Option::is_none")]
    pub cluster_ipv4_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_allocation_policy: Option<GkeIpAllocationPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_cluster_config: Option<GkePrivateClusterConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_authorized_networks: Option<GkeMasterAuthorizedNetworks>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_addons: Option<GkeClusterAddons>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub node_pools: Vec<GkeNodePool>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkeIpAllocationPolicy {
    #[serde(default)]
    pub use_ip_aliases: bool,
    #[serde(default)]
    pub create_subnetwork: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnetwork_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_ipv4_cidr_block: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_secondary_range_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub node_ipv4_cidr_block: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub services_ipv4_cidr_block: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub services_secondary_range_name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkePrivateClusterConfig {
    #[serde(default)]
    pub enable_private_endpoint: bool,
    #[serde(default)]
    pub enable_private_nodes: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub master_ipv4_cidr_block: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkeMasterAuthorizedNetworks {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub cidr_blocks: Vec<GkeCidrBlock>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkeCidrBlock {
    pub cidr_block: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkeClusterAddons {
    #[serde(default)]
    pub horizontal_pod_autoscaling: bool,
    #[serde(default)]
    pub http_load_balancing: bool,
    #[serde(default)]
    pub network_policy_config: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkeNodePool {
    pub name: String,
    pub initial_node_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pods_constraint: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<GkeNodePoolAutoscaling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GkeNodeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management: Option<GkeNodePoolManagement>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkeNodePoolAutoscaling {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub min_node_count: u32,
    #[serde(default)]
    pub max_node_count: u32,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkeNodeConfig {
    #[serde(default)]
    pub disk_size_gb: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub disk_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub machine_type: String,
    #[serde(default)]
    pub local_ssd_count: u32,
    #[serde(default)]
    pub preemptible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oauth_scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GkeNodePoolManagement {
    #[serde(default)]
    pub auto_repair: bool,
    #[serde(default)]
    pub auto_upgrade: bool,
}

impl GkeClusterConfig {
    /// Load the template from the `gkeClusterConfig` section.
    pub fn from_test_config(config: &TestConfig) -> Result<Self> {
        config.section(GKE_CLUSTER_CONFIG_KEY)
    }

    /// Template for a new cluster owned by Rancher.
    pub fn for_cluster(&self, cluster_name: &str, cloud_credential_id: &str) -> Self {
        Self {
            cluster_name: cluster_name.to_string(),
            google_credential_secret: cloud_credential_id.to_string(),
            imported: false,
            ..self.clone()
        }
    }
}

/// Create a hosted GKE cluster from `template`.
///
/// Returns the cluster object as stored by Rancher. Provisioning continues
/// asynchronously on the server and is not waited for. Deletion of the
/// created cluster is registered with the session.
pub async fn create_gke_hosted_cluster(
    client: &dyn RancherApi,
    template: &GkeClusterConfig,
    display_name: &str,
    cloud_credential_id: &str,
    flags: ClusterFeatureFlags,
    labels: BTreeMap<String, String>,
) -> Result<ManagementCluster> {
    let cluster = ManagementCluster {
        name: display_name.to_string(),
        docker_root_dir: DOCKER_ROOT_DIR.to_string(),
        gke_config: Some(template.for_cluster(display_name, cloud_credential_id)),
        labels,
        ..Default::default()
    }
    .with_feature_flags(flags);

    let management = client.management();
    let created = management.create_cluster(&cluster).await?;
    info!(cluster = %display_name, "Requested hosted GKE cluster");

    match created.id.clone() {
        Some(id) => client.session().register_cleanup(move || async move {
            ignore_not_found(management.delete_cluster(&id).await)?;
            Ok(())
        }),
        None => warn!(cluster = %display_name, "Created cluster has no ID, it will not be cleaned up"),
    }
    Ok(created)
}
