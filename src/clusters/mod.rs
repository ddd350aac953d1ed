//! Cluster objects of the Rancher management API.

pub mod gke;

pub use gke::{GKE_CLUSTER_CONFIG_KEY, GkeClusterConfig, create_gke_hosted_cluster};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `management.cattle.io/v3` Cluster as exchanged with `/v3/clusters`.
///
/// Only the fields the helpers set or read back are modeled; anything else in
/// the response is ignored.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManagementCluster {
    pub name: String,

    /// Assigned by Rancher (for example `c-abc12`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub docker_root_dir: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gke_config: Option<GkeClusterConfig>,

    #[serde(default)]
    pub enable_cluster_alerting: bool,

    #[serde(default)]
    pub enable_cluster_monitoring: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_network_policy: Option<bool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    // Field name as spelled by the Rancher API.
    #[serde(default)]
    pub windows_prefered_cluster: bool,
}

/// Cluster-level feature toggles set at creation time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClusterFeatureFlags {
    pub enable_cluster_alerting: bool,
    pub enable_cluster_monitoring: bool,
    pub enable_network_policy: bool,
    pub windows_prefered_cluster: bool,
}

impl ManagementCluster {
    /// Apply feature flags to this cluster object.
    pub fn with_feature_flags(mut self, flags: ClusterFeatureFlags) -> Self {
        self.enable_cluster_alerting = flags.enable_cluster_alerting;
        self.enable_cluster_monitoring = flags.enable_cluster_monitoring;
        self.enable_network_policy = Some(flags.enable_network_policy);
        self.windows_prefered_cluster = flags.windows_prefered_cluster;
        self
    }
}
