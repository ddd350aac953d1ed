//! Chart install/uninstall payloads for Rancher's catalog.
//!
//! The payloads mirror the steve `ChartInstallAction` / `ChartUninstallAction`
//! bodies. Every chart gets the `global.cattle` values Rancher charts expect;
//! chart-specific values are merged on top.

pub mod monitoring;

pub use monitoring::{
    RANCHER_MONITORING_NAME, RANCHER_MONITORING_NAMESPACE, RancherMonitoringOpts,
    install_rancher_monitoring_chart, uninstall_rancher_monitoring_chart,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::Result;

/// Cluster repository that ships the Rancher charts.
pub const RANCHER_CHARTS_REPO: &str = "rancher-charts";

/// Helm timeout sent with install actions.
const CHART_INSTALL_TIMEOUT: &str = "600s";

/// Where and which version of a chart to install.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Rancher cluster ID (for example `c-m-abc123`).
    pub cluster_id: String,
    /// Display name of the cluster.
    pub cluster_name: String,
    /// Chart version, e.g. `102.0.0+up40.1.2`.
    pub version: String,
    /// Project the chart namespace belongs to, if any.
    pub project_id: String,
}

impl InstallOptions {
    pub fn new(
        cluster_id: impl Into<String>,
        cluster_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            cluster_name: cluster_name.into(),
            version: version.into(),
            project_id: String::new(),
        }
    }

    /// Set the project the chart namespace is placed in.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// Parse the chart version.
    pub fn validate(&self) -> Result<semver::Version> {
        Ok(semver::Version::parse(&self.version)?)
    }
}

/// A single chart within an install action.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartInstall {
    pub chart_name: String,
    pub version: String,
    pub release_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

/// Body of the `?action=install` call on a cluster repository.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartInstallAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    pub wait: bool,
    #[serde(rename = "disableOpenAPIValidation")]
    pub disable_openapi_validation: bool,
    pub no_hooks: bool,
    #[serde(rename = "skipCRDs")]
    pub skip_crds: bool,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    pub charts: Vec<ChartInstall>,
}

/// Body of the `?action=uninstall` call on an App.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartUninstallAction {
    pub disable_hooks: bool,
    pub dry_run: bool,
    pub keep_history: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Build a chart entry with the standard `global.cattle` values.
///
/// Keys in `values` override the defaults at the top level.
pub fn new_chart_install(
    name: &str,
    version: &str,
    cluster_id: &str,
    cluster_name: &str,
    url: &str,
    values: Option<Map<String, Value>>,
) -> ChartInstall {
    let mut merged = Map::new();
    merged.insert(
        "global".to_string(),
        json!({
            "cattle": {
                "clusterId": cluster_id,
                "clusterName": cluster_name,
                "rkePathPrefix": "",
                "rkeWindowsPathPrefix": "",
                "systemDefaultRegistry": "",
                "url": url,
            },
            "systemDefaultRegistry": "",
        }),
    );
    merged.extend(values.unwrap_or_default());

    ChartInstall {
        chart_name: name.to_string(),
        version: version.to_string(),
        release_name: name.to_string(),
        description: String::new(),
        values: merged,
    }
}

/// Wrap charts into an install action targeting `namespace`.
pub fn new_chart_install_action(
    namespace: &str,
    project_id: &str,
    charts: Vec<ChartInstall>,
) -> ChartInstallAction {
    ChartInstallAction {
        timeout: Some(CHART_INSTALL_TIMEOUT.to_string()),
        wait: true,
        disable_openapi_validation: false,
        no_hooks: false,
        skip_crds: false,
        namespace: namespace.to_string(),
        project_id: project_id.to_string(),
        charts,
    }
}

/// Default uninstall action.
pub fn new_chart_uninstall_action() -> ChartUninstallAction {
    ChartUninstallAction::default()
}
