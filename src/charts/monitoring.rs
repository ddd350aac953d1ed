//! rancher-monitoring chart helpers.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::charts::{
    ChartInstallAction, InstallOptions, new_chart_install, new_chart_install_action,
    new_chart_uninstall_action,
};
use crate::client::{CatalogClient, DownstreamClient, RancherApi};
use crate::error::{Result, ignore_not_found};
use crate::wait::{conditions, watch_wait};

/// Namespace the rancher-monitoring chart is installed in.
pub const RANCHER_MONITORING_NAMESPACE: &str = "cattle-monitoring-system";

/// Name of the rancher-monitoring chart.
pub const RANCHER_MONITORING_NAME: &str = "rancher-monitoring";

/// Toggles for the RKE component exporters and ingress-nginx monitoring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RancherMonitoringOpts {
    pub ingress_nginx: bool,
    pub rke_controller_manager: bool,
    pub rke_etcd: bool,
    pub rke_proxy: bool,
    pub rke_scheduler: bool,
}

impl RancherMonitoringOpts {
    /// Chart values for these options.
    pub fn values(&self) -> Map<String, Value> {
        let values = json!({
            "ingressNginx": {"enabled": self.ingress_nginx},
            "prometheus": {
                "prometheusSpec": {
                    "evaluationInterval": "1m",
                    "retentionSize": "50GiB",
                    "scrapeInterval": "1m",
                },
            },
            "rkeControllerManager": {"enabled": self.rke_controller_manager},
            "rkeEtcd": {"enabled": self.rke_etcd},
            "rkeProxy": {"enabled": self.rke_proxy},
            "rkeScheduler": {"enabled": self.rke_scheduler},
        });
        match values {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Install action for the CRD chart followed by the monitoring chart.
pub fn new_monitoring_chart_install_action(
    options: &InstallOptions,
    host: &str,
    monitoring: &RancherMonitoringOpts,
) -> ChartInstallAction {
    let crd_chart = new_chart_install(
        &format!("{}-crd", RANCHER_MONITORING_NAME),
        &options.version,
        &options.cluster_id,
        &options.cluster_name,
        host,
        None,
    );
    let chart = new_chart_install(
        RANCHER_MONITORING_NAME,
        &options.version,
        &options.cluster_id,
        &options.cluster_name,
        host,
        Some(monitoring.values()),
    );

    new_chart_install_action(
        RANCHER_MONITORING_NAMESPACE,
        &options.project_id,
        vec![crd_chart, chart],
    )
}

/// Install rancher-monitoring into a managed cluster and wait until it is deployed.
///
/// The uninstall is registered with the session before the install is
/// submitted, so a failed or timed-out install is still torn down.
pub async fn install_rancher_monitoring_chart(
    client: &dyn RancherApi,
    options: &InstallOptions,
    monitoring: &RancherMonitoringOpts,
) -> Result<()> {
    options.validate()?;
    let action = new_monitoring_chart_install_action(options, client.host(), monitoring);
    let timeout = client.watch_timeout();

    let catalog = client.catalog_client(&options.cluster_id)?;
    let downstream = client.downstream_client(&options.cluster_id)?;
    let admin_downstream = client.admin_downstream_client(&options.cluster_id)?;

    {
        let catalog = Arc::clone(&catalog);
        client.session().register_cleanup(move || async move {
            uninstall_rancher_monitoring_chart(
                catalog.as_ref(),
                downstream.as_ref(),
                admin_downstream.as_ref(),
                timeout,
            )
            .await
        });
    }

    catalog.install_chart(&action).await?;

    let apps = catalog
        .watch_app(RANCHER_MONITORING_NAMESPACE, RANCHER_MONITORING_NAME, timeout)
        .await?;
    watch_wait(apps, conditions::app_deployed).await?;

    info!(
        cluster = %options.cluster_id,
        version = %options.version,
        "rancher-monitoring deployed"
    );
    Ok(())
}

/// Uninstall rancher-monitoring and remove its namespace, confirming each step.
///
/// Deletions of resources that are already gone count as done. The namespace
/// is watched with the admin client because chart users may lose access to
/// it while it terminates.
pub async fn uninstall_rancher_monitoring_chart(
    catalog: &dyn CatalogClient,
    downstream: &dyn DownstreamClient,
    admin_downstream: &dyn DownstreamClient,
    timeout: Duration,
) -> Result<()> {
    let uninstalled = ignore_not_found(
        catalog
            .uninstall_chart(
                RANCHER_MONITORING_NAME,
                RANCHER_MONITORING_NAMESPACE,
                &new_chart_uninstall_action(),
            )
            .await,
    )?;

    if uninstalled.is_some() {
        let apps = catalog
            .watch_app(RANCHER_MONITORING_NAMESPACE, RANCHER_MONITORING_NAME, timeout)
            .await?;
        watch_wait(
            apps,
            conditions::deleted_or_failed("there was an error uninstalling rancher monitoring chart"),
        )
        .await?;
        info!("rancher-monitoring uninstalled");
    } else {
        debug!("rancher-monitoring app already absent");
    }

    if ignore_not_found(downstream.delete_namespace(RANCHER_MONITORING_NAMESPACE).await)?
        .is_none()
    {
        debug!(namespace = RANCHER_MONITORING_NAMESPACE, "Namespace already absent");
        return Ok(());
    }

    let namespaces = admin_downstream
        .watch_namespace(RANCHER_MONITORING_NAMESPACE, timeout)
        .await?;
    watch_wait(namespaces, conditions::is_deleted).await?;

    info!(namespace = RANCHER_MONITORING_NAMESPACE, "Namespace deleted");
    Ok(())
}
