//! rancher-monitoring install and uninstall on a real cluster.

use rancher_e2e::RancherApi;
use rancher_e2e::charts::{InstallOptions, RancherMonitoringOpts, install_rancher_monitoring_chart};

use crate::fixtures::init_test;

#[tokio::test]
#[ignore = "requires a Rancher server"]
async fn test_install_rancher_monitoring() {
    let ctx = init_test();
    let Some(version) = ctx.settings.monitoring_version.clone() else {
        tracing::warn!("integration.monitoringVersion not set, skipping");
        return;
    };

    let cluster_name = ctx
        .client
        .config()
        .cluster_name
        .clone()
        .unwrap_or_else(|| ctx.settings.cluster_id.clone());
    let options = InstallOptions::new(ctx.settings.cluster_id.clone(), cluster_name, version);

    install_rancher_monitoring_chart(&ctx.client, &options, &RancherMonitoringOpts::default())
        .await
        .unwrap();
    assert_eq!(ctx.client.session().pending(), 1);

    ctx.finish().await;
}
