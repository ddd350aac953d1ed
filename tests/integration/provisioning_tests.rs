//! Hosted cluster creation against a real Rancher server.

use std::collections::BTreeMap;

use rancher_e2e::RancherApi;
use rancher_e2e::clusters::{ClusterFeatureFlags, GkeClusterConfig, create_gke_hosted_cluster};

use crate::fixtures::init_test;

#[tokio::test]
#[ignore = "requires a Rancher server and GCP credentials"]
async fn test_create_gke_hosted_cluster() {
    let ctx = init_test();
    let Some(credential) = ctx.settings.cloud_credential_id.clone() else {
        tracing::warn!("integration.cloudCredentialId not set, skipping");
        return;
    };
    let template = GkeClusterConfig::from_test_config(&ctx.config).unwrap();
    let name = ctx.client.session().random_name("gke");

    let cluster = create_gke_hosted_cluster(
        &ctx.client,
        &template,
        &name,
        &credential,
        ClusterFeatureFlags::default(),
        BTreeMap::new(),
    )
    .await
    .unwrap();

    assert_eq!(cluster.name, name);
    assert!(cluster.id.is_some());
    ctx.finish().await;
}
