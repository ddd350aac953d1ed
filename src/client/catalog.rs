//! Catalog (chart) operations on a managed cluster.

use std::time::Duration;

use async_trait::async_trait;
use kube::api::{Api, DynamicObject};
use kube::core::{ApiResource, GroupVersionKind};
#[cfg(test)]
use mockall::automock;
use tracing::{info, instrument};

use crate::charts::{ChartInstallAction, ChartUninstallAction, RANCHER_CHARTS_REPO};
use crate::client::check_response;
use crate::error::Result;
use crate::wait::{self, EventStream};

/// API resource for `catalog.cattle.io/v1` App objects.
pub fn app_api_resource() -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk("catalog.cattle.io", "v1", "App"))
}

/// Chart lifecycle operations exposed by Rancher's catalog.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Submit a chart install action.
    async fn install_chart(&self, action: &ChartInstallAction) -> Result<()>;

    /// Submit an uninstall action for an installed App.
    async fn uninstall_chart(
        &self,
        name: &str,
        namespace: &str,
        action: &ChartUninstallAction,
    ) -> Result<()>;

    /// Watch a single App with a server-side timeout.
    async fn watch_app(
        &self,
        namespace: &str,
        name: &str,
        timeout: Duration,
    ) -> Result<EventStream<DynamicObject>>;
}

/// [`CatalogClient`] using the steve API through Rancher's cluster proxy.
pub struct SteveCatalogClient {
    http: reqwest::Client,
    cluster_url: String,
    token: String,
    apps: kube::Client,
}

impl SteveCatalogClient {
    pub fn new(
        http: reqwest::Client,
        cluster_url: impl Into<String>,
        token: impl Into<String>,
        apps: kube::Client,
    ) -> Self {
        Self {
            http,
            cluster_url: cluster_url.into(),
            token: token.into(),
            apps,
        }
    }

    fn install_url(&self) -> String {
        format!(
            "{}/v1/catalog.cattle.io.clusterrepos/{}?action=install",
            self.cluster_url, RANCHER_CHARTS_REPO
        )
    }

    fn uninstall_url(&self, namespace: &str, name: &str) -> String {
        format!(
            "{}/v1/catalog.cattle.io.apps/{}/{}?action=uninstall",
            self.cluster_url, namespace, name
        )
    }
}

#[async_trait]
impl CatalogClient for SteveCatalogClient {
    #[instrument(skip_all, fields(namespace = %action.namespace))]
    async fn install_chart(&self, action: &ChartInstallAction) -> Result<()> {
        let response = self
            .http
            .post(self.install_url())
            .bearer_auth(&self.token)
            .json(action)
            .send()
            .await?;
        check_response(response).await?;

        let charts: Vec<&str> = action.charts.iter().map(|c| c.chart_name.as_str()).collect();
        info!(charts = ?charts, "Submitted chart install");
        Ok(())
    }

    #[instrument(skip(self, action))]
    async fn uninstall_chart(
        &self,
        name: &str,
        namespace: &str,
        action: &ChartUninstallAction,
    ) -> Result<()> {
        let response = self
            .http
            .post(self.uninstall_url(namespace, name))
            .bearer_auth(&self.token)
            .json(action)
            .send()
            .await?;
        check_response(response).await?;

        info!("Submitted chart uninstall");
        Ok(())
    }

    async fn watch_app(
        &self,
        namespace: &str,
        name: &str,
        timeout: Duration,
    ) -> Result<EventStream<DynamicObject>> {
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.apps.clone(), namespace, &app_api_resource());
        Ok(wait::watch_named(&api, name, timeout).await?)
    }
}
