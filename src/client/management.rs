//! Rancher v3 management API.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::client::check_response;
use crate::clusters::ManagementCluster;
use crate::error::Result;

/// Management operations on Rancher cluster objects.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ManagementClient: Send + Sync {
    /// Create a cluster object and return it as stored by Rancher.
    async fn create_cluster(&self, cluster: &ManagementCluster) -> Result<ManagementCluster>;

    /// Request deletion of a cluster by ID.
    async fn delete_cluster(&self, id: &str) -> Result<()>;
}

/// [`ManagementClient`] posting to `/v3/clusters`.
pub struct RancherManagementClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RancherManagementClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl ManagementClient for RancherManagementClient {
    async fn create_cluster(&self, cluster: &ManagementCluster) -> Result<ManagementCluster> {
        let response = self
            .http
            .post(format!("{}/v3/clusters", self.base_url))
            .bearer_auth(&self.token)
            .json(cluster)
            .send()
            .await?;
        let created: ManagementCluster = check_response(response).await?.json().await?;

        info!(
            cluster = %created.name,
            id = created.id.as_deref().unwrap_or("<none>"),
            "Created management cluster"
        );
        Ok(created)
    }

    async fn delete_cluster(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(format!("{}/v3/clusters/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .await?;
        check_response(response).await?;

        info!(id = %id, "Requested management cluster deletion");
        Ok(())
    }
}
