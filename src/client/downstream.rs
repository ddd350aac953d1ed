//! Namespace operations inside a managed cluster.

use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, DeleteParams};
#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::error::Result;
use crate::wait::{self, EventStream};

/// Kubernetes operations on a downstream cluster.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DownstreamClient: Send + Sync {
    /// Request deletion of a namespace. Fails with a not-found error if it is
    /// already gone.
    async fn delete_namespace(&self, name: &str) -> Result<()>;

    /// Watch a single namespace with a server-side timeout.
    async fn watch_namespace(&self, name: &str, timeout: Duration)
    -> Result<EventStream<Namespace>>;
}

/// [`DownstreamClient`] backed by a kube client.
pub struct KubeDownstreamClient {
    client: kube::Client,
}

impl KubeDownstreamClient {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn namespaces(&self) -> Api<Namespace> {
        Api::all(self.client.clone())
    }
}

#[async_trait]
impl DownstreamClient for KubeDownstreamClient {
    async fn delete_namespace(&self, name: &str) -> Result<()> {
        self.namespaces()
            .delete(name, &DeleteParams::default())
            .await?;
        info!(namespace = %name, "Namespace deletion requested");
        Ok(())
    }

    async fn watch_namespace(
        &self,
        name: &str,
        timeout: Duration,
    ) -> Result<EventStream<Namespace>> {
        Ok(wait::watch_named(&self.namespaces(), name, timeout).await?)
    }
}
