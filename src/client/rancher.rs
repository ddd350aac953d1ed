//! Rancher server handle.
//!
//! [`RancherClient`] owns the HTTP client, the bearer token and the test
//! [`Session`]. Per-cluster clients are created on demand against Rancher's
//! `/k8s/clusters/<id>` proxy, so tests never need a kubeconfig for the
//! downstream cluster.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::client::catalog::{CatalogClient, SteveCatalogClient};
use crate::client::downstream::{DownstreamClient, KubeDownstreamClient};
use crate::client::management::{ManagementClient, RancherManagementClient};
use crate::config::{RancherConfig, TestConfig};
use crate::error::{Error, Result};
use crate::session::Session;

/// Timeout for a single Rancher API request (not for watches).
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Capabilities the provisioning helpers need from a Rancher server.
pub trait RancherApi: Send + Sync {
    /// Rancher host name, used in chart values.
    fn host(&self) -> &str;

    /// Session that owns cleanups registered by helpers.
    fn session(&self) -> &Session;

    /// Server-side timeout for watches opened by helpers.
    fn watch_timeout(&self) -> Duration;

    /// Catalog client scoped to a managed cluster.
    fn catalog_client(&self, cluster_id: &str) -> Result<Arc<dyn CatalogClient>>;

    /// Kubernetes client for a managed cluster, using this handle's token.
    fn downstream_client(&self, cluster_id: &str) -> Result<Arc<dyn DownstreamClient>>;

    /// Kubernetes client for a managed cluster, using the admin token.
    fn admin_downstream_client(&self, cluster_id: &str) -> Result<Arc<dyn DownstreamClient>>;

    /// Client for the v3 management API.
    fn management(&self) -> Arc<dyn ManagementClient>;
}

/// Production [`RancherApi`] backed by the Rancher HTTP APIs.
pub struct RancherClient {
    config: RancherConfig,
    token: String,
    http: reqwest::Client,
    session: Arc<Session>,
    watch_timeout: Duration,
}

impl RancherClient {
    /// Create a client acting with `token`.
    pub fn new(
        token: impl Into<String>,
        config: RancherConfig,
        session: Arc<Session>,
    ) -> Result<Self> {
        config.validate()?;
        let watch_timeout = config.watch_timeout()?;
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(HTTP_TIMEOUT)
            .build()?;

        debug!(host = %config.host, session = %session.id(), "Created Rancher client");

        Ok(Self {
            config,
            token: token.into(),
            http,
            session,
            watch_timeout,
        })
    }

    /// Create an admin client and a fresh session from the `rancher` section.
    pub fn from_test_config(test_config: &TestConfig) -> Result<Self> {
        let config = test_config.rancher()?;
        let session = Arc::new(Session::from_config(&config));
        Self::new(config.admin_token.clone(), config, session)
    }

    /// A client for the same server and session acting with the admin token.
    pub fn as_admin(&self) -> Result<Self> {
        Self::new(
            self.config.admin_token.clone(),
            self.config.clone(),
            Arc::clone(&self.session),
        )
    }

    pub fn config(&self) -> &RancherConfig {
        &self.config
    }

    /// Shared handle to the session, for callers that outlive this client.
    pub fn shared_session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    /// URL of the Rancher proxy for a managed cluster.
    pub fn cluster_url(&self, cluster_id: &str) -> String {
        format!("{}/k8s/clusters/{}", self.config.base_url(), cluster_id)
    }

    /// Kubernetes client for a managed cluster acting with this handle's token.
    pub fn cluster_kube_client(&self, cluster_id: &str) -> Result<kube::Client> {
        self.kube_client(cluster_id, &self.token)
    }

    /// Build a kube client pointed at a managed cluster through Rancher.
    fn kube_client(&self, cluster_id: &str, token: &str) -> Result<kube::Client> {
        let url = self.cluster_url(cluster_id);
        let uri: http::Uri = url
            .parse()
            .map_err(|e| Error::Config(format!("invalid cluster URL {}: {}", url, e)))?;

        let mut config = kube::Config::new(uri);
        config.accept_invalid_certs = self.config.insecure;
        config.auth_info.token = Some(token.to_string().into());

        Ok(kube::Client::try_from(config)?)
    }
}

impl RancherApi for RancherClient {
    fn host(&self) -> &str {
        &self.config.host
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn watch_timeout(&self) -> Duration {
        self.watch_timeout
    }

    fn catalog_client(&self, cluster_id: &str) -> Result<Arc<dyn CatalogClient>> {
        let apps = self.kube_client(cluster_id, &self.token)?;
        Ok(Arc::new(SteveCatalogClient::new(
            self.http.clone(),
            self.cluster_url(cluster_id),
            self.token.clone(),
            apps,
        )))
    }

    fn downstream_client(&self, cluster_id: &str) -> Result<Arc<dyn DownstreamClient>> {
        let client = self.kube_client(cluster_id, &self.token)?;
        Ok(Arc::new(KubeDownstreamClient::new(client)))
    }

    fn admin_downstream_client(&self, cluster_id: &str) -> Result<Arc<dyn DownstreamClient>> {
        let client = self.kube_client(cluster_id, &self.config.admin_token)?;
        Ok(Arc::new(KubeDownstreamClient::new(client)))
    }

    fn management(&self) -> Arc<dyn ManagementClient> {
        Arc::new(RancherManagementClient::new(
            self.http.clone(),
            self.config.base_url(),
            self.token.clone(),
        ))
    }
}
