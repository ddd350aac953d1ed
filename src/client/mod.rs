//! Clients for the Rancher server and the clusters it manages.
//!
//! Helpers never talk to HTTP or Kubernetes directly. They receive a
//! [`RancherApi`] handle and ask it for the narrow capability they need, which
//! keeps them testable against in-memory fakes.
//!
//! ## Architecture
//!
//! - `rancher`: [`RancherClient`], the production [`RancherApi`] handle
//! - `catalog`: chart install/uninstall and App watches (steve API)
//! - `downstream`: namespace operations inside a managed cluster
//! - `management`: cluster objects of the v3 management API

pub mod catalog;
pub mod downstream;
pub mod management;
pub mod rancher;

pub use catalog::{CatalogClient, SteveCatalogClient, app_api_resource};
pub use downstream::{DownstreamClient, KubeDownstreamClient};
pub use management::{ManagementClient, RancherManagementClient};
pub use rancher::{RancherApi, RancherClient};

use crate::error::{Error, Result};

/// Turn a non-success Rancher API response into [`Error::Api`].
pub(crate) async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}
