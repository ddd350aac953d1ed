//! Test configuration loading.
//!
//! Configuration lives in a single YAML file whose path is given by the
//! `CATTLE_TEST_CONFIG` environment variable. Each helper reads the section it
//! needs by key and deserializes it into its own typed struct:
//!
//! ```yaml
//! rancher:
//!   host: rancher.example.com
//!   adminToken: token-abc:xyz
//!   cleanup: true
//! externalNodes:
//!   nodes:
//!     1:
//!       - nodeID: node-1
//!         publicIPAddress: 10.0.0.5
//!         sshUser: ubuntu
//!         sshKeyName: e2e.pem
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::wait::{self, DEFAULT_WATCH_TIMEOUT};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CATTLE_TEST_CONFIG";

/// Section key for the Rancher server configuration.
pub const RANCHER_CONFIG_KEY: &str = "rancher";

/// Parsed configuration file, queried by section key.
#[derive(Clone, Debug)]
pub struct TestConfig {
    source: Option<PathBuf>,
    root: serde_yaml::Value,
}

impl TestConfig {
    /// Load the file named by `CATTLE_TEST_CONFIG`.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map_err(|_| Error::Config(format!("{} is not set", CONFIG_ENV_VAR)))?;
        Self::from_path(path)
    }

    /// Load configuration from a YAML (or JSON) file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::io(path.display(), e))?;
        let mut config = Self::from_yaml_str(&contents)?;
        config.source = Some(path.to_path_buf());
        debug!(path = %path.display(), "Loaded test configuration");
        Ok(config)
    }

    /// Parse configuration from an in-memory document.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let root: serde_yaml::Value = serde_yaml::from_str(contents)?;
        if !(root.is_mapping() || root.is_null()) {
            return Err(Error::Config(
                "configuration root must be a mapping of sections".to_string(),
            ));
        }
        Ok(Self { source: None, root })
    }

    /// Path the configuration was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Check whether a section is present.
    pub fn has_section(&self, key: &str) -> bool {
        self.root.get(key).is_some_and(|v| !v.is_null())
    }

    /// Deserialize a required section.
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        match self.root.get(key) {
            Some(value) if !value.is_null() => Ok(serde_yaml::from_value(value.clone())?),
            _ => Err(Error::Config(format!(
                "missing configuration section {:?}",
                key
            ))),
        }
    }

    /// Deserialize an optional section, falling back to its default.
    pub fn section_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        if self.has_section(key) {
            self.section(key)
        } else {
            Ok(T::default())
        }
    }

    /// The `rancher` section, validated.
    pub fn rancher(&self) -> Result<RancherConfig> {
        let config: RancherConfig = self.section(RANCHER_CONFIG_KEY)?;
        config.validate()?;
        Ok(config)
    }
}

fn default_true() -> bool {
    true
}

fn default_watch_timeout_seconds() -> u64 {
    DEFAULT_WATCH_TIMEOUT.as_secs()
}

/// Connection settings for the Rancher server under test.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RancherConfig {
    /// Rancher host name, without scheme.
    pub host: String,
    /// API token of an administrator.
    pub admin_token: String,
    /// Whether session cleanups should run.
    #[serde(default = "default_true")]
    pub cleanup: bool,
    /// Skip TLS verification (self-signed test servers).
    #[serde(default)]
    pub insecure: bool,
    /// Name of the downstream cluster used by tests, if preconfigured.
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// Server-side timeout applied to every watch opened by the framework.
    #[serde(default = "default_watch_timeout_seconds")]
    pub watch_timeout_seconds: u64,
}

impl RancherConfig {
    /// Validate the settings that can be checked without a server.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("rancher.host must not be empty".to_string()));
        }
        if self.host.contains("://") {
            return Err(Error::Config(format!(
                "rancher.host must not include a scheme: {}",
                self.host
            )));
        }
        if self.admin_token.trim().is_empty() {
            return Err(Error::Config(
                "rancher.adminToken must not be empty".to_string(),
            ));
        }
        self.watch_timeout()?;
        Ok(())
    }

    /// Watch timeout as a duration, checked against the API server limit.
    pub fn watch_timeout(&self) -> Result<Duration> {
        let timeout = Duration::from_secs(self.watch_timeout_seconds);
        wait::timeout_seconds(timeout)?;
        Ok(timeout)
    }

    /// Base URL of the Rancher server.
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host.trim_end_matches('/'))
    }
}
