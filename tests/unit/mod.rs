// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::string_slice
)]

//! Unit tests for rancher-e2e.
//!
//! These tests run without a Rancher server and exercise the public API of
//! individual modules in isolation.

mod config_tests {
    use std::time::Duration;

    use rancher_e2e::config::CONFIG_ENV_VAR;
    use rancher_e2e::{Error, TestConfig};

    #[test]
    fn test_full_config_document() {
        let config = TestConfig::from_yaml_str(
            r#"
rancher:
  host: rancher.example.com
  adminToken: token-admin:secret
  cleanup: false
  clusterName: downstream
  watchTimeoutSeconds: 120
gkeClusterConfig:
  projectID: p
externalNodes:
  nodes: {}
"#,
        )
        .unwrap();

        let rancher = config.rancher().unwrap();
        assert!(!rancher.cleanup);
        assert_eq!(rancher.cluster_name.as_deref(), Some("downstream"));
        assert_eq!(rancher.watch_timeout().unwrap(), Duration::from_secs(120));
        assert!(config.has_section("gkeClusterConfig"));
        assert!(config.has_section("externalNodes"));
        assert!(!config.has_section("awsEC2Configs"));
    }

    #[test]
    fn test_empty_token_rejected() {
        let config =
            TestConfig::from_yaml_str("rancher: {host: rancher.example.com, adminToken: ''}")
                .unwrap();
        assert!(matches!(config.rancher(), Err(Error::Config(_))));
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(CONFIG_ENV_VAR, "CATTLE_TEST_CONFIG");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TestConfig::from_path("/nonexistent/cattle-config.yaml").unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path.contains("cattle-config.yaml")));
    }
}

mod chart_tests {
    use rancher_e2e::charts::monitoring::new_monitoring_chart_install_action;
    use rancher_e2e::charts::{
        InstallOptions, RANCHER_CHARTS_REPO, RANCHER_MONITORING_NAMESPACE, RancherMonitoringOpts,
    };

    #[test]
    fn test_repo_name() {
        assert_eq!(RANCHER_CHARTS_REPO, "rancher-charts");
    }

    #[test]
    fn test_monitoring_values_default_off() {
        let values = RancherMonitoringOpts::default().values();
        for key in [
            "ingressNginx",
            "rkeControllerManager",
            "rkeEtcd",
            "rkeProxy",
            "rkeScheduler",
        ] {
            assert_eq!(values[key]["enabled"], false, "{key} should default off");
        }
        assert_eq!(
            values["prometheus"]["prometheusSpec"]["scrapeInterval"],
            "1m"
        );
        assert_eq!(
            values["prometheus"]["prometheusSpec"]["evaluationInterval"],
            "1m"
        );
    }

    #[test]
    fn test_monitoring_action_serializes() {
        let options = InstallOptions::new("c-m-1", "downstream", "103.1.0+up45.31.1");
        let action = new_monitoring_chart_install_action(
            &options,
            "rancher.example.com",
            &RancherMonitoringOpts {
                rke_scheduler: true,
                ..Default::default()
            },
        );
        let body = serde_json::to_value(&action).unwrap();

        assert_eq!(body["namespace"], RANCHER_MONITORING_NAMESPACE);
        assert_eq!(body["charts"][0]["chartName"], "rancher-monitoring-crd");
        assert_eq!(body["charts"][0]["version"], "103.1.0+up45.31.1");
        assert_eq!(body["charts"][1]["values"]["rkeScheduler"]["enabled"], true);
        assert_eq!(
            body["charts"][1]["values"]["global"]["cattle"]["url"],
            "rancher.example.com"
        );
    }
}

mod error_tests {
    use rancher_e2e::{Error, WaitError, ignore_not_found};

    #[test]
    fn test_classification() {
        let not_found = Error::Api {
            status: 404,
            message: "clusters.management.cattle.io \"c-1\" not found".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_timeout());

        let closed = Error::from(WaitError::StreamClosed);
        assert!(closed.is_timeout());
        assert_eq!(
            closed.to_string(),
            "Watch stream closed before condition was met"
        );
    }

    #[test]
    fn test_ignore_not_found_keeps_other_errors() {
        let err = ignore_not_found::<()>(Err(Error::Api {
            status: 409,
            message: "conflict".to_string(),
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Api { status: 409, .. }));
    }
}

mod client_tests {
    use std::time::Duration;

    use rancher_e2e::{RancherApi, RancherClient, TestConfig};

    #[test]
    fn test_client_from_test_config() {
        let config = TestConfig::from_yaml_str(
            "rancher: {host: rancher.example.com, adminToken: 'token-admin:s', watchTimeoutSeconds: 90}",
        )
        .unwrap();
        let client = RancherClient::from_test_config(&config).unwrap();

        assert_eq!(client.host(), "rancher.example.com");
        assert_eq!(client.watch_timeout(), Duration::from_secs(90));
        assert!(client.session().cleanup_enabled());
        assert_eq!(
            client.cluster_url("local"),
            "https://rancher.example.com/k8s/clusters/local"
        );
    }
}
