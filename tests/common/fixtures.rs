//! Test fixtures and builders for watch events and catalog Apps.

use futures::{StreamExt, stream};
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{DynamicObject, WatchEvent};
use kube::core::ErrorResponse;
use serde_json::json;

use rancher_e2e::EventStream;

/// Builder for catalog.cattle.io/v1 App objects.
///
/// # Example
/// ```
/// let app = AppBuilder::new("rancher-monitoring")
///     .namespace("cattle-monitoring-system")
///     .state("deployed")
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct AppBuilder {
    name: String,
    namespace: String,
    state: Option<String>,
}

impl AppBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: "default".to_string(),
            state: None,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set `status.summary.state`.
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn build(self) -> DynamicObject {
        let mut app = json!({
            "apiVersion": "catalog.cattle.io/v1",
            "kind": "App",
            "metadata": {"name": self.name, "namespace": self.namespace},
        });
        if let Some(state) = self.state
            && let Some(obj) = app.as_object_mut()
        {
            obj.insert("status".to_string(), json!({"summary": {"state": state}}));
        }
        serde_json::from_value(app).expect("valid App object")
    }
}

/// A monitoring App in the given state.
pub fn monitoring_app(state: &str) -> DynamicObject {
    AppBuilder::new("rancher-monitoring")
        .namespace("cattle-monitoring-system")
        .state(state)
        .build()
}

/// A namespace object with only its name set.
pub fn namespace(name: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// An `ERROR` watch event.
pub fn error_event<K>(message: &str) -> WatchEvent<K> {
    WatchEvent::Error(ErrorResponse {
        status: "Failure".to_string(),
        message: message.to_string(),
        reason: "InternalError".to_string(),
        code: 500,
    })
}

/// A kube API error with the given status code.
pub fn api_error(code: u16) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("request failed with {code}"),
        reason: if code == 404 { "NotFound" } else { "InternalError" }.to_string(),
        code,
    })
}

/// A finite event stream that ends after `events`, like a watch whose
/// server-side timeout fired.
pub fn events<K: Send + 'static>(events: Vec<WatchEvent<K>>) -> EventStream<K> {
    stream::iter(events.into_iter().map(Ok)).boxed()
}
