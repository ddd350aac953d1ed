//! Reusable predicates for [`watch_wait`](super::watch_wait).

use kube::api::{DynamicObject, WatchEvent};

use super::WaitError;

/// State reported by a catalog App once its release is installed.
pub const APP_STATE_DEPLOYED: &str = "deployed";

/// Done once the watched resource is deleted.
pub fn is_deleted<K>(event: &WatchEvent<K>) -> Result<bool, WaitError> {
    Ok(matches!(event, WatchEvent::Deleted(_)))
}

/// Done once the watched resource is deleted; an `ERROR` event is fatal.
pub fn deleted_or_failed<K>(
    context: &str,
) -> impl FnMut(&WatchEvent<K>) -> Result<bool, WaitError> + '_ {
    move |event: &WatchEvent<K>| match event {
        WatchEvent::Deleted(_) => Ok(true),
        WatchEvent::Error(e) => Err(WaitError::failed(format!("{}: {}", context, e.message))),
        _ => Ok(false),
    }
}

/// Read `status.summary.state` from a catalog App.
pub fn app_state(app: &DynamicObject) -> Option<&str> {
    app.data
        .pointer("/status/summary/state")
        .and_then(|state| state.as_str())
}

/// Done once the App reports the `deployed` state; an `ERROR` event is fatal.
pub fn app_deployed(event: &WatchEvent<DynamicObject>) -> Result<bool, WaitError> {
    match event {
        WatchEvent::Added(app) | WatchEvent::Modified(app) => {
            Ok(app_state(app) == Some(APP_STATE_DEPLOYED))
        }
        WatchEvent::Error(e) => Err(WaitError::failed(format!(
            "watching app failed: {}",
            e.message
        ))),
        _ => Ok(false),
    }
}
