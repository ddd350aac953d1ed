//! Watch-based condition waiting.
//!
//! A wait consumes an already-open watch stream and returns as soon as the
//! caller's predicate resolves. The deadline is the `timeoutSeconds` sent with
//! the watch request: when the API server closes the stream first, the wait
//! reports [`WaitError::StreamClosed`]. Nothing is re-armed locally and no
//! task is spawned, so the subscription is released on every exit path.

pub mod conditions;

use std::fmt::Debug;
use std::time::Duration;

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use kube::Resource;
use kube::api::{Api, WatchEvent, WatchParams};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Upper bound accepted by the API server for `timeoutSeconds` on a watch.
pub const MAX_WATCH_TIMEOUT: Duration = Duration::from_secs(294);

/// Default watch timeout for framework waits.
pub const DEFAULT_WATCH_TIMEOUT: Duration = Duration::from_secs(290);

/// A boxed stream of raw watch events for a single resource type.
pub type EventStream<K> = BoxStream<'static, Result<WatchEvent<K>, kube::Error>>;

/// Error type for wait operations.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// The predicate saw a terminal failure (for example an `ERROR` event).
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Watch stream closed before condition was met")]
    StreamClosed,

    #[error("Watch timeout must be between 1s and {max:?}, got {0:?}", max = MAX_WATCH_TIMEOUT)]
    InvalidTimeout(Duration),
}

impl WaitError {
    /// Build a predicate-signaled failure.
    pub fn failed(message: impl Into<String>) -> Self {
        WaitError::OperationFailed(message.into())
    }
}

/// Consume `stream` until `predicate` is satisfied.
///
/// The predicate is called once per event, in arrival order:
/// - `Ok(true)` ends the wait successfully,
/// - `Ok(false)` keeps consuming,
/// - `Err(e)` ends the wait and returns `e` unchanged.
///
/// Stream items that are themselves errors are returned as-is (converted into
/// [`WaitError`]). No further events are read after the wait resolves, and
/// the stream is dropped before returning.
pub async fn watch_wait<S, T, E, F>(stream: S, mut predicate: F) -> Result<(), WaitError>
where
    S: Stream<Item = Result<T, E>>,
    E: Into<WaitError>,
    F: FnMut(&T) -> Result<bool, WaitError>,
{
    let mut stream = std::pin::pin!(stream);
    let mut seen = 0usize;

    while let Some(item) = stream.next().await {
        let event = item.map_err(Into::into)?;
        seen += 1;
        if predicate(&event)? {
            debug!(events = seen, "Wait condition met");
            return Ok(());
        }
    }

    debug!(events = seen, "Watch stream closed before condition was met");
    Err(WaitError::StreamClosed)
}

/// Check a watch timeout and convert it to whole seconds.
pub fn timeout_seconds(timeout: Duration) -> Result<u32, WaitError> {
    let secs = timeout.as_secs();
    if secs == 0 || timeout > MAX_WATCH_TIMEOUT {
        return Err(WaitError::InvalidTimeout(timeout));
    }
    u32::try_from(secs).map_err(|_| WaitError::InvalidTimeout(timeout))
}

/// Build watch parameters for a single named resource with a server-side timeout.
pub fn watch_params(name: &str, timeout: Duration) -> Result<WatchParams, WaitError> {
    Ok(WatchParams::default()
        .fields(&format!("metadata.name={}", name))
        .timeout(timeout_seconds(timeout)?))
}

/// Open a watch on a single named resource.
///
/// The returned stream ends when the server-side timeout fires.
pub async fn watch_named<K>(
    api: &Api<K>,
    name: &str,
    timeout: Duration,
) -> Result<EventStream<K>, WaitError>
where
    K: Resource + Clone + DeserializeOwned + Debug + Send + 'static,
{
    let params = watch_params(name, timeout)?;
    let stream = api.watch(&params, "0").await?;
    Ok(stream.boxed())
}

/// Watch a named resource and wait for `predicate` to be satisfied.
pub async fn wait_for_named<K, F>(
    api: &Api<K>,
    name: &str,
    timeout: Duration,
    predicate: F,
) -> Result<(), WaitError>
where
    K: Resource + Clone + DeserializeOwned + Debug + Send + 'static,
    F: FnMut(&WatchEvent<K>) -> Result<bool, WaitError>,
{
    let stream = watch_named(api, name, timeout).await?;
    watch_wait(stream, predicate).await
}
