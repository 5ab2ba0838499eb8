//! Subscription to the host's `"runner"` snapshot channel.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::bridge::{Bridge, ListenerId};
use crate::error::{AppError, Result};
use crate::runner::RunnerMap;

/// Channel carrying full runner snapshots.
pub const RUNNER_EVENT: &str = "runner";

/// Decode one snapshot payload. Both the runner level and each runner's
/// instances must be JSON objects; any other shape is rejected.
pub fn decode_snapshot(payload: Value) -> Result<RunnerMap> {
    serde_json::from_value(payload).map_err(|e| AppError::decode(format!("runner snapshot: {}", e)))
}

/// Handle to a registered listener. Dropping it unregisters the listener.
pub struct Subscription {
    bridge: Arc<dyn Bridge>,
    id: Option<ListenerId>,
}

impl Subscription {
    fn new(bridge: Arc<dyn Bridge>, id: ListenerId) -> Self {
        Self {
            bridge,
            id: Some(id),
        }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.bridge.unlisten(id);
            log::debug!("Removed '{}' listener {:?}", RUNNER_EVENT, id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Call `on_change` with every decoded snapshot, in delivery order.
/// Payloads that fail to decode are logged and skipped.
pub fn runner_listener<F>(bridge: &Arc<dyn Bridge>, on_change: F) -> Result<Subscription>
where
    F: Fn(RunnerMap) + Send + Sync + 'static,
{
    let id = bridge.listen(
        RUNNER_EVENT,
        Box::new(move |payload| match decode_snapshot(payload) {
            Ok(runners) => on_change(runners),
            Err(e) => log::warn!("Dropped malformed runner snapshot: {}", e),
        }),
    )?;

    log::debug!("Listening on '{}' as {:?}", RUNNER_EVENT, id);
    Ok(Subscription::new(Arc::clone(bridge), id))
}

/// Like [`runner_listener`], but snapshots are queued on a channel for an
/// async consumer.
pub fn runner_channel(
    bridge: &Arc<dyn Bridge>,
) -> Result<(Subscription, mpsc::UnboundedReceiver<RunnerMap>)> {
    let (tx, rx) = mpsc::unbounded_channel();

    let subscription = runner_listener(bridge, move |runners| {
        if tx.send(runners).is_err() {
            log::debug!("Runner snapshot receiver dropped");
        }
    })?;

    Ok((subscription, rx))
}
