//! In-process bridge: a command registry plus an event emitter.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::FutureExt as _;
use serde::Serialize;
use serde_json::Value;

use super::{Bridge, EventHandler, ListenerId};
use crate::error::{AppError, Result};

type CommandHandler =
    Arc<dyn Fn(Value) -> BoxFuture<'static, std::result::Result<Value, String>> + Send + Sync>;

type SharedHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// A command call seen by a [`LocalBridge`].
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: String,
    pub args: Value,
}

/// Bridge whose commands are closures registered in the same process.
///
/// Handlers return `Err(String)` to reject a call, mirroring how host
/// commands report failures.
#[derive(Default)]
pub struct LocalBridge {
    commands: RwLock<HashMap<String, CommandHandler>>,
    listeners: RwLock<HashMap<ListenerId, (String, SharedHandler)>>,
    invocations: Mutex<Vec<Invocation>>,
    next_listener: AtomicU64,
    recording: bool,
    closed: AtomicBool,
}

impl LocalBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bridge that keeps every command call for [`LocalBridge::invocations`].
    pub fn recording() -> Self {
        Self {
            recording: true,
            ..Self::default()
        }
    }

    /// Shut the bridge down. Later calls and `listen` fail with
    /// `BridgeClosed`; current listeners are dropped.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let dropped: Vec<(String, SharedHandler)> = self
            .listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .drain()
            .map(|(_, entry)| entry)
            .collect();
        log::info!("Local bridge closed, dropped {} listener(s)", dropped.len());
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Register (or replace) the handler for `command`.
    pub fn register<F, Fut, T>(&self, command: &str, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, String>> + Send + 'static,
        T: Serialize + 'static,
    {
        let handler: CommandHandler = Arc::new(move |args| {
            handler(args)
                .map(|result| {
                    result.and_then(|value| {
                        serde_json::to_value(value).map_err(|e| e.to_string())
                    })
                })
                .boxed()
        });

        self.commands
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(command.to_string(), handler);
    }

    /// Deliver `payload` to every handler listening on `event`.
    /// Returns the number of handlers reached.
    pub fn emit<T: Serialize>(&self, event: &str, payload: &T) -> Result<usize> {
        let payload = serde_json::to_value(payload)?;

        let mut targets: Vec<(ListenerId, SharedHandler)> = self
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(_, (name, _))| name == event)
            .map(|(id, (_, handler))| (*id, Arc::clone(handler)))
            .collect();
        targets.sort_unstable_by_key(|(id, _)| id.0);

        for (_, handler) in &targets {
            handler(payload.clone());
        }

        log::debug!("Emitted '{}' to {} listener(s)", event, targets.len());
        Ok(targets.len())
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|(name, _)| name == event)
            .count()
    }

    /// Every command call made so far, oldest first. Always empty unless the
    /// bridge was built with [`LocalBridge::recording`].
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Bridge for LocalBridge {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value> {
        if self.is_closed() {
            return Err(AppError::bridge_closed());
        }

        if self.recording {
            self.invocations
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(Invocation {
                    command: command.to_string(),
                    args: args.clone(),
                });
        }

        let handler = self
            .commands
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(command)
            .map(Arc::clone)
            .ok_or_else(|| AppError::unknown_command(command))?;

        handler(args)
            .await
            .map_err(|detail| AppError::host(command, detail))
    }

    fn listen(&self, event: &str, handler: EventHandler) -> Result<ListenerId> {
        if self.is_closed() {
            return Err(AppError::bridge_closed());
        }

        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        let handler: SharedHandler = Arc::from(handler);

        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, (event.to_string(), handler));

        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::LocalBridge;
    use crate::bridge::Bridge as _;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn invoke_routes_to_registered_handler() {
        let bridge = LocalBridge::recording();
        bridge.register("echo", |args: Value| async move { Ok::<_, String>(args) });

        let reply = bridge.invoke("echo", json!({ "x": 1 })).await.unwrap();
        assert_eq!(reply, json!({ "x": 1 }));
        assert_eq!(bridge.invocations().len(), 1);
        assert_eq!(bridge.invocations()[0].command, "echo");
    }

    #[tokio::test]
    async fn rejection_becomes_host_error() {
        let bridge = LocalBridge::new();
        bridge.register("fail", |_| async { Err::<(), _>("nope".to_string()) });

        let err = bridge.invoke("fail", Value::Null).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Host);
        assert_eq!(err.detail(), Some("nope"));
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let bridge = LocalBridge::new();
        let err = bridge.invoke("missing", Value::Null).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCommand);
    }

    #[test]
    fn emit_reaches_only_matching_listeners() {
        let bridge = LocalBridge::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let id = bridge
            .listen(
                "runner",
                Box::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        bridge.listen("other", Box::new(|_| {})).unwrap();

        assert_eq!(bridge.emit("runner", &json!({})).unwrap(), 1);
        bridge.unlisten(id);
        assert_eq!(bridge.emit("runner", &json!({})).unwrap(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.listener_count("other"), 1);
    }

    #[tokio::test]
    async fn default_bridge_retains_no_calls() {
        let bridge = LocalBridge::new();
        bridge.register("start_instance", |_| async { Ok::<_, String>(Value::Null) });

        for _ in 0..1000 {
            bridge
                .invoke("start_instance", json!({ "runner": "r1", "instance": "i1" }))
                .await
                .unwrap();
        }

        assert!(bridge.invocations().is_empty());
    }

    #[tokio::test]
    async fn closed_bridge_refuses_calls_and_listeners() {
        let bridge = LocalBridge::new();
        bridge.register("echo", |args: Value| async move { Ok::<_, String>(args) });
        bridge.listen("runner", Box::new(|_| {})).unwrap();

        bridge.close();

        assert!(bridge.is_closed());
        assert_eq!(bridge.listener_count("runner"), 0);
        let err = bridge.invoke("echo", Value::Null).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BridgeClosed);
        let err = bridge.listen("runner", Box::new(|_| {})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BridgeClosed);
    }
}
