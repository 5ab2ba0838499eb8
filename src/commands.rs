use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::bridge::Bridge;
use crate::error::{AppError, Result};
use crate::instance::InstanceRequest;
use crate::platform::Platform;
use crate::runner::{RunnerInfo, RunnerMap};

const RUNNER_NEW: &str = "runner_new";
const RUNNER_LIST: &str = "runner_list";
const RUNNER_INFO: &str = "runner_info";
const IS_VALID_URL: &str = "is_valid_url";
const DEL_INSTANCE: &str = "del_instance";
const NEW_INSTANCE: &str = "new_instance";
const START_INSTANCE: &str = "start_instance";
const STOP_INSTANCE: &str = "stop_instance";
const HOST_PLATFORM: &str = "host_platform";

/// Typed wrappers over the host's runner and instance commands.
///
/// Each method is a single forwarded call. Effects of lifecycle commands
/// become visible through the next `"runner"` snapshot, not through the
/// return value.
#[derive(Clone)]
pub struct RunnerClient {
    bridge: Arc<dyn Bridge>,
}

impl RunnerClient {
    pub fn new(bridge: Arc<dyn Bridge>) -> Self {
        Self { bridge }
    }

    async fn call<T: DeserializeOwned>(&self, command: &str, args: Value) -> Result<T> {
        log::debug!("Invoking {}", command);
        let reply = self
            .bridge
            .invoke(command, args)
            .await
            .inspect_err(|e| log::warn!("Command {} failed: {}", command, e))?;
        serde_json::from_value(reply)
            .map_err(|e| AppError::decode(format!("{} response: {}", command, e)))
    }

    async fn call_unit(&self, command: &str, args: Value) -> Result<()> {
        self.call::<Value>(command, args).await.map(|_| ())
    }

    // === Runner ===

    pub async fn new_runner(&self, name: &str, url: &str) -> Result<()> {
        self.call_unit(RUNNER_NEW, json!({ "name": name, "url": url }))
            .await
    }

    /// Full runner set, each runner's instances keyed by name.
    pub async fn list_runners(&self) -> Result<RunnerMap> {
        self.call(RUNNER_LIST, json!({})).await
    }

    pub async fn is_valid_url(&self, url: &str) -> Result<bool> {
        self.call(IS_VALID_URL, json!({ "url": url })).await
    }

    pub async fn runner_info(&self, url: &str) -> Result<RunnerInfo> {
        self.call(RUNNER_INFO, json!({ "url": url })).await
    }

    pub async fn host_platform(&self) -> Result<Platform> {
        self.call(HOST_PLATFORM, json!({})).await
    }

    // === Instance ===

    pub async fn del_instance(&self, runner: &str, instance: &str) -> Result<()> {
        self.call_unit(DEL_INSTANCE, json!({ "runner": runner, "instance": instance }))
            .await
    }

    pub async fn new_instance(&self, runner: &str, instance: &InstanceRequest) -> Result<()> {
        self.call_unit(NEW_INSTANCE, json!({ "runner": runner, "instance": instance }))
            .await
    }

    pub async fn start_instance(&self, runner: &str, instance: &str) -> Result<()> {
        self.call_unit(START_INSTANCE, json!({ "runner": runner, "instance": instance }))
            .await
    }

    pub async fn stop_instance(&self, runner: &str, instance: &str) -> Result<()> {
        self.call_unit(STOP_INSTANCE, json!({ "runner": runner, "instance": instance }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::RunnerClient;
    use crate::bridge::LocalBridge;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn unit_commands_ignore_reply_body() {
        let bridge = Arc::new(LocalBridge::recording());
        bridge.register("stop_instance", |_| async { Ok::<_, String>(Value::Null) });
        let client = RunnerClient::new(bridge.clone());

        client.stop_instance("r1", "i1").await.unwrap();

        let calls = bridge.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, json!({ "runner": "r1", "instance": "i1" }));
    }

    #[tokio::test]
    async fn mistyped_reply_is_a_decode_error() {
        let bridge = Arc::new(LocalBridge::new());
        bridge.register("is_valid_url", |_| async { Ok::<_, String>("yes") });
        let client = RunnerClient::new(bridge);

        let err = client.is_valid_url("http://example.com").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
