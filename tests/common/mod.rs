#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use volkanic_console_lib::{LocalBridge, RUNNER_EVENT};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn instance_json(name: &str, status: Value) -> Value {
    json!({
        "name": name,
        "type": { "volkanic": { "source": { "url": format!("https://images.example/{name}.img") } } },
        "status": status
    })
}

pub fn runner_json(name: &str, instances: Value) -> Value {
    json!({
        "name": name,
        "url": format!("http://{name}.local:9000"),
        "connected": true,
        "instances": instances
    })
}

/// A host stand-in: keeps a snapshot, answers `runner_list`, and re-emits
/// the snapshot after every lifecycle command the way the real host does.
pub struct FakeHost {
    pub bridge: Arc<LocalBridge>,
    snapshot: Arc<Mutex<Value>>,
}

impl FakeHost {
    pub fn new(initial: Value) -> Self {
        let bridge = Arc::new(LocalBridge::new());
        let snapshot = Arc::new(Mutex::new(initial));

        let list = Arc::clone(&snapshot);
        bridge.register("runner_list", move |_| {
            let current = list.lock().unwrap().clone();
            async move { Ok::<_, String>(current) }
        });

        let host = Self { bridge, snapshot };
        host.register_lifecycle("start_instance", json!("running"));
        host.register_lifecycle("stop_instance", json!("inactive"));
        host.register_delete();
        host
    }

    fn register_lifecycle(&self, command: &str, status: Value) {
        let snapshot = Arc::clone(&self.snapshot);
        let emitter = Arc::clone(&self.bridge);
        self.bridge.register(command, move |args: Value| {
            let result = {
                let mut snapshot = snapshot.lock().unwrap();
                let runner = args["runner"].as_str().unwrap_or_default();
                let instance = args["instance"].as_str().unwrap_or_default();
                match snapshot
                    .get_mut(runner)
                    .and_then(|r| r["instances"].get_mut(instance))
                {
                    Some(entry) => {
                        entry["status"] = status.clone();
                        Ok(snapshot.clone())
                    }
                    None => Err(format!("no instance {runner}/{instance}")),
                }
            };
            if let Ok(current) = &result {
                emitter.emit(RUNNER_EVENT, current).unwrap();
            }
            async move { result.map(|_| ()) }
        });
    }

    fn register_delete(&self) {
        let snapshot = Arc::clone(&self.snapshot);
        let emitter = Arc::clone(&self.bridge);
        self.bridge.register("del_instance", move |args: Value| {
            let current = {
                let mut snapshot = snapshot.lock().unwrap();
                let runner = args["runner"].as_str().unwrap_or_default();
                let instance = args["instance"].as_str().unwrap_or_default();
                if let Some(instances) = snapshot
                    .get_mut(runner)
                    .and_then(|r| r["instances"].as_object_mut())
                {
                    instances.remove(instance);
                }
                snapshot.clone()
            };
            emitter.emit(RUNNER_EVENT, &current).unwrap();
            async { Ok::<_, String>(()) }
        });
    }

    pub fn emit(&self, payload: Value) {
        *self.snapshot.lock().unwrap() = payload.clone();
        self.bridge.emit(RUNNER_EVENT, &payload).unwrap();
    }
}
