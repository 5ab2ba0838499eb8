//! Boundary between the console and its host process.
//!
//! The host exposes named commands (request/response) and named event
//! channels (push). Everything else in this crate talks to the host only
//! through [`Bridge`].

mod local;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use local::{Invocation, LocalBridge};

/// Callback invoked with the raw payload of every event on a channel.
pub type EventHandler = Box<dyn Fn(Value) + Send + Sync + 'static>;

/// Identifies a registered event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[async_trait]
pub trait Bridge: Send + Sync {
    /// Call a host command. A rejection from the host is returned as
    /// [`ErrorKind::Host`](crate::ErrorKind::Host), never swallowed.
    async fn invoke(&self, command: &str, args: Value) -> Result<Value>;

    /// Register `handler` for every payload emitted on `event`, in emission order.
    fn listen(&self, event: &str, handler: EventHandler) -> Result<ListenerId>;

    /// Remove a handler. Unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);
}
