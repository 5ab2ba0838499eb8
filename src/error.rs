//! Application error types.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Error surfaced to the UI layer, serializable as `{ code, payload }`.
#[derive(Debug)]
pub struct AppError {
    payload: HashMap<String, String>,
    kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The host rejected a boundary call
    Host,
    /// A response or event payload did not match the declared shape
    Decode,
    /// The bridge can no longer deliver calls or events
    BridgeClosed,
    /// No handler is registered for a command
    UnknownCommand,
    /// Runner not found in the current snapshot
    RunnerNotFound,
    /// Instance not found in the current snapshot
    InstanceNotFound,
    /// Configuration error
    Config,
    /// File system error
    Io,
    /// General error
    Other,
}

impl ErrorKind {
    pub fn code(&self) -> u32 {
        match self {
            Self::Host => 1001,
            Self::Decode => 1002,
            Self::BridgeClosed => 1003,
            Self::UnknownCommand => 1004,
            Self::RunnerNotFound => 2001,
            Self::InstanceNotFound => 2002,
            Self::Config => 3001,
            Self::Io => 3002,
            Self::Other => 9999,
        }
    }
}

impl AppError {
    pub fn new(kind: ErrorKind, payload: HashMap<String, String>) -> Self {
        Self { payload, kind }
    }

    /// Create an error with a single "detail" key from a non-empty string,
    /// or an empty payload if the string is empty.
    fn with_detail(kind: ErrorKind, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let payload = if detail.is_empty() {
            HashMap::new()
        } else {
            HashMap::from([("detail".to_string(), detail)])
        };
        Self::new(kind, payload)
    }

    /// Rejection reported by the host for `command`.
    pub fn host(command: &str, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Host,
            HashMap::from([
                ("command".to_string(), command.to_string()),
                ("detail".to_string(), detail.into()),
            ]),
        )
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::with_detail(ErrorKind::Decode, message)
    }

    pub fn bridge_closed() -> Self {
        Self::new(ErrorKind::BridgeClosed, HashMap::new())
    }

    pub fn unknown_command(command: &str) -> Self {
        Self::new(
            ErrorKind::UnknownCommand,
            HashMap::from([("command".to_string(), command.to_string())]),
        )
    }

    pub fn runner_not_found(runner: &str) -> Self {
        Self::new(
            ErrorKind::RunnerNotFound,
            HashMap::from([("runner".to_string(), runner.to_string())]),
        )
    }

    pub fn instance_not_found(runner: &str, instance: &str) -> Self {
        Self::new(
            ErrorKind::InstanceNotFound,
            HashMap::from([
                ("runner".to_string(), runner.to_string()),
                ("instance".to_string(), instance.to_string()),
            ]),
        )
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::with_detail(ErrorKind::Config, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::with_detail(ErrorKind::Io, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::with_detail(ErrorKind::Other, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn payload(&self) -> &HashMap<String, String> {
        &self.payload
    }

    /// The "detail" entry of the payload, if any.
    pub fn detail(&self) -> Option<&str> {
        self.payload.get("detail").map(String::as_str)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.payload.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            let mut pairs: Vec<String> = self
                .payload
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            pairs.sort();
            write!(f, "{:?}: {}", self.kind, pairs.join(", "))
        }
    }
}

impl std::error::Error for AppError {}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct as _;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("code", &self.kind.code())?;
        s.serialize_field("payload", &self.payload)?;
        s.end()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
