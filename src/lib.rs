//! Data layer of the Volkanic Console.
//!
//! Runners and their instances live in the host process. This crate mirrors
//! them as typed values, forwards user actions to the host through a
//! [`Bridge`], and keeps an [`AppState`] current from the host's `"runner"`
//! snapshots.

mod bridge;
mod commands;
mod config;
mod console;
mod error;
mod event;
mod instance;
mod paths;
mod platform;
mod runner;
mod state;
mod view;

pub use bridge::{Bridge, EventHandler, Invocation, ListenerId, LocalBridge};
pub use commands::RunnerClient;
pub use config::{
    load_config, load_config_from, save_config_to, user_config_store, with_config_mut, ConfigStore,
    ConsoleConfig,
};
pub use console::Console;
pub use error::{AppError, ErrorKind, Result};
pub use event::{decode_snapshot, runner_channel, runner_listener, Subscription, RUNNER_EVENT};
pub use instance::{Instance, InstanceRequest, InstanceStatus, InstanceType, VolkanicSource};
pub use paths::{config_path, get_config_dir};
pub use platform::Platform;
pub use runner::{Runner, RunnerInfo, RunnerMap, RunnerMode, SUPPORTED_PROTOCOL};
pub use state::{Action, AppState};
pub use view::View;
