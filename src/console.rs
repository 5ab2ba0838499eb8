//! Owned application context: client, state and live runner subscription.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::bridge::Bridge;
use crate::commands::RunnerClient;
use crate::config::{user_config_store, ConfigStore, ConsoleConfig};
use crate::error::{AppError, Result};
use crate::event::{runner_channel, Subscription};
use crate::runner::RunnerMap;
use crate::state::{Action, AppState};

pub struct Console {
    client: RunnerClient,
    state: AppState,
    config: ConsoleConfig,
    store: Option<Arc<ConfigStore>>,
    subscription: Subscription,
    updates: mpsc::UnboundedReceiver<RunnerMap>,
}

impl Console {
    /// Subscribe to runner snapshots, then load the initial runner set.
    ///
    /// Subscribing first means a snapshot emitted while `runner_list` is in
    /// flight is queued rather than lost.
    pub async fn start(bridge: Arc<dyn Bridge>, config: ConsoleConfig) -> Result<Self> {
        let (subscription, updates) = runner_channel(&bridge)?;
        let client = RunnerClient::new(bridge);

        let runners = client.list_runners().await?;
        let mut state = AppState::new(config.title_bar_enabled);
        state.apply(Action::RunnersChanged(runners))?;

        if config.persist_selection {
            if let Some((runner, instance)) = config.last_selected_instance.clone() {
                if let Err(e) = state.apply(Action::SelectInstance { runner, instance }) {
                    log::info!("Previous selection not restored: {}", e);
                }
            }
        }

        log::info!("Console started with {} runner(s)", state.runners.len());

        Ok(Self {
            client,
            state,
            config,
            store: None,
            subscription,
            updates,
        })
    }

    /// [`Console::start`] with the preferences held by `store`. The store is
    /// kept for [`Console::save_selection`].
    pub async fn start_with_store(bridge: Arc<dyn Bridge>, store: Arc<ConfigStore>) -> Result<Self> {
        let config = (*store.load()?).clone();
        let mut console = Self::start(bridge, config).await?;
        console.store = Some(store);
        Ok(console)
    }

    /// [`Console::start_with_store`] on the user config dir.
    pub async fn start_with_user_config(bridge: Arc<dyn Bridge>) -> Result<Self> {
        Self::start_with_store(bridge, user_config_store()?).await
    }

    pub fn client(&self) -> &RunnerClient {
        &self.client
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        self.state.apply(action)
    }

    /// Wait for the next runner snapshot and apply it. Returns `None` once
    /// the bridge has dropped the listener, e.g. after `LocalBridge::close`.
    pub async fn next_update(&mut self) -> Option<&AppState> {
        let runners = self.updates.recv().await?;
        self.apply_snapshot(runners);
        Some(&self.state)
    }

    /// Apply every snapshot already queued without waiting. Returns how many
    /// were applied.
    pub fn drain_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(runners) = self.updates.try_recv() {
            self.apply_snapshot(runners);
            applied += 1;
        }
        applied
    }

    fn apply_snapshot(&mut self, runners: RunnerMap) {
        log::debug!("Applying runner snapshot ({} runner(s))", runners.len());
        self.state.replace_runners(runners);
    }

    /// Selection to remember for the next session, if remembering is enabled.
    pub fn last_selection(&self) -> Option<(String, String)> {
        if self.config.persist_selection {
            self.state.selected_instance.clone()
        } else {
            None
        }
    }

    /// Write [`Console::last_selection`] to the config store this console
    /// was started with.
    pub fn save_selection(&self) -> Result<()> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| AppError::config("Console was started without a config store"))?;
        let selection = self.last_selection();
        store.with_config_mut(move |config| {
            config.last_selected_instance = selection;
            Ok(())
        })
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    /// Stop listening for snapshots and hand back the final state.
    pub fn close(self) -> AppState {
        self.subscription.cancel();
        log::info!("Console closed");
        self.state
    }
}
