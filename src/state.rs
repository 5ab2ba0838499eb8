//! Root UI state and its single update entry point.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::instance::Instance;
use crate::runner::{Runner, RunnerMap};
use crate::view::View;

/// Everything the UI renders from. Owned by one caller and changed only
/// through [`AppState::apply`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub runners: RunnerMap,
    /// `(runner id, instance name)`.
    pub selected_instance: Option<(String, String)>,
    pub view: View,
    pub settings_open: bool,
    pub new_instance_modal: bool,
    pub new_runner_modal: bool,
    pub title_bar_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A fresh snapshot from the host replaces all runners.
    RunnersChanged(RunnerMap),
    Navigate(View),
    SelectInstance { runner: String, instance: String },
    ClearSelection,
    ToggleSettings,
    SetNewInstanceModal(bool),
    SetNewRunnerModal(bool),
    SetTitleBar(bool),
}

impl AppState {
    pub fn new(title_bar_enabled: bool) -> Self {
        Self {
            title_bar_enabled,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::RunnersChanged(runners) => {
                self.replace_runners(runners);
                Ok(())
            }
            Action::Navigate(view) => self.navigate(view),
            Action::SelectInstance { runner, instance } => self.select(runner, instance),
            Action::ClearSelection => {
                self.selected_instance = None;
                self.view = View::Home;
                Ok(())
            }
            Action::ToggleSettings => {
                self.settings_open = !self.settings_open;
                Ok(())
            }
            Action::SetNewInstanceModal(open) => {
                self.new_instance_modal = open;
                if open {
                    self.new_runner_modal = false;
                }
                Ok(())
            }
            Action::SetNewRunnerModal(open) => {
                self.new_runner_modal = open;
                if open {
                    self.new_instance_modal = false;
                }
                Ok(())
            }
            Action::SetTitleBar(enabled) => {
                self.title_bar_enabled = enabled;
                Ok(())
            }
        }
    }

    /// The selected runner and instance, if the selection is set.
    pub fn selected(&self) -> Option<(&Runner, &Instance)> {
        let (runner_id, instance_name) = self.selected_instance.as_ref()?;
        let runner = self.runners.get(runner_id)?;
        let instance = runner.instance(instance_name)?;
        Some((runner, instance))
    }

    /// Runner ids in display order.
    pub fn runner_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.runners.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn contains(&self, runner: &str, instance: &str) -> bool {
        self.runners
            .get(runner)
            .is_some_and(|r| r.has_instance(instance))
    }

    pub(crate) fn replace_runners(&mut self, runners: RunnerMap) {
        self.runners = runners;

        if let Some((runner, instance)) = self.selected_instance.clone() {
            if !self.contains(&runner, &instance) {
                log::info!("Selected instance {}/{} is gone, clearing selection", runner, instance);
                self.selected_instance = None;
            }
        }

        let view_is_stale = match &self.view {
            View::Home => false,
            View::InstanceOverview { runner, instance } => !self.contains(runner, instance),
            View::NewInstance { runner, .. } => !self.runners.contains_key(runner),
        };
        if view_is_stale {
            self.view = View::Home;
        }
    }

    fn navigate(&mut self, view: View) -> Result<()> {
        match view {
            View::Home => {
                self.view = View::Home;
                Ok(())
            }
            View::InstanceOverview { runner, instance } => self.select(runner, instance),
            View::NewInstance { runner, name } => {
                if !self.runners.contains_key(&runner) {
                    return Err(AppError::runner_not_found(&runner));
                }
                self.view = View::NewInstance { runner, name };
                Ok(())
            }
        }
    }

    fn select(&mut self, runner: String, instance: String) -> Result<()> {
        let Some(found) = self.runners.get(&runner) else {
            return Err(AppError::runner_not_found(&runner));
        };
        if !found.has_instance(&instance) {
            return Err(AppError::instance_not_found(&runner, &instance));
        }

        self.view = View::InstanceOverview {
            runner: runner.clone(),
            instance: instance.clone(),
        };
        self.selected_instance = Some((runner, instance));
        Ok(())
    }
}
