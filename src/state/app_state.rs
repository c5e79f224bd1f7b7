//! Main application state management

use chrono::{DateTime, Utc};
use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use tracing::info;

use super::{Preferences, PreferencesUpdate, TimerKind, TimerPreferences, TimerState};
use crate::{
    storage::KeyValueStore,
    tasks::CountdownDriver,
    timer::{Clock, TimerController},
};

/// Main application state: one controller per timer kind plus server metadata
#[derive(Debug)]
pub struct AppState {
    /// Focus session timer
    pub focus: Arc<TimerController>,
    /// Break session timer
    pub rest: Arc<TimerController>,
    /// Durations used for new sessions
    pub preferences: Arc<Preferences>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Mount both timers against `backend`, restoring any persisted sessions
    pub fn new(
        port: u16,
        host: String,
        preferences: TimerPreferences,
        backend: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let preferences = Arc::new(Preferences::new(preferences));
        let mount = |kind: TimerKind| {
            TimerController::mount(
                kind,
                Arc::clone(&backend),
                Arc::clone(&preferences),
                Arc::clone(&clock),
            )
        };
        let focus = mount(TimerKind::Focus);
        let rest = mount(TimerKind::Break);

        Self {
            focus,
            rest,
            preferences,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Controller for `kind`
    pub fn timer(&self, kind: TimerKind) -> &Arc<TimerController> {
        match kind {
            TimerKind::Focus => &self.focus,
            TimerKind::Break => &self.rest,
        }
    }

    /// Spawn one countdown driver per timer. Ticks stop when the drivers drop.
    pub fn spawn_countdown_drivers(&self) -> Vec<CountdownDriver> {
        TimerKind::ALL
            .into_iter()
            .map(|kind| {
                let controller = Arc::clone(self.timer(kind));
                let running_rx = controller.subscribe_running();
                CountdownDriver::spawn(kind.to_string(), running_rx, move || {
                    controller.tick();
                })
            })
            .collect()
    }

    /// Start a session on the `kind` timer
    pub fn start_timer(&self, kind: TimerKind, task_id: Option<String>) -> TimerState {
        let state = self.timer(kind).start(task_id);
        self.record_action(format!("{}-start", kind));
        state
    }

    /// Cancel the session on the `kind` timer
    pub fn stop_timer(&self, kind: TimerKind) -> TimerState {
        let state = self.timer(kind).stop();
        self.record_action(format!("{}-stop", kind));
        state
    }

    /// Update the configured durations
    pub fn update_preferences(&self, update: PreferencesUpdate) -> Result<TimerPreferences, String> {
        let updated = self.preferences.update(update)?;
        self.record_action("preferences".to_string());
        Ok(updated)
    }

    fn record_action(&self, action: String) {
        info!("Action: {}", action);
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action);
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
