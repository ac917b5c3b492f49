use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::join_all;
use tokio::task::JoinHandle;

use crate::api::{Command, KiwiClient, LifecycleAction};
use crate::config::{DEFAULT_ACTION_REFRESH_DELAY_SECS, DEFAULT_REFRESH_INTERVAL_SECS};
use crate::error::ApiError;
use crate::models::{AccountState, Credential, ServerSnapshot, UsageSeries};
use crate::services::store::{CredentialStore, StoreError};

#[derive(Clone, Debug)]
pub struct MonitorConfig {
    pub auto_refresh: bool,
    pub refresh_interval: Duration,
    /// Delay before the follow-up status fetch after a lifecycle action.
    pub action_refresh_delay: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            auto_refresh: false,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            action_refresh_delay: Duration::from_secs(DEFAULT_ACTION_REFRESH_DELAY_SECS),
        }
    }
}

/// Owns all per-credential runtime state and drives every upstream fetch.
///
/// Each credential's state lives under its id in one map; concurrent
/// fetches for different credentials touch disjoint entries. A fetch whose
/// credential was removed mid-flight finds its entry gone and its result is
/// dropped. Failures are recorded on the affected credential only and never
/// stop refresh for the others.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    client: KiwiClient,
    store: CredentialStore,
    states: Mutex<HashMap<String, AccountState>>,
    selected: Mutex<Option<String>>,
    config: Mutex<MonitorConfig>,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl Monitor {
    pub fn new(client: KiwiClient, store: CredentialStore, config: MonitorConfig) -> Self {
        let states = store
            .list()
            .into_iter()
            .map(|c| (c.id, AccountState::default()))
            .collect();
        let selected = store.list().first().map(|c| c.id.clone());
        Monitor {
            inner: Arc::new(MonitorInner {
                client,
                store,
                states: Mutex::new(states),
                selected: Mutex::new(selected),
                config: Mutex::new(config),
                refresher: Mutex::new(None),
            }),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.inner.store
    }

    pub fn client(&self) -> &KiwiClient {
        &self.inner.client
    }

    pub fn config(&self) -> MonitorConfig {
        self.inner.config.lock().unwrap().clone()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.inner.selected.lock().unwrap().clone()
    }

    pub fn state_of(&self, id: &str) -> Option<AccountState> {
        self.inner.states.lock().unwrap().get(id).cloned()
    }

    pub fn states(&self) -> HashMap<String, AccountState> {
        self.inner.states.lock().unwrap().clone()
    }

    /// Initial load: fetch every credential's status in the foreground plus
    /// the selected credential's usage series, then start the background
    /// refresher if enabled.
    pub async fn start(&self) {
        self.refresh_all(false).await;
        if let Some(id) = self.selected_id() {
            self.fetch_usage(&id).await;
        }
        let config = self.config();
        if config.auto_refresh {
            self.spawn_refresher(config.refresh_interval);
        }
    }

    /// Add an account and kick off its first fetch. The first account added
    /// becomes the selected one.
    pub fn add_account(&self, veid: &str, api_key: &str) -> Result<Credential, StoreError> {
        let cred = self.inner.store.add(veid, api_key)?;
        self.inner
            .states
            .lock()
            .unwrap()
            .insert(cred.id.clone(), AccountState::default());

        let mut selected = self.inner.selected.lock().unwrap();
        let newly_selected = selected.is_none();
        if newly_selected {
            *selected = Some(cred.id.clone());
        }
        drop(selected);

        let monitor = self.clone();
        let id = cred.id.clone();
        tokio::spawn(async move {
            monitor.refresh_one(&id, false).await;
            if newly_selected {
                monitor.fetch_usage(&id).await;
            }
        });
        Ok(cred)
    }

    /// Remove an account together with every piece of its state. Selection
    /// falls back to the first remaining credential.
    pub fn remove_account(&self, id: &str) -> Option<Credential> {
        let removed = self.inner.store.remove(id)?;
        self.inner.states.lock().unwrap().remove(id);

        let mut selected = self.inner.selected.lock().unwrap();
        if selected.as_deref() == Some(id) {
            *selected = self.inner.store.list().first().map(|c| c.id.clone());
            if let Some(next) = selected.clone() {
                let monitor = self.clone();
                tokio::spawn(async move { monitor.fetch_usage(&next).await });
            }
        }
        Some(removed)
    }

    /// Select a credential for the chart panel and fetch its usage series.
    /// Usage history is never fanned out to all credentials.
    pub fn select(&self, id: &str) -> bool {
        if !self.inner.store.contains(id) {
            return false;
        }
        *self.inner.selected.lock().unwrap() = Some(id.to_string());
        let monitor = self.clone();
        let id = id.to_string();
        tokio::spawn(async move { monitor.fetch_usage(&id).await });
        true
    }

    /// Fetch the live status of one credential.
    pub async fn refresh_one(&self, id: &str, background: bool) {
        let Some(cred) = self.inner.store.get(id) else {
            return;
        };
        self.with_state(id, |s| s.fetch.begin(background));

        let result = self
            .inner
            .client
            .call(&cred.veid, &cred.api_key, &Command::GetLiveServiceInfo)
            .await
            .and_then(|payload| {
                serde_json::from_value::<ServerSnapshot>(payload).map_err(|_| ApiError::Parse)
            });

        match result {
            Ok(snapshot) => self.with_state(id, |s| {
                s.snapshot = Some(snapshot);
                s.fetch.finish_ok();
            }),
            Err(e) => {
                tracing::warn!(veid = %cred.veid, %e, "status fetch failed");
                let msg = e.to_string();
                self.with_state(id, |s| s.fetch.finish_err(msg));
            }
        }
    }

    /// Fetch every credential's status concurrently. Per-credential failures
    /// land in that credential's state only.
    pub async fn refresh_all(&self, background: bool) {
        let creds = self.inner.store.list();
        join_all(
            creds
                .iter()
                .map(|c| self.refresh_one(&c.id, background)),
        )
        .await;
    }

    /// Fetch the usage history for one credential.
    pub async fn fetch_usage(&self, id: &str) {
        let Some(cred) = self.inner.store.get(id) else {
            return;
        };
        self.with_state(id, |s| {
            s.chart_loading = true;
            s.usage_error = None;
        });

        let result = self
            .inner
            .client
            .call(&cred.veid, &cred.api_key, &Command::GetRawUsageStats)
            .await
            .and_then(|payload| {
                serde_json::from_value::<UsageSeries>(payload).map_err(|_| ApiError::Parse)
            });

        match result {
            Ok(series) => self.with_state(id, |s| {
                s.usage = Some(series);
                s.chart_loading = false;
            }),
            Err(e) => {
                tracing::warn!(veid = %cred.veid, %e, "usage stats fetch failed");
                let msg = e.to_string();
                self.with_state(id, |s| {
                    s.chart_loading = false;
                    s.usage_error = Some(msg);
                });
            }
        }
    }

    /// Run a lifecycle action against one credential.
    ///
    /// The action flag is set before the call and cleared when it resolves
    /// either way; one delayed foreground status refresh is scheduled
    /// regardless of outcome so the card reflects the pending state change.
    pub async fn run_action(&self, id: &str, action: LifecycleAction) -> Result<(), ApiError> {
        let Some(cred) = self.inner.store.get(id) else {
            return Err(ApiError::InvalidAction);
        };
        self.with_state(id, |s| {
            s.action.loading = true;
            s.action.error = None;
        });
        tracing::info!(veid = %cred.veid, %action, "requesting lifecycle action");

        let result = self
            .inner
            .client
            .call(&cred.veid, &cred.api_key, &action.command())
            .await;

        match &result {
            Ok(_) => self.with_state(id, |s| s.action.loading = false),
            Err(e) => {
                let msg = e.to_string();
                self.with_state(id, |s| {
                    s.action.loading = false;
                    s.action.error = Some(msg);
                });
            }
        }

        let monitor = self.clone();
        let id = id.to_string();
        let delay = self.config().action_refresh_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            monitor.refresh_one(&id, false).await;
        });

        result.map(|_| ())
    }

    /// Reconfigure background refresh. The running interval task is always
    /// torn down; a new one starts only when auto-refresh is on.
    pub fn set_refresh(&self, auto_refresh: bool, interval: Duration) {
        {
            let mut config = self.inner.config.lock().unwrap();
            config.auto_refresh = auto_refresh;
            config.refresh_interval = interval;
        }
        self.stop_refresher();
        if auto_refresh {
            self.spawn_refresher(interval);
        }
    }

    fn spawn_refresher(&self, period: Duration) {
        let monitor = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately; skip it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                tracing::debug!("auto-refreshing server data");
                monitor.refresh_all(true).await;
                if let Some(id) = monitor.selected_id() {
                    monitor.fetch_usage(&id).await;
                }
            }
        });
        *self.inner.refresher.lock().unwrap() = Some(handle);
    }

    fn stop_refresher(&self) {
        if let Some(handle) = self.inner.refresher.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Apply a state transition, dropping it silently when the credential
    /// has been removed in the meantime.
    fn with_state(&self, id: &str, f: impl FnOnce(&mut AccountState)) {
        if let Some(state) = self.inner.states.lock().unwrap().get_mut(id) {
            f(state);
        }
    }
}
