use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use futures_util::future::join_all;
use jenkins_core::{normalize_names, update, Effect, IndicatorView, JobConfig, Msg, TrackerState};
use jenkins_logging::{jenkins_debug, jenkins_info};

use crate::client::StatusClient;
use crate::host::HostServices;
use crate::indicator::Indicator;
use crate::sync::lock;

#[derive(Default)]
struct ReconcilerState {
    tracker: TrackerState,
    indicators: BTreeMap<String, Arc<Indicator>>,
    /// Newest batch waiting for the running pass to pick it up.
    pending: Option<Vec<JobConfig>>,
    running: bool,
    disposed: bool,
}

/// Keeps exactly one indicator per configured job name.
///
/// Reconciliations are serialized: a batch submitted while a pass is running
/// replaces any batch already waiting, and the running caller performs one
/// follow-up pass with it. Refreshes triggered by the update policy may run
/// alongside a pass; each one only touches its own indicator.
pub struct IndicatorReconciler {
    client: Arc<dyn StatusClient>,
    host: HostServices,
    state: Mutex<ReconcilerState>,
}

/// Clears the running flag when a pass is cancelled mid-way.
struct PassGuard<'a> {
    state: &'a Mutex<ReconcilerState>,
    armed: bool,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock(self.state).running = false;
        }
    }
}

impl IndicatorReconciler {
    pub fn new(client: Arc<dyn StatusClient>, host: HostServices) -> Self {
        Self {
            client,
            host,
            state: Mutex::new(ReconcilerState::default()),
        }
    }

    /// Brings the indicator set in line with `jobs` and returns the batch with
    /// generated names filled in.
    pub async fn reconcile(&self, jobs: Vec<JobConfig>) -> Vec<JobConfig> {
        let normalized = normalize_names(jobs);
        {
            let mut state = lock(&self.state);
            if state.disposed {
                return normalized;
            }
            state.pending = Some(normalized.clone());
            if state.running {
                jenkins_debug!("Reconciliation in flight; queued {} jobs", normalized.len());
                return normalized;
            }
            state.running = true;
        }

        let mut guard = PassGuard {
            state: &self.state,
            armed: true,
        };
        loop {
            let batch = {
                let mut state = lock(&self.state);
                match state.pending.take() {
                    Some(batch) => batch,
                    None => {
                        // Cleared under the lock that saw the empty slot.
                        state.running = false;
                        break;
                    }
                }
            };
            self.run_pass(batch).await;
        }
        guard.armed = false;
        normalized
    }

    /// `None` means the settings source had nothing to offer; nothing changes.
    pub async fn reconcile_optional(
        &self,
        jobs: Option<Vec<JobConfig>>,
    ) -> Option<Vec<JobConfig>> {
        match jobs {
            Some(jobs) => Some(self.reconcile(jobs).await),
            None => None,
        }
    }

    async fn run_pass(&self, batch: Vec<JobConfig>) {
        let effects = {
            let mut state = lock(&self.state);
            if state.disposed {
                return;
            }
            let tracker = std::mem::take(&mut state.tracker);
            let (tracker, effects) = update(tracker, Msg::SettingsChanged(batch));
            state.tracker = tracker;
            effects
        };

        let mut to_refresh = Vec::new();
        for effect in effects {
            match effect {
                Effect::CreateIndicator { name, config } => {
                    jenkins_info!("Creating indicator {} for {}", name, config.url);
                    let indicator =
                        Indicator::create(&name, config, self.client.clone(), &self.host);
                    // Checked again under the insert lock: dispose may have run meanwhile.
                    let accepted = {
                        let mut state = lock(&self.state);
                        if state.disposed {
                            Err(indicator)
                        } else {
                            Ok(state.indicators.insert(name, indicator))
                        }
                    };
                    match accepted {
                        Ok(Some(stale)) => stale.dispose(),
                        Ok(None) => {}
                        Err(orphan) => {
                            jenkins_debug!(
                                "Reconciler disposed while creating {}; dropping it",
                                orphan.name()
                            );
                            orphan.dispose();
                            return;
                        }
                    }
                }
                Effect::RemoveIndicator { name } => {
                    jenkins_info!("Removing indicator {}", name);
                    let removed = lock(&self.state).indicators.remove(&name);
                    if let Some(indicator) = removed {
                        indicator.dispose();
                    }
                }
                Effect::RefreshIndicator { name, config } => {
                    let indicator = lock(&self.state).indicators.get(&name).cloned();
                    if let Some(indicator) = indicator {
                        indicator.set_config(config);
                        to_refresh.push(indicator);
                    }
                }
            }
        }

        // One job's failed poll only affects its own indicator.
        for indicator in to_refresh {
            indicator.refresh().await;
        }
    }

    /// Re-polls every tracked job without changing membership.
    pub async fn refresh_all(&self) {
        let indicators: Vec<Arc<Indicator>> = {
            let mut state = lock(&self.state);
            if state.disposed {
                return;
            }
            let tracker = std::mem::take(&mut state.tracker);
            let (tracker, effects) = update(tracker, Msg::UpdateRequested);
            state.tracker = tracker;
            effects
                .iter()
                .filter_map(|effect| state.indicators.get(effect.name()).cloned())
                .collect()
        };
        jenkins_debug!("Refreshing {} indicators", indicators.len());
        join_all(indicators.iter().map(|indicator| indicator.refresh())).await;
    }

    /// Tracked job names in ascending order.
    pub fn tracked_names(&self) -> Vec<String> {
        lock(&self.state).indicators.keys().cloned().collect()
    }

    pub fn indicator(&self, name: &str) -> Option<Arc<Indicator>> {
        lock(&self.state).indicators.get(name).cloned()
    }

    /// Name and last rendered view of every tracked indicator.
    pub fn views(&self) -> Vec<(String, Option<IndicatorView>)> {
        lock(&self.state)
            .indicators
            .iter()
            .map(|(name, indicator)| (name.clone(), indicator.view()))
            .collect()
    }

    /// Tears down every indicator. Later calls, reconciliations and refreshes do nothing.
    pub fn dispose(&self) {
        let indicators = {
            let mut state = lock(&self.state);
            state.disposed = true;
            state.pending = None;
            state.tracker = TrackerState::new();
            std::mem::take(&mut state.indicators)
        };
        for indicator in indicators.into_values() {
            indicator.dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.state).disposed
    }
}

impl Drop for IndicatorReconciler {
    fn drop(&mut self) {
        self.dispose();
    }
}
