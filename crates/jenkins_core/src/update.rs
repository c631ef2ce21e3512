use std::collections::HashSet;

use crate::{normalize_names, Effect, JobConfig, Msg, TrackerState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let effects = match msg {
        Msg::SettingsChanged(jobs) => {
            let batch = unique_by_name(normalize_names(jobs));

            let added: Vec<&(String, JobConfig)> = batch
                .iter()
                .filter(|(name, _)| !state.tracks(name))
                .collect();
            let new_names: HashSet<&str> = batch.iter().map(|(name, _)| name.as_str()).collect();
            let removed: Vec<String> = state
                .names()
                .into_iter()
                .filter(|name| !new_names.contains(name.as_str()))
                .collect();

            let mut effects = Vec::with_capacity(added.len() + removed.len() + batch.len());
            for (name, config) in &added {
                effects.push(Effect::CreateIndicator {
                    name: name.clone(),
                    config: config.clone(),
                });
            }
            for name in &removed {
                effects.push(Effect::RemoveIndicator { name: name.clone() });
            }
            for (name, config) in &batch {
                effects.push(Effect::RefreshIndicator {
                    name: name.clone(),
                    config: config.clone(),
                });
            }

            state.replace(&batch);
            effects
        }
        Msg::UpdateRequested => state
            .jobs()
            .map(|(name, config)| Effect::RefreshIndicator {
                name: name.clone(),
                config: config.clone(),
            })
            .collect(),
    };

    (state, effects)
}

/// Keeps the first position of every name and the last config given for it.
fn unique_by_name(jobs: Vec<JobConfig>) -> Vec<(String, JobConfig)> {
    let mut batch: Vec<(String, JobConfig)> = Vec::with_capacity(jobs.len());
    for job in jobs {
        match batch.iter_mut().find(|(name, _)| *name == job.name) {
            Some(slot) => slot.1 = job,
            None => batch.push((job.name.clone(), job)),
        }
    }
    batch
}
