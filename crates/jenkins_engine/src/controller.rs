use std::sync::{Arc, Mutex, Weak};

use jenkins_core::{
    job_command_id, normalize_names, JobAction, GLOBAL_OPEN_IN_JENKINS,
    GLOBAL_OPEN_IN_JENKINS_CONSOLE_OUTPUT, GLOBAL_UPDATE_STATUS,
};
use jenkins_logging::{jenkins_debug, jenkins_error, jenkins_info};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::StatusClient;
use crate::command::{command_handler, CommandRegistry};
use crate::host::HostServices;
use crate::policy::UpdatePolicy;
use crate::reconciler::IndicatorReconciler;
use crate::settings::SettingsSource;
use crate::sync::lock;

pub const NOT_ENABLED_WARNING: &str =
    "The project is not enabled for Jenkins. Missing .jenkins file.";
pub const NO_JOBS_WARNING: &str =
    "The current project is not enabled for Jenkins. Please review .jenkins file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{}", NOT_ENABLED_WARNING)]
    NotEnabled,
    #[error("{}", NO_JOBS_WARNING)]
    NoJobs,
    #[error("job selection cancelled")]
    SelectionCancelled,
}

/// Wires a settings source and an update policy to the reconciler and owns
/// the three global commands.
pub struct StatusController {
    reconciler: Arc<IndicatorReconciler>,
    settings: Arc<dyn SettingsSource>,
    host: HostServices,
    policy: Mutex<UpdatePolicy>,
    commands: Mutex<CommandRegistry>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl StatusController {
    pub fn new(
        client: Arc<dyn StatusClient>,
        settings: Arc<dyn SettingsSource>,
        policy: UpdatePolicy,
        host: HostServices,
    ) -> Arc<Self> {
        let controller = Arc::new(Self {
            reconciler: Arc::new(IndicatorReconciler::new(client, host.clone())),
            settings,
            commands: Mutex::new(CommandRegistry::new(host.commands.clone())),
            host,
            policy: Mutex::new(policy),
            tasks: Mutex::new(Vec::new()),
            cancel: CancellationToken::new(),
        });
        controller.register_commands();
        controller
    }

    fn register_commands(self: &Arc<Self>) {
        let mut commands = lock(&self.commands);

        let weak = Arc::downgrade(self);
        commands.add(
            GLOBAL_UPDATE_STATUS,
            command_handler(move || {
                let weak = weak.clone();
                async move {
                    if let Some(controller) = weak.upgrade() {
                        let result = controller.update_status().await;
                        controller.report(result);
                    }
                }
            }),
        );

        for (id, action) in [
            (GLOBAL_OPEN_IN_JENKINS, JobAction::OpenInJenkins),
            (
                GLOBAL_OPEN_IN_JENKINS_CONSOLE_OUTPUT,
                JobAction::OpenConsoleOutput,
            ),
        ] {
            let weak: Weak<Self> = Arc::downgrade(self);
            commands.add(
                id,
                command_handler(move || {
                    let weak = weak.clone();
                    async move {
                        if let Some(controller) = weak.upgrade() {
                            let result = controller.open_job(action).await;
                            controller.report(result);
                        }
                    }
                }),
            );
        }
    }

    /// Subscribes to settings changes and update ticks, then loads settings once.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(self: &Arc<Self>) {
        let mut settings_rx = self.settings.subscribe();
        let reconciler = self.reconciler.clone();
        let cancel = self.cancel.clone();
        let settings_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = settings_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let jobs = settings_rx.borrow_and_update().clone();
                        reconciler.reconcile(jobs).await;
                    }
                }
            }
        });

        let mut signal = lock(&self.policy).subscribe();
        let reconciler = self.reconciler.clone();
        let cancel = self.cancel.clone();
        let policy_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    fired = signal.fired() => {
                        if !fired {
                            break;
                        }
                        reconciler.refresh_all().await;
                    }
                }
            }
        });

        lock(&self.tasks).extend([settings_task, policy_task]);
        self.settings.reload().await;
    }

    /// Reconciles against the source's current batch and waits for the pass.
    /// A source that is not enabled leaves the indicators as they are.
    pub async fn update_now(&self) {
        let jobs = if self.settings.is_enabled().await {
            Some(self.settings.current())
        } else {
            None
        };
        self.reconciler.reconcile_optional(jobs).await;
    }

    /// `jenkins.updateStatus`: reloads settings, which triggers a reconciliation.
    pub async fn update_status(&self) -> Result<(), ConfigurationError> {
        if !self.settings.is_enabled().await {
            return Err(ConfigurationError::NotEnabled);
        }
        self.settings.reload().await;
        Ok(())
    }

    /// Picks the job a global command applies to.
    pub async fn select_job(&self) -> Result<String, ConfigurationError> {
        if !self.settings.is_enabled().await {
            return Err(ConfigurationError::NotEnabled);
        }
        let jobs = normalize_names(self.settings.current());
        match jobs.as_slice() {
            [] => Err(ConfigurationError::NoJobs),
            [only] => Ok(only.name.clone()),
            _ => {
                let names: Vec<String> = jobs.iter().map(|job| job.name.clone()).collect();
                self.host
                    .picker
                    .pick(&names)
                    .await
                    .ok_or(ConfigurationError::SelectionCancelled)
            }
        }
    }

    /// Global open commands: select a job, then run its own command.
    pub async fn open_job(&self, action: JobAction) -> Result<(), ConfigurationError> {
        let name = self.select_job().await?;
        let id = job_command_id(&name, action);
        jenkins_debug!("Delegating to {}", id);
        if let Err(err) = self.host.commands.execute(&id).await {
            jenkins_error!("Could not run {}: {}", id, err);
        }
        Ok(())
    }

    fn report(&self, result: Result<(), ConfigurationError>) {
        match result {
            Ok(()) => {}
            Err(ConfigurationError::SelectionCancelled) => {
                jenkins_debug!("Job selection cancelled");
            }
            Err(err) => self.host.notifier.warn(&err.to_string()),
        }
    }

    pub fn reconciler(&self) -> &Arc<IndicatorReconciler> {
        &self.reconciler
    }

    pub fn settings(&self) -> &Arc<dyn SettingsSource> {
        &self.settings
    }

    /// Stops both subscriptions and releases every indicator and command. Idempotent.
    pub fn dispose(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        jenkins_info!("Disposing status controller");
        self.cancel.cancel();
        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }
        lock(&self.policy).dispose();
        lock(&self.commands).dispose_all();
        self.reconciler.dispose();
    }
}

impl Drop for StatusController {
    fn drop(&mut self) {
        self.dispose();
    }
}
