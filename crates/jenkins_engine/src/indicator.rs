use std::sync::{Arc, Mutex, Weak};

use jenkins_core::{console_output_url, job_command_id, IndicatorView, JobAction, JobConfig};
use jenkins_logging::{jenkins_debug, jenkins_trace, jenkins_warn};

use crate::client::{StatusClient, StatusRequest};
use crate::command::{command_handler, CommandRegistry};
use crate::host::{Browser, DisplaySurface, HostServices, Notifier};
use crate::sync::lock;

pub const CONNECTION_ISSUES_WARNING: &str =
    "The Jenkins job has some connection issues. Please check the status bar for more information.";

/// Live tracking object for one job: its display surface plus its two commands.
pub struct Indicator {
    name: String,
    config: Mutex<JobConfig>,
    surface: Mutex<Option<Box<dyn DisplaySurface>>>,
    commands: Mutex<CommandRegistry>,
    last_view: Mutex<Option<IndicatorView>>,
    client: Arc<dyn StatusClient>,
}

impl Indicator {
    pub(crate) fn create(
        name: &str,
        config: JobConfig,
        client: Arc<dyn StatusClient>,
        host: &HostServices,
    ) -> Arc<Self> {
        let surface = host
            .surfaces
            .create(name, &job_command_id(name, JobAction::OpenInJenkins));
        let indicator = Arc::new(Self {
            name: name.to_string(),
            config: Mutex::new(config),
            surface: Mutex::new(Some(surface)),
            commands: Mutex::new(CommandRegistry::new(host.commands.clone())),
            last_view: Mutex::new(None),
            client,
        });
        indicator.register_commands(host);
        indicator
    }

    fn register_commands(self: &Arc<Self>, host: &HostServices) {
        let mut commands = lock(&self.commands);

        let weak = Arc::downgrade(self);
        let browser = host.browser.clone();
        commands.add(
            job_command_id(&self.name, JobAction::OpenInJenkins),
            command_handler(move || {
                let weak = weak.clone();
                let browser = browser.clone();
                async move {
                    if let Some(indicator) = weak.upgrade() {
                        indicator.open_in_jenkins(browser.as_ref());
                    }
                }
            }),
        );

        let weak: Weak<Self> = Arc::downgrade(self);
        let browser = host.browser.clone();
        let notifier = host.notifier.clone();
        commands.add(
            job_command_id(&self.name, JobAction::OpenConsoleOutput),
            command_handler(move || {
                let weak = weak.clone();
                let browser = browser.clone();
                let notifier = notifier.clone();
                async move {
                    if let Some(indicator) = weak.upgrade() {
                        indicator
                            .open_console_output(browser.as_ref(), notifier.as_ref())
                            .await;
                    }
                }
            }),
        );
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> JobConfig {
        lock(&self.config).clone()
    }

    pub(crate) fn set_config(&self, config: JobConfig) {
        *lock(&self.config) = config;
    }

    /// What the surface currently shows; `None` before the first refresh.
    pub fn view(&self) -> Option<IndicatorView> {
        lock(&self.last_view).clone()
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.surface).is_none()
    }

    /// Polls the job and updates the surface. A refresh that completes after
    /// the indicator was disposed changes nothing.
    pub async fn refresh(&self) {
        if self.is_disposed() {
            return;
        }
        let config = self.config();
        let view = if config.url.is_empty() {
            IndicatorView::no_url()
        } else {
            let status = self
                .client
                .fetch_status(&StatusRequest::for_job(&config))
                .await;
            IndicatorView::from_status(&self.name, &status)
        };
        self.render(view);
    }

    fn render(&self, view: IndicatorView) {
        let mut surface = lock(&self.surface);
        let Some(surface) = surface.as_mut() else {
            jenkins_trace!("Dropping refresh for disposed indicator {}", self.name);
            return;
        };
        surface.set_text(&view.text);
        surface.set_tooltip(&view.tooltip);
        surface.show();
        jenkins_debug!("Indicator {} shows {:?}", self.name, view.text);
        *lock(&self.last_view) = Some(view);
    }

    fn open_in_jenkins(&self, browser: &dyn Browser) {
        let url = self.config().url;
        if url.is_empty() {
            jenkins_warn!("Job {} has no URL to open", self.name);
            return;
        }
        browser.open(&url);
    }

    /// Polls again rather than trusting the last rendered status.
    async fn open_console_output(&self, browser: &dyn Browser, notifier: &dyn Notifier) {
        let config = self.config();
        let status = self
            .client
            .fetch_status(&StatusRequest::for_job(&config))
            .await;
        if status.is_connected() {
            browser.open(&console_output_url(&config.url, status.build_number));
        } else {
            notifier.warn(CONNECTION_ISSUES_WARNING);
        }
    }

    /// Disposes the surface and unregisters both commands. Safe to call repeatedly.
    pub fn dispose(&self) {
        if let Some(mut surface) = lock(&self.surface).take() {
            surface.dispose();
        }
        lock(&self.commands).dispose_all();
    }
}

impl Drop for Indicator {
    fn drop(&mut self) {
        self.dispose();
    }
}
