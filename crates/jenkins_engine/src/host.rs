//! Capabilities the host UI provides to the engine.
//!
//! The engine never renders anything itself. It drives these traits, and the
//! binary (or a test) decides what they do.

use std::sync::Arc;

use crate::CommandHost;

/// One status-bar-like slot showing a single job.
///
/// After `dispose` the surface ignores every further call.
pub trait DisplaySurface: Send {
    fn set_text(&mut self, text: &str);
    fn set_tooltip(&mut self, tooltip: &str);
    fn show(&mut self);
    fn dispose(&mut self);
}

pub trait SurfaceFactory: Send + Sync {
    /// `primary_command` is the id triggered when the surface is clicked.
    fn create(&self, job_name: &str, primary_command: &str) -> Box<dyn DisplaySurface>;
}

pub trait Browser: Send + Sync {
    fn open(&self, url: &str);
}

pub trait Notifier: Send + Sync {
    fn warn(&self, message: &str);
}

/// Lets the user choose one job when several are configured.
#[async_trait::async_trait]
pub trait JobPicker: Send + Sync {
    /// `None` when the user cancels.
    async fn pick(&self, job_names: &[String]) -> Option<String>;
}

/// Bundle of host capabilities shared by the reconciler, its indicators and the controller.
#[derive(Clone)]
pub struct HostServices {
    pub surfaces: Arc<dyn SurfaceFactory>,
    pub commands: Arc<dyn CommandHost>,
    pub browser: Arc<dyn Browser>,
    pub notifier: Arc<dyn Notifier>,
    pub picker: Arc<dyn JobPicker>,
}
