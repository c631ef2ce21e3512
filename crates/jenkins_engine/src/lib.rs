//! Jenkins engine: status polling, indicator lifecycle and command wiring.
mod client;
mod command;
mod controller;
mod host;
mod indicator;
mod policy;
mod reconciler;
mod settings;
mod sync;

pub use client::{ClientSettings, ReqwestStatusClient, StatusClient, StatusRequest};
pub use command::{
    command_handler, CommandError, CommandHandler, CommandHost, CommandRegistration,
    CommandRegistry, CommandTable,
};
pub use controller::{ConfigurationError, StatusController, NOT_ENABLED_WARNING, NO_JOBS_WARNING};
pub use host::{Browser, DisplaySurface, HostServices, JobPicker, Notifier, SurfaceFactory};
pub use indicator::{Indicator, CONNECTION_ISSUES_WARNING};
pub use policy::{PeriodicUpdatePolicy, UpdatePolicy, UpdateSignal, DEFAULT_POLL_INTERVAL};
pub use reconciler::IndicatorReconciler;
pub use settings::{
    load_settings_file, FileSettingsSource, NullSettingsSource, SettingsError, SettingsSource,
    StaticSettingsSource, SCRIPT_SETTINGS_FILENAME, SETTINGS_FILENAME,
};
