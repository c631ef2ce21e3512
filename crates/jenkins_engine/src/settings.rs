use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jenkins_core::JobConfig;
use jenkins_logging::{jenkins_error, jenkins_info, jenkins_warn};
use serde::Deserialize;
use tokio::sync::watch;

/// JSON settings file looked up in every folder.
pub const SETTINGS_FILENAME: &str = ".jenkins";
/// Script settings from the editor extension; recognised but not loaded.
pub const SCRIPT_SETTINGS_FILENAME: &str = ".jenkinsrc.js";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Supplies the ordered list of job configs and announces changes.
#[async_trait::async_trait]
pub trait SettingsSource: Send + Sync {
    /// Whether any job source exists at all.
    async fn is_enabled(&self) -> bool;

    /// Last published batch.
    fn current(&self) -> Vec<JobConfig>;

    /// Re-reads the source and publishes the result.
    async fn reload(&self);

    fn subscribe(&self) -> watch::Receiver<Vec<JobConfig>>;
}

/// Publishing half shared by the settings sources.
struct SettingsChannel {
    tx: watch::Sender<Vec<JobConfig>>,
}

impl SettingsChannel {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self { tx }
    }

    fn current(&self) -> Vec<JobConfig> {
        self.tx.borrow().clone()
    }

    /// Always notifies, even when the batch is unchanged.
    fn publish(&self, jobs: Vec<JobConfig>) {
        self.tx.send_replace(jobs);
    }

    fn subscribe(&self) -> watch::Receiver<Vec<JobConfig>> {
        self.tx.subscribe()
    }
}

/// No job source; every global command reports that Jenkins is not enabled.
pub struct NullSettingsSource {
    channel: SettingsChannel,
}

impl NullSettingsSource {
    pub fn new() -> Self {
        Self {
            channel: SettingsChannel::new(),
        }
    }
}

impl Default for NullSettingsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SettingsSource for NullSettingsSource {
    async fn is_enabled(&self) -> bool {
        false
    }

    fn current(&self) -> Vec<JobConfig> {
        self.channel.current()
    }

    async fn reload(&self) {}

    fn subscribe(&self) -> watch::Receiver<Vec<JobConfig>> {
        self.channel.subscribe()
    }
}

/// In-memory source, enabled whenever it holds at least one job.
pub struct StaticSettingsSource {
    channel: SettingsChannel,
}

impl StaticSettingsSource {
    pub fn new(jobs: Vec<JobConfig>) -> Self {
        let channel = SettingsChannel::new();
        channel.tx.send_replace(jobs);
        Self { channel }
    }

    pub fn set(&self, jobs: Vec<JobConfig>) {
        self.channel.publish(jobs);
    }
}

#[async_trait::async_trait]
impl SettingsSource for StaticSettingsSource {
    async fn is_enabled(&self) -> bool {
        !self.channel.current().is_empty()
    }

    fn current(&self) -> Vec<JobConfig> {
        self.channel.current()
    }

    async fn reload(&self) {
        self.channel.publish(self.channel.current());
    }

    fn subscribe(&self) -> watch::Receiver<Vec<JobConfig>> {
        self.channel.subscribe()
    }
}

/// Reads `.jenkins` files from a list of folders, in folder order.
pub struct FileSettingsSource {
    folders: Vec<PathBuf>,
    channel: SettingsChannel,
}

impl FileSettingsSource {
    pub fn new(folders: Vec<PathBuf>) -> Self {
        Self {
            folders,
            channel: SettingsChannel::new(),
        }
    }

    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    fn load_all(&self) -> Vec<JobConfig> {
        let mut jobs = Vec::new();
        for folder in &self.folders {
            let path = folder.join(SETTINGS_FILENAME);
            if !path.is_file() {
                if folder.join(SCRIPT_SETTINGS_FILENAME).is_file() {
                    jenkins_warn!(
                        "{:?} uses {} settings, which are not supported; skipping",
                        folder,
                        SCRIPT_SETTINGS_FILENAME
                    );
                }
                continue;
            }
            match load_settings_file(&path) {
                Ok(loaded) => {
                    jenkins_info!("Loaded {} jobs from {:?}", loaded.len(), path);
                    jobs.extend(loaded);
                }
                Err(err) => jenkins_error!("Error while retrieving Jenkins settings: {}", err),
            }
        }
        jobs
    }
}

#[async_trait::async_trait]
impl SettingsSource for FileSettingsSource {
    async fn is_enabled(&self) -> bool {
        self.folders.iter().any(|folder| {
            folder.join(SETTINGS_FILENAME).is_file()
                || folder.join(SCRIPT_SETTINGS_FILENAME).is_file()
        })
    }

    fn current(&self) -> Vec<JobConfig> {
        self.channel.current()
    }

    async fn reload(&self) {
        self.channel.publish(self.load_all());
    }

    fn subscribe(&self) -> watch::Receiver<Vec<JobConfig>> {
        self.channel.subscribe()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SettingsFile {
    Many(Vec<JobConfig>),
    One(JobConfig),
}

/// Parses one settings file holding either a single job object or an array of them.
pub fn load_settings_file(path: &Path) -> Result<Vec<JobConfig>, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: SettingsFile =
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(match parsed {
        SettingsFile::Many(jobs) => jobs,
        SettingsFile::One(job) => vec![job],
    })
}
