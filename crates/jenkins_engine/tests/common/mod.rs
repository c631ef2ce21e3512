#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use jenkins_core::JobStatus;
use jenkins_engine::{
    Browser, CommandTable, DisplaySurface, HostServices, JobPicker, Notifier, StatusClient,
    StatusRequest, SurfaceFactory,
};
use tokio::sync::{Notify, Semaphore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceRecord {
    pub primary_command: String,
    pub text: String,
    pub tooltip: String,
    pub visible: bool,
    pub disposed: bool,
}

/// Records what every surface shows, keyed by job name.
#[derive(Clone, Default)]
pub struct RecordingSurfaces {
    records: Arc<Mutex<BTreeMap<String, SurfaceRecord>>>,
    created: Arc<Mutex<HashMap<String, usize>>>,
}

impl RecordingSurfaces {
    pub fn record(&self, name: &str) -> Option<SurfaceRecord> {
        self.records.lock().unwrap().get(name).cloned()
    }

    pub fn created(&self, name: &str) -> usize {
        self.created.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    pub fn live_names(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, record)| !record.disposed)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

struct RecordingSurface {
    name: String,
    records: Arc<Mutex<BTreeMap<String, SurfaceRecord>>>,
    disposed: bool,
}

impl RecordingSurface {
    fn edit(&mut self, f: impl FnOnce(&mut SurfaceRecord)) {
        if self.disposed {
            return;
        }
        if let Some(record) = self.records.lock().unwrap().get_mut(&self.name) {
            f(record);
        }
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_text(&mut self, text: &str) {
        self.edit(|record| record.text = text.to_string());
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.edit(|record| record.tooltip = tooltip.to_string());
    }

    fn show(&mut self) {
        self.edit(|record| record.visible = true);
    }

    fn dispose(&mut self) {
        self.edit(|record| {
            record.visible = false;
            record.disposed = true;
        });
        self.disposed = true;
    }
}

impl SurfaceFactory for RecordingSurfaces {
    fn create(&self, job_name: &str, primary_command: &str) -> Box<dyn DisplaySurface> {
        self.records.lock().unwrap().insert(
            job_name.to_string(),
            SurfaceRecord {
                primary_command: primary_command.to_string(),
                ..SurfaceRecord::default()
            },
        );
        *self
            .created
            .lock()
            .unwrap()
            .entry(job_name.to_string())
            .or_default() += 1;
        Box::new(RecordingSurface {
            name: job_name.to_string(),
            records: self.records.clone(),
            disposed: false,
        })
    }
}

#[derive(Default)]
pub struct RecordingBrowser {
    pub opened: Mutex<Vec<String>>,
}

impl RecordingBrowser {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl Browser for RecordingBrowser {
    fn open(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub warnings: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

/// Answers every pick with a fixed choice and remembers what it was offered.
#[derive(Default)]
pub struct ScriptedPicker {
    pub answer: Option<String>,
    pub offered: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPicker {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            offered: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl JobPicker for ScriptedPicker {
    async fn pick(&self, job_names: &[String]) -> Option<String> {
        self.offered.lock().unwrap().push(job_names.to_vec());
        self.answer.clone()
    }
}

/// Status client returning canned results, with an optional gate that holds
/// every poll until the test releases it.
#[derive(Default)]
pub struct FakeClient {
    statuses: Mutex<HashMap<String, JobStatus>>,
    calls: Mutex<Vec<String>>,
    gate: Option<Semaphore>,
    started: Notify,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn set_status(&self, url: &str, status: JobStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(url.to_string(), status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls().iter().filter(|call| call.as_str() == url).count()
    }

    /// Resolves once a poll has begun (a permit is kept if none is waiting yet).
    pub async fn poll_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self, polls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(polls);
        }
    }
}

#[async_trait::async_trait]
impl StatusClient for FakeClient {
    async fn fetch_status(&self, request: &StatusRequest) -> JobStatus {
        self.calls.lock().unwrap().push(request.url.clone());
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.statuses
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| JobStatus::connected("job", request.url.clone(), "blue", 1))
    }
}

pub struct TestHost {
    pub surfaces: RecordingSurfaces,
    pub commands: CommandTable,
    pub browser: Arc<RecordingBrowser>,
    pub notifier: Arc<RecordingNotifier>,
    pub picker: Arc<ScriptedPicker>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::with_picker(ScriptedPicker::default())
    }

    pub fn with_picker(picker: ScriptedPicker) -> Self {
        jenkins_logging::initialize_for_tests();
        Self {
            surfaces: RecordingSurfaces::default(),
            commands: CommandTable::new(),
            browser: Arc::new(RecordingBrowser::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            picker: Arc::new(picker),
        }
    }

    pub fn services(&self) -> HostServices {
        HostServices {
            surfaces: Arc::new(self.surfaces.clone()),
            commands: Arc::new(self.commands.clone()),
            browser: self.browser.clone(),
            notifier: self.notifier.clone(),
            picker: self.picker.clone(),
        }
    }
}
