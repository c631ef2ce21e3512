//! Host capabilities backed by the terminal and the system browser.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use jenkins_engine::{Browser, DisplaySurface, Notifier, SurfaceFactory};
use jenkins_logging::{jenkins_error, jenkins_info, jenkins_warn};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

fn write_line(out: &SharedWriter, line: &str) {
    let mut out = out.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(err) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        jenkins_error!("Could not write to terminal: {}", err);
    }
}

/// Creates one line-oriented surface per job. Each surface prints a line
/// whenever its text changes while shown.
#[derive(Clone)]
pub struct TerminalSurfaces {
    out: SharedWriter,
}

impl TerminalSurfaces {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }
}

impl SurfaceFactory for TerminalSurfaces {
    fn create(&self, job_name: &str, primary_command: &str) -> Box<dyn DisplaySurface> {
        jenkins_info!("Surface for {} opens with {}", job_name, primary_command);
        Box::new(TerminalSurface {
            job_name: job_name.to_string(),
            out: self.out.clone(),
            text: String::new(),
            printed: None,
            disposed: false,
        })
    }
}

struct TerminalSurface {
    job_name: String,
    out: SharedWriter,
    text: String,
    printed: Option<String>,
    disposed: bool,
}

impl DisplaySurface for TerminalSurface {
    fn set_text(&mut self, text: &str) {
        if !self.disposed {
            self.text = text.to_string();
        }
    }

    // Tooltips are shown by the console's `list` command.
    fn set_tooltip(&mut self, _tooltip: &str) {}

    fn show(&mut self) {
        if self.disposed || self.printed.as_deref() == Some(self.text.as_str()) {
            return;
        }
        write_line(&self.out, &format!("[{}] {}", self.job_name, self.text));
        self.printed = Some(self.text.clone());
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if self.printed.is_some() {
            write_line(&self.out, &format!("[{}] removed", self.job_name));
        }
    }
}

/// Opens URLs with the platform's default handler.
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) {
        jenkins_info!("Opening {}", url);
        if let Err(err) = open::that(url) {
            jenkins_error!("Could not open {}: {}", url, err);
        }
    }
}

/// Logs the warning and echoes it on stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn warn(&self, message: &str) {
        jenkins_warn!("{}", message);
        eprintln!("warning: {message}");
    }
}
