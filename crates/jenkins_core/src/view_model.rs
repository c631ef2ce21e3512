use crate::{BuildStatus, JobStatus};

/// Tooltip shown for a job configured without a URL.
pub const NO_URL_TOOLTIP: &str = "No URL defined";

/// Glyph shown in front of the job name, in `$(icon)` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Pulse,
    Check,
    Alert,
    Stop,
    /// No URL configured.
    Missing,
}

impl StatusIcon {
    pub fn for_status(status: BuildStatus) -> Self {
        match status {
            BuildStatus::InProgress => StatusIcon::Pulse,
            BuildStatus::Success => StatusIcon::Check,
            BuildStatus::Failed => StatusIcon::Alert,
            BuildStatus::Disabled => StatusIcon::Stop,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            StatusIcon::Pulse => "$(pulse)",
            StatusIcon::Check => "$(check)",
            StatusIcon::Alert => "$(alert)",
            StatusIcon::Stop => "$(stop)",
            StatusIcon::Missing => "$(x)",
        }
    }
}

/// What a display surface should show for one indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorView {
    pub icon: StatusIcon,
    pub text: String,
    pub tooltip: String,
}

impl IndicatorView {
    /// `job_name` is the configured name, not the server's display name.
    pub fn from_status(job_name: &str, status: &JobStatus) -> Self {
        let icon = StatusIcon::for_status(status.status);
        Self {
            icon,
            text: format!("{} {}", icon.glyph(), job_name),
            tooltip: build_tooltip(status),
        }
    }

    pub fn no_url() -> Self {
        let icon = StatusIcon::Missing;
        Self {
            icon,
            text: format!("Jenkins {}", icon.glyph()),
            tooltip: NO_URL_TOOLTIP.to_string(),
        }
    }
}

fn build_tooltip(status: &JobStatus) -> String {
    let mut lines = vec![
        format!("Job Name: {}", status.job_name),
        format!("Status: {}", status.status_label),
        format!("URL: {}", status.url),
        format!("Connection Status: {}", status.connection_label),
    ];
    if status.build_number != 0 {
        lines.push(format!("Build #: {}", status.build_number));
    }
    if status.http_code != 0 {
        lines.push(format!("Code #: {}", status.http_code));
    }
    lines.join("\n")
}
