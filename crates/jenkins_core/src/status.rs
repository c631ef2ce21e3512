use std::fmt;

/// Job name reported when the server asks for credentials.
pub const AUTHENTICATION_NEEDED: &str = "AUTHENTICATION NEEDED";
/// Job name reported for any unexpected HTTP status.
pub const INVALID_URL: &str = "Invalid URL";

const IN_PROGRESS_SUFFIX: &str = "_anime";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    Success,
    Failed,
    /// Catch-all for unstable, pending, aborted, not built and disabled jobs.
    Disabled,
    InProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Connected,
    InvalidAddress,
    AuthenticationRequired,
    Error,
}

impl ConnectionStatus {
    pub fn description(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::InvalidAddress => "Invalid Address",
            ConnectionStatus::AuthenticationRequired => "Authentication Required",
            ConnectionStatus::Error => "Error",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of a single poll. Superseded wholesale by the next poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub job_name: String,
    pub url: String,
    pub build_number: u64,
    pub status: BuildStatus,
    pub status_label: String,
    pub connection_status: ConnectionStatus,
    pub connection_label: String,
    /// Zero on success and on transport errors.
    pub http_code: u16,
}

impl JobStatus {
    /// A `200` response decoded from the job's color code.
    pub fn connected(
        job_name: impl Into<String>,
        url: impl Into<String>,
        color: &str,
        build_number: u64,
    ) -> Self {
        let (status, status_label) = status_from_color(color);
        Self {
            job_name: job_name.into(),
            url: url.into(),
            build_number,
            status,
            status_label,
            connection_status: ConnectionStatus::Connected,
            connection_label: ConnectionStatus::Connected.description().to_string(),
            http_code: 0,
        }
    }

    /// `401` or `403` from the server.
    pub fn authentication_required(url: impl Into<String>, http_code: u16) -> Self {
        Self::disconnected(
            AUTHENTICATION_NEEDED,
            url,
            ConnectionStatus::AuthenticationRequired,
            http_code,
        )
    }

    /// Any other non-`200` status.
    pub fn invalid_address(url: impl Into<String>, http_code: u16) -> Self {
        Self::disconnected(INVALID_URL, url, ConnectionStatus::InvalidAddress, http_code)
    }

    /// The request never produced a usable response; the error text becomes the job name.
    pub fn unreachable(url: impl Into<String>, error: impl fmt::Display) -> Self {
        Self::disconnected(
            error.to_string(),
            url,
            ConnectionStatus::InvalidAddress,
            0,
        )
    }

    fn disconnected(
        job_name: impl Into<String>,
        url: impl Into<String>,
        connection_status: ConnectionStatus,
        http_code: u16,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            url: url.into(),
            build_number: 0,
            status: BuildStatus::Disabled,
            status_label: "Disabled".to_string(),
            connection_status,
            connection_label: connection_status.description().to_string(),
            http_code,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection_status == ConnectionStatus::Connected
    }
}

/// Decodes a Jenkins color code (`blue`, `red_anime`, ...) into a status and label.
///
/// The `_anime` suffix marks a running build. It turns blue and red into
/// `InProgress`; every other color keeps its kind and gets `" (in progress)"`
/// appended to the label.
pub fn status_from_color(color: &str) -> (BuildStatus, String) {
    let (color_name, in_progress) = match color.strip_suffix(IN_PROGRESS_SUFFIX) {
        Some(base) => (base, true),
        None => (color, false),
    };

    let running = |status: BuildStatus| {
        if in_progress {
            BuildStatus::InProgress
        } else {
            status
        }
    };
    let label = |text: &str| {
        if in_progress {
            format!("{text} (in progress)")
        } else {
            text.to_string()
        }
    };

    match color_name {
        "blue" => (running(BuildStatus::Success), "Success".to_string()),
        "red" => (running(BuildStatus::Failed), "Failed".to_string()),
        "yellow" => (BuildStatus::Disabled, label("Unstable")),
        "grey" => (BuildStatus::Disabled, label("Pending")),
        "aborted" => (BuildStatus::Disabled, label("Aborted")),
        "notbuilt" => (BuildStatus::Disabled, label("Not built")),
        _ => (BuildStatus::Disabled, label("Disabled")),
    }
}
