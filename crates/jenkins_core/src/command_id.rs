/// Reloads settings and reconciles the indicators.
pub const GLOBAL_UPDATE_STATUS: &str = "jenkins.updateStatus";
/// Picks a job and delegates to its `openInJenkins` command.
pub const GLOBAL_OPEN_IN_JENKINS: &str = "jenkins.openInJenkins";
/// Picks a job and delegates to its `openInJenkinsConsoleOutput` command.
pub const GLOBAL_OPEN_IN_JENKINS_CONSOLE_OUTPUT: &str = "jenkins.openInJenkinsConsoleOutput";

/// The two actions every indicator exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobAction {
    OpenInJenkins,
    OpenConsoleOutput,
}

impl JobAction {
    pub const ALL: [JobAction; 2] = [JobAction::OpenInJenkins, JobAction::OpenConsoleOutput];

    pub fn suffix(self) -> &'static str {
        match self {
            JobAction::OpenInJenkins => "openInJenkins",
            JobAction::OpenConsoleOutput => "openInJenkinsConsoleOutput",
        }
    }
}

/// Command id scoped to one job, e.g. `Jenkins.CI.openInJenkins`.
pub fn job_command_id(job_name: &str, action: JobAction) -> String {
    format!("Jenkins.{job_name}.{}", action.suffix())
}

/// Console page of a given build: `<url>/<build>/console`.
pub fn console_output_url(job_url: &str, build_number: u64) -> String {
    format!("{}/{build_number}/console", job_url.trim_end_matches('/'))
}
