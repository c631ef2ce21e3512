use std::collections::HashSet;

use serde::Deserialize;

/// Base name given to jobs that arrive without one.
pub const DEFAULT_JOB_NAME: &str = "Jenkins";

/// One job entry as read from a `.jenkins` settings file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    /// Empty until `normalize_names` has run on the batch.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// `Some(false)` turns certificate verification off for this job's requests.
    #[serde(default)]
    pub strict_tls: Option<bool>,
}

impl JobConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn unnamed(url: impl Into<String>) -> Self {
        Self::new("", url)
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_strict_tls(mut self, strict: bool) -> Self {
        self.strict_tls = Some(strict);
        self
    }

    pub fn username_or_empty(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }

    pub fn password_or_empty(&self) -> &str {
        self.password.as_deref().unwrap_or("")
    }

    pub fn verifies_tls(&self) -> bool {
        self.strict_tls.unwrap_or(true)
    }
}

/// Gives every unnamed job a generated name: `Jenkins`, `Jenkins 1`, `Jenkins 2`, ...
///
/// The counter only advances on unnamed entries, so named jobs in between do not
/// shift the numbering. Candidates already taken by an explicit name in the batch
/// are skipped. Explicit names are left untouched.
pub fn normalize_names(mut jobs: Vec<JobConfig>) -> Vec<JobConfig> {
    let taken: HashSet<String> = jobs
        .iter()
        .filter(|job| !job.name.is_empty())
        .map(|job| job.name.clone())
        .collect();
    let mut counter = 0usize;
    for job in &mut jobs {
        if !job.name.is_empty() {
            continue;
        }
        let name = loop {
            let candidate = generated_name(counter);
            counter += 1;
            if !taken.contains(&candidate) {
                break candidate;
            }
        };
        job.name = name;
    }
    jobs
}

fn generated_name(counter: usize) -> String {
    if counter == 0 {
        DEFAULT_JOB_NAME.to_string()
    } else {
        format!("{DEFAULT_JOB_NAME} {counter}")
    }
}
