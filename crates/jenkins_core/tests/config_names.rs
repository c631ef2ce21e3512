use jenkins_core::{normalize_names, JobConfig};
use pretty_assertions::assert_eq;

fn names(jobs: &[JobConfig]) -> Vec<&str> {
    jobs.iter().map(|job| job.name.as_str()).collect()
}

#[test]
fn unnamed_jobs_get_generated_names() {
    let jobs = normalize_names(vec![JobConfig::unnamed("a"), JobConfig::unnamed("b")]);
    assert_eq!(names(&jobs), vec!["Jenkins", "Jenkins 1"]);
}

#[test]
fn named_jobs_do_not_advance_the_counter() {
    let jobs = normalize_names(vec![
        JobConfig::new("CI", "x"),
        JobConfig::unnamed("a"),
        JobConfig::new("Nightly", "y"),
        JobConfig::unnamed("b"),
        JobConfig::unnamed("c"),
    ]);
    assert_eq!(
        names(&jobs),
        vec!["CI", "Jenkins", "Nightly", "Jenkins 1", "Jenkins 2"]
    );
}

#[test]
fn generated_names_skip_explicit_ones() {
    let jobs = normalize_names(vec![
        JobConfig::new("Jenkins", "http://a"),
        JobConfig::unnamed("http://b"),
        JobConfig::new("Jenkins 2", "http://c"),
        JobConfig::unnamed("http://d"),
    ]);
    assert_eq!(
        names(&jobs),
        vec!["Jenkins", "Jenkins 1", "Jenkins 2", "Jenkins 3"]
    );
}

#[test]
fn normalization_is_idempotent() {
    let once = normalize_names(vec![JobConfig::unnamed("a"), JobConfig::unnamed("b")]);
    let twice = normalize_names(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn job_config_parses_camel_case_json() {
    jenkins_logging::initialize_for_tests();
    let raw = r#"{
        "name": "CI",
        "url": "https://ci.example.com/job/app",
        "username": "bot",
        "password": "token",
        "strictTls": false
    }"#;
    let job: JobConfig = serde_json::from_str(raw).unwrap();

    assert_eq!(
        job,
        JobConfig::new("CI", "https://ci.example.com/job/app")
            .with_credentials("bot", "token")
            .with_strict_tls(false)
    );
    assert!(!job.verifies_tls());
}

#[test]
fn missing_fields_default_to_empty() {
    let job: JobConfig = serde_json::from_str("{}").unwrap();

    assert_eq!(job.name, "");
    assert_eq!(job.url, "");
    assert_eq!(job.username_or_empty(), "");
    assert_eq!(job.password_or_empty(), "");
    assert!(job.verifies_tls());
}
