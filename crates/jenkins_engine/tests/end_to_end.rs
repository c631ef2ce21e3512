mod common;

use std::sync::Arc;

use common::TestHost;
use jenkins_core::{JobConfig, GLOBAL_OPEN_IN_JENKINS_CONSOLE_OUTPUT};
use jenkins_engine::{
    CommandHost, ReqwestStatusClient, StaticSettingsSource, StatusController, UpdatePolicy,
    CONNECTION_ISSUES_WARNING,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn polled_job_is_rendered_and_console_opens_last_build() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/app/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "color": "blue",
            "displayName": "app",
            "url": format!("{}/job/app/", server.uri()),
            "lastBuild": { "number": 42 }
        })))
        .mount(&server)
        .await;
    let job_url = format!("{}/job/app", server.uri());

    let host = TestHost::new();
    let settings = Arc::new(StaticSettingsSource::new(vec![JobConfig::new(
        "CI",
        job_url.clone(),
    )]));
    let controller = StatusController::new(
        Arc::new(ReqwestStatusClient::default()),
        settings,
        UpdatePolicy::Null,
        host.services(),
    );
    controller.update_now().await;

    let record = host.surfaces.record("CI").unwrap();
    assert_eq!(record.text, "$(check) CI");
    assert!(record.tooltip.contains("Job Name: app"));
    assert!(record.tooltip.contains("Status: Success"));
    assert!(record.tooltip.contains("Connection Status: Connected"));
    assert!(record.tooltip.contains("Build #: 42"));
    assert!(!record.tooltip.contains("Code #"));

    host.commands
        .execute(GLOBAL_OPEN_IN_JENKINS_CONSOLE_OUTPUT)
        .await
        .unwrap();

    assert_eq!(host.browser.opened(), vec![format!("{job_url}/42/console")]);
    assert!(host.notifier.warnings().is_empty());
}

#[tokio::test]
async fn rejected_credentials_show_stop_icon_and_block_console() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/locked/api/json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let host = TestHost::new();
    let settings = Arc::new(StaticSettingsSource::new(vec![JobConfig::new(
        "Locked",
        format!("{}/job/locked", server.uri()),
    )
    .with_credentials("bot", "wrong")]));
    let controller = StatusController::new(
        Arc::new(ReqwestStatusClient::default()),
        settings,
        UpdatePolicy::Null,
        host.services(),
    );
    controller.update_now().await;

    let record = host.surfaces.record("Locked").unwrap();
    assert_eq!(record.text, "$(stop) Locked");
    assert!(record.tooltip.contains("Job Name: AUTHENTICATION NEEDED"));
    assert!(record.tooltip.contains("Connection Status: Authentication Required"));
    assert!(record.tooltip.contains("Code #: 401"));
    assert!(!record.tooltip.contains("Build #"));

    host.commands
        .execute("Jenkins.Locked.openInJenkinsConsoleOutput")
        .await
        .unwrap();

    assert!(host.browser.opened().is_empty());
    assert_eq!(
        host.notifier.warnings(),
        vec![CONNECTION_ISSUES_WARNING.to_string()]
    );
}
