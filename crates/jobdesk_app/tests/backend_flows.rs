use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jobdesk(server: &MockServer, args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_jobdesk"))
        .current_dir(dir.path())
        .env_remove("JOBDESK_API")
        .arg("--api")
        .arg(server.uri())
        .args(args)
        .output()
        .unwrap()
}

async fn mount_applications(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "url": "https://jobs.example/tracked", "status": "SUBMITTED"},
            {"id": 2, "url": "https://jobs.example/running", "status": "IN_PROGRESS"}
        ])))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn apply_on_tracked_url_shows_status_without_enqueueing() {
    let server = MockServer::start().await;
    mount_applications(&server).await;
    Mock::given(method("POST"))
        .and(path("/apply"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"application_ids": [9]})))
        .expect(0)
        .mount(&server)
        .await;

    let output = jobdesk(
        &server,
        &[
            "apply",
            "--url",
            "https://jobs.example/tracked",
            "--title",
            "ML Engineer",
            "--company",
            "Acme",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Already tracked [Submitted]");
}

#[tokio::test(flavor = "multi_thread")]
async fn apply_on_new_url_enqueues_once() {
    let server = MockServer::start().await;
    mount_applications(&server).await;
    Mock::given(method("POST"))
        .and(path("/apply"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"application_ids": [9]})))
        .expect(1)
        .mount(&server)
        .await;

    let output = jobdesk(
        &server,
        &[
            "apply",
            "--url",
            "https://jobs.example/new",
            "--title",
            "Data Scientist",
            "--company",
            "Beta",
            "--source",
            "lever",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Queued application(s): 9"), "stdout was:\n{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn search_cards_show_apply_or_status() {
    let server = MockServer::start().await;
    mount_applications(&server).await;
    Mock::given(method("POST"))
        .and(path("/search/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "ML Engineer", "company": "Acme", "url": "https://jobs.example/tracked", "score": 0.9},
            {"title": "Data Scientist", "company": "Beta", "url": "https://jobs.example/new", "score": 0.75},
            {"title": "Analyst", "company": "Gamma", "url": "https://jobs.example/low", "score": 0.4}
        ])))
        .mount(&server)
        .await;

    let output = jobdesk(&server, &["search", "--min-score", "70"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 2 job(s) at 70%+ fit"), "stdout was:\n{stdout}");
    assert!(stdout.contains("fit 90%  [Submitted]"));
    assert!(stdout.contains("fit 75%  [Apply]"));
    assert!(!stdout.contains("Gamma"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_search_exits_with_short_message() {
    let server = MockServer::start().await;
    mount_applications(&server).await;
    Mock::given(method("POST"))
        .and(path("/search/jobs"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let output = jobdesk(&server, &["search"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to search jobs: http status 502"), "stderr was:\n{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn watch_stops_after_requested_refreshes() {
    let server = MockServer::start().await;
    mount_applications(&server).await;

    let output = jobdesk(&server, &["watch", "--interval-ms", "50", "--refreshes", "2"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Applications [1] ● · 2 tracked"), "stdout was:\n{stdout}");
    assert!(stdout.contains("[In progress]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn health_prints_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "gh_boards": ["acme", "beta"],
            "lever_companies": []
        })))
        .mount(&server)
        .await;

    let output = jobdesk(&server, &["health"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(": ok"));
    assert!(stdout.contains("Greenhouse boards: acme, beta"));
    assert!(stdout.contains("Lever companies: —"));
}
