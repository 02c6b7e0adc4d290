use serde_json::json;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use vapi_provisioner::config::{self, KnowledgeFileConfig, ProvisionConfig};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BIN: &str = env!("CARGO_BIN_EXE_vapi-provisioner");

/// The binary with a clean, colourless, log-free environment, run from `dir`.
fn provisioner_cmd(dir: &Path, api_key: Option<&str>) -> Command {
    let mut cmd = Command::new(BIN);
    cmd.current_dir(dir)
        .env_remove("VAPI_API_KEY")
        .env_remove("CLICOLOR_FORCE")
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    if let Some(key) = api_key {
        cmd.env("VAPI_API_KEY", key);
    }
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_csvs(dir: &TempDir) {
    std::fs::write(
        dir.path().join("renters_info.csv"),
        "rental_agreement_number,name\nRA-1001,Jane Doe\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("rental_schedule.csv"),
        "rental_agreement_number,start_date,end_date\nRA-1001,2024-05-01,2024-05-08\n",
    )
    .unwrap();
}

#[test]
fn missing_api_key_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    write_csvs(&dir);

    let output = provisioner_cmd(dir.path(), None)
        .args(["--api-url", "http://127.0.0.1:9"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("Error:"), "{}", out);
    assert!(out.contains("VAPI_API_KEY"), "{}", out);
}

#[test]
fn missing_csv_exits_with_upload_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ProvisionConfig {
        api_url: "http://127.0.0.1:9".into(),
        knowledge_files: vec![KnowledgeFileConfig {
            key: "renters_info".into(),
            path: dir.path().join("absent.csv").to_string_lossy().into_owned(),
        }],
        tools: ProvisionConfig::default().tools.into_iter().take(1).collect(),
        ..ProvisionConfig::default()
    };
    let config_path = dir.path().join("vapi.toml");
    config::save_config(&cfg, &config_path).unwrap();

    let output = provisioner_cmd(dir.path(), Some("test-key"))
        .arg("--config")
        .arg(&config_path)
        .arg("provision")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("Error uploading files:"), "{}", out);
}

#[test]
fn unreadable_config_is_reported_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("vapi.toml");
    std::fs::write(&config_path, "api_url = [").unwrap();

    let output = provisioner_cmd(dir.path(), Some("test-key"))
        .arg("--config")
        .arg(&config_path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("Error:"), "{}", out);
    assert!(out.contains("Failed to load config"), "{}", out);
}

#[tokio::test(flavor = "multi_thread")]
async fn bare_invocation_with_api_url_provisions_and_exits_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "f1" })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/assistant"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "a1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tool"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "t1" })))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path_regex(r"^/assistant/a1$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "a1" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_csvs(&dir);

    let mut cmd = provisioner_cmd(dir.path(), Some("test-key"));
    cmd.args(["--api-url", &server.uri()]);
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();

    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(0), "{}", out);
    assert!(out.contains("Step 1: Files successfully uploaded"), "{}", out);
    assert!(out.contains("assistant_id: a1"), "{}", out);
    assert!(out.contains("Step 4: Tools attached to agent"), "{}", out);
}
