use assert_cmd::cargo::cargo_bin_cmd;
use localcode::Config;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &Path, config: &Config) -> PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(config).unwrap()).unwrap();
    path
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join(name);
    std::fs::write(&script, body).unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();
    script
}

/// Local stand-in for the runtime API: serving, with the given models in
/// its local store.
async fn spawn_api_stub(models: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"version": "0.0.0"})),
        )
        .mount(&server)
        .await;

    let models: Vec<_> = models.iter().map(|m| serde_json::json!({"name": m})).collect();
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"models": models})),
        )
        .mount(&server)
        .await;
    server
}

#[test]
fn config_set_then_get_round_trips() {
    let td = TempDir::new().unwrap();
    let config_path = td.path().join("config.json");

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .args(["config", "set", "model", "llama3.2:3b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration updated"));

    // get output is bare so scripts can consume it
    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .args(["config", "get", "model"])
        .assert()
        .success()
        .stdout("llama3.2:3b\n");

    // Unrelated keys keep their defaults
    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .args(["config", "get", "opencode.provider"])
        .assert()
        .success()
        .stdout("ollama\n");
}

#[test]
fn config_set_rejects_unknown_key() {
    let td = TempDir::new().unwrap();
    let config_path = td.path().join("config.json");

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .args(["config", "set", "nonsense.key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown configuration key"));

    assert!(!config_path.exists(), "rejected set must write nothing");
}

#[test]
fn config_set_validates_values() {
    let td = TempDir::new().unwrap();
    let config_path = td.path().join("config.json");

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .args(["config", "set", "ollama.startup_timeout_secs", "0"])
        .assert()
        .failure();

    assert!(!config_path.exists());
}

#[test]
fn config_show_json_is_parseable() {
    let td = TempDir::new().unwrap();
    let config_path = td.path().join("config.json");

    let output = cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: Config = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config.version, "1.0");
}

#[test]
fn config_path_prints_override() {
    let td = TempDir::new().unwrap();
    let config_path = td.path().join("config.json");

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(config_path.to_str().unwrap()));
}

#[test]
fn status_reports_missing_environment() {
    let td = TempDir::new().unwrap();
    let mut config = Config::default();
    config.ollama.binary = "definitely-missing-ollama".to_string();
    config.opencode.binary = "definitely-missing-opencode".to_string();
    // discard port: connection refused immediately, nothing external touched
    config.ollama.host = "http://127.0.0.1:9".to_string();
    let config_path = write_config(td.path(), &config);

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .arg("status")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Environment not ready"));
}

#[test]
fn up_no_install_fails_before_any_later_step() {
    let td = TempDir::new().unwrap();
    let mut config = Config::default();
    config.ollama.binary = "definitely-missing-ollama".to_string();
    config.ollama.host = "http://127.0.0.1:9".to_string();
    let config_path = write_config(td.path(), &config);

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .args(["up", "--no-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not installed"))
        // the failing step's marker prints, later ones never do
        .stdout(predicate::str::contains("[1/4]"))
        .stdout(predicate::str::contains("[2/4]").not());
}

#[test]
fn pull_requires_reachable_service() {
    let td = TempDir::new().unwrap();
    let mut config = Config::default();
    // a binary that resolves, so the failure is the service check
    config.ollama.binary = "sh".to_string();
    config.ollama.host = "http://127.0.0.1:9".to_string();
    let config_path = write_config(td.path(), &config);

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .args(["pull", "some-model"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("localcode up"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn up_propagates_pull_failure_and_stops() {
    let server = spawn_api_stub(&[]).await;
    let td = TempDir::new().unwrap();
    let ollama = write_script(
        td.path(),
        "fake-ollama",
        "#!/bin/sh\nif [ \"$1\" = \"pull\" ]; then exit 42; fi\nexit 0\n",
    );

    let mut config = Config::default();
    config.ollama.binary = ollama.to_str().unwrap().to_string();
    config.ollama.host = server.uri();
    config.model = "testmodel".to_string();
    let config_path = write_config(td.path(), &config);

    // The pull's own exit status becomes the process exit status, and
    // the assistant steps never run.
    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .arg("up")
        .assert()
        .code(42)
        .stderr(predicate::str::contains("status 42"))
        .stdout(predicate::str::contains("[2/4]"))
        .stdout(predicate::str::contains("[3/4]").not())
        .stdout(predicate::str::contains("[4/4]").not());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn up_with_everything_present_only_configures() {
    let server = spawn_api_stub(&["testmodel"]).await;
    let td = TempDir::new().unwrap();
    let ollama = write_script(td.path(), "fake-ollama", "#!/bin/sh\nexit 0\n");
    let calls = td.path().join("opencode-calls.log");
    let opencode = write_script(
        td.path(),
        "fake-opencode",
        &format!("#!/bin/sh\necho \"$@\" >> {}\n", calls.display()),
    );

    let mut config = Config::default();
    config.ollama.binary = ollama.to_str().unwrap().to_string();
    config.ollama.host = server.uri();
    config.opencode.binary = opencode.to_str().unwrap().to_string();
    config.model = "testmodel".to_string();
    let config_path = write_config(td.path(), &config);

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .arg("up")
        .assert()
        .success()
        .stdout(predicate::str::contains("already present"))
        .stdout(predicate::str::contains("not found, installing").not())
        .stdout(predicate::str::contains("Pulling").not());

    // Only the two config sets touched anything
    let logged = std::fs::read_to_string(&calls).unwrap();
    let lines: Vec<&str> = logged.lines().collect();
    assert_eq!(
        lines,
        vec!["config set provider ollama", "config set model testmodel"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn status_reports_unknown_model_when_listing_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"version": "0.0.0"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(500).set_body_string("store corrupt"))
        .mount(&server)
        .await;

    let td = TempDir::new().unwrap();
    let mut config = Config::default();
    config.ollama.binary = "sh".to_string();
    config.opencode.binary = "sh".to_string();
    config.ollama.host = server.uri();
    let config_path = write_config(td.path(), &config);

    // Serving but the tags call fails: not "Missing", and still not ready.
    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .arg("status")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown"))
        .stdout(predicate::str::contains("Missing").not());
}

// Full-flow tests against the real host environment. These install
// software and download models; opt in explicitly.

#[test]
fn up_twice_performs_no_redundant_work() {
    if std::env::var("LOCALCODE_INTEGRATION_TESTS").ok().as_deref() != Some("1") {
        return;
    }

    let td = TempDir::new().unwrap();
    let config_path = td.path().join("config.json");

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .arg("up")
        .assert()
        .success();

    // Every guard short-circuits on the second run
    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .arg("up")
        .assert()
        .success()
        .stdout(predicate::str::contains("not found, installing").not())
        .stdout(predicate::str::contains("already"));
}

#[test]
fn status_succeeds_after_up() {
    if std::env::var("LOCALCODE_INTEGRATION_TESTS").ok().as_deref() != Some("1") {
        return;
    }

    let td = TempDir::new().unwrap();
    let config_path = td.path().join("config.json");

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .arg("up")
        .assert()
        .success();

    cargo_bin_cmd!("localcode")
        .args(["--config", config_path.to_str().unwrap()])
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Everything ready"));
}
