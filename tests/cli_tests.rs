mod common;

use common::{run_slidecraft, TestEnv};

#[test]
fn slidecraft_help_shows_usage() {
    let output = run_slidecraft(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "--help should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("Commands:"));
    assert!(stdout.contains("generate"));
}

#[test]
fn slidecraft_version_shows_version() {
    let output = run_slidecraft(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("slidecraft "));
}

#[test]
fn completions_bash_outputs_script() {
    let output = run_slidecraft(&["completions", "bash"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "completions bash should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(
        stdout.contains("slidecraft"),
        "expected completion output to reference command name\nstdout:\n{}",
        stdout
    );
}

#[test]
fn config_show_works() {
    let output = run_slidecraft(&["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "config show should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("[search]"));
    assert!(stdout.contains("[llm]"));
    assert!(stdout.contains("mistralai/mistral-7b-instruct"));
}

#[test]
fn config_show_masks_api_keys() {
    let env = TestEnv::new();
    env.write_config("[llm]\napi_key = \"sk-very-secret\"\n");

    let output = env.run(&["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(!stdout.contains("sk-very-secret"));
    assert!(stdout.contains("********"));
}

#[test]
fn config_path_returns_valid_path() {
    let output = run_slidecraft(&["config", "path"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let env = TestEnv::new();

    let first = env.run(&["config", "init"]);
    assert!(first.status.success());
    assert!(env.config_path().exists());

    let second = env.run(&["config", "init"]);
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("--force"));

    let forced = env.run(&["config", "init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn doctor_json_reports_missing_keys() {
    let output = run_slidecraft(&["doctor", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "doctor should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );

    let report: serde_json::Value = serde_json::from_str(&stdout).expect("doctor json output");
    let checks = report["checks"].as_array().expect("checks array");
    assert_eq!(checks[0]["name"], "search key");
    assert_eq!(checks[0]["status"], "missing");
    assert_eq!(checks[1]["name"], "llm key");
    assert_eq!(checks[1]["status"], "missing");
    assert_eq!(report["config_found"], false);
}

#[test]
fn generate_fails_fast_without_api_keys() {
    let env = TestEnv::new();
    let output = env.run(&["generate", "Climate Change"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("SerpApi API key is missing") && stderr.contains("SERPAPI_API_KEY"),
        "expected missing key error, got:\n{}",
        stderr
    );
    assert!(!env.work_dir().join("Climate_Change_slides.pptx").exists());
}

#[test]
fn generate_reports_missing_llm_key_when_search_key_is_set() {
    let env = TestEnv::new();
    env.write_config("[search]\napi_key = \"serp\"\n");

    let output = env.run(&["generate", "Rust"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("OpenRouter API key is missing"),
        "expected missing key error, got:\n{}",
        stderr
    );
}

#[test]
fn dotenv_file_in_working_dir_supplies_api_keys() {
    let env = TestEnv::new();
    std::fs::write(
        env.work_dir().join(".env"),
        "SERPAPI_API_KEY=serp-test\nOPENROUTER_API_KEY=or-test\n",
    )
    .expect("write .env");

    let output = env.run(&["doctor", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "doctor should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_str(&stdout).expect("doctor json output");
    let checks = report["checks"].as_array().expect("checks array");
    assert_eq!(checks[0]["name"], "search key");
    assert_eq!(checks[0]["status"], "ok");
    assert_eq!(checks[1]["name"], "llm key");
    assert_eq!(checks[1]["status"], "ok");
}

#[test]
fn verbose_logs_missing_config_file() {
    let output = run_slidecraft(&["--verbose", "doctor", "--json"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(
        stderr.contains("No config file found, using defaults"),
        "expected debug log on stderr, got:\n{}",
        stderr
    );
}
