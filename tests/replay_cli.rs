//! Script replay through the library API and the `navflux` binary.

mod common;

use std::process::Command;

use common::{open_panel, start_screen, temp_file};
use navflux::config::{Config, DispatchMode};
use navflux::navigation::{HandlerCall, NavigationAction, NavigationTag};
use navflux::replay::{run_replay, ReplayScript, ScriptError};

const RESTORE_SCRIPT: &str = r#"
[[steps]]
type = "start_activity"
tag = "A"

[[steps]]
type = "open_fragment"
tag = "F0"
parent_tag = "A"
container_id = "main"

[[steps]]
type = "open_fragment"
tag = "F1"
parent_tag = "A"
container_id = "main"
replace_type = "replace_all_visible_in_container"

[[steps]]
type = "start_activity"
tag = "X"

[[steps]]
type = "start_activity"
tag = "B"
replace_current_activity = true

[[steps]]
type = "finish_activity"
"#;

fn navflux_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_navflux"))
}

fn without_keyboard(calls: Vec<HandlerCall>) -> Vec<HandlerCall> {
    calls
        .into_iter()
        .filter(|call| *call != HandlerCall::DismissKeyboard)
        .collect()
}

#[test]
fn test_sync_and_async_replay_agree() {
    let (_dir, path) = temp_file("restore.toml", RESTORE_SCRIPT);
    let script = ReplayScript::load(&path).unwrap();
    assert_eq!(script.steps.len(), 6);

    let sync_report = run_replay(&script, &Config::default()).unwrap();

    let mut config = Config::default();
    config.store.mode = DispatchMode::Async;
    config.store.worker_thread_name = "replay-test-dispatch".to_string();
    let async_report = run_replay(&script, &config).unwrap();

    assert_eq!(sync_report, async_report);
    assert_eq!(
        sync_report.state.active_screen_tag(),
        Some(&NavigationTag::from("A"))
    );
    let calls = without_keyboard(sync_report.calls);
    assert_eq!(
        &calls[calls.len() - 2..],
        &[open_panel("A", "main", "F1"), start_screen("A", None)]
    );
}

#[test]
fn test_replay_from_initial_state() {
    let (_dir, path) = temp_file(
        "seeded.json",
        r#"{
            "initial_state": {
                "active_screen_tag": "A",
                "components": {
                    "A": {"kind": "activity", "tag": "A"},
                    "F1": {"kind": "fragment", "tag": "F1", "container_id": "main", "parent_tag": "A"}
                }
            },
            "steps": [{"type": "close_fragment", "tag": "F1"}]
        }"#,
    );
    let script = ReplayScript::load(&path).unwrap();
    let report = run_replay(&script, &Config::default()).unwrap();

    assert_eq!(report.state.len(), 1);
    assert_eq!(
        report.calls,
        vec![HandlerCall::RemovePanel {
            parent_tag: "A".into(),
            tag: "F1".into(),
        }]
    );
}

#[test]
fn test_invalid_initial_state_rejected() {
    let (_dir, path) = temp_file(
        "orphan.json",
        r#"{
            "initial_state": {
                "components": {
                    "F1": {"kind": "fragment", "tag": "F1", "container_id": "main", "parent_tag": "gone"}
                }
            }
        }"#,
    );
    let script = ReplayScript::load(&path).unwrap();
    assert!(matches!(
        run_replay(&script, &Config::default()),
        Err(ScriptError::InvalidState(_))
    ));
}

#[test]
fn test_unknown_action_type_is_parse_error() {
    let (_dir, path) = temp_file("bad.toml", "[[steps]]\ntype = \"teleport\"\n");
    assert!(matches!(
        ReplayScript::load(&path),
        Err(ScriptError::TomlError { .. })
    ));
}

#[test]
fn test_script_round_trips_through_json() {
    let script = ReplayScript {
        initial_state: None,
        steps: vec![
            NavigationAction::start_activity("A"),
            NavigationAction::open_fragment("F1", "A", "main"),
            NavigationAction::FinishActivity,
        ],
    };
    let encoded = serde_json::to_string(&script).unwrap();
    let (_dir, path) = temp_file("script.json", &encoded);
    assert_eq!(ReplayScript::load(&path).unwrap(), script);
}

#[test]
fn test_cli_replay_prints_json_report() {
    let (dir, script) = temp_file("restore.toml", RESTORE_SCRIPT);
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[logging]\nfilter = \"warn\"\n").unwrap();

    let output = navflux_cmd()
        .arg("--config")
        .arg(&config)
        .arg("replay")
        .arg(&script)
        .arg("--json")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["state"]["active_screen_tag"], "A");
    let last = report["calls"].as_array().and_then(|calls| calls.last()).cloned();
    assert_eq!(
        last,
        Some(serde_json::json!({"call": "start_screen", "tag": "A", "request_code": null}))
    );
}

#[test]
fn test_cli_replay_async_flag() {
    let (dir, script) = temp_file("restore.toml", RESTORE_SCRIPT);
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    let output = navflux_cmd()
        .arg("--config")
        .arg(&config)
        .arg("replay")
        .arg(&script)
        .arg("--async")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Active screen: A"), "stdout: {}", stdout);
}

#[test]
fn test_cli_validate_reports_missing_parent() {
    let (dir, state) = temp_file(
        "state.json",
        r#"{"components": {"F1": {"kind": "fragment", "tag": "F1", "container_id": "main", "parent_tag": "gone"}}}"#,
    );
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    let output = navflux_cmd()
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .arg(&state)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing parent 'gone'"), "stderr: {}", stderr);
}

#[test]
fn test_cli_bad_config_exits_with_error() {
    let (dir, state) = temp_file("state.json", "{}");
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[store]\nmode = \"sideways\"\n").unwrap();

    let output = navflux_cmd()
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .arg(&state)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config file"), "stderr: {}", stderr);
}
