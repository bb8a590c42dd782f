use assert_cmd::Command;

use std::fs;
use std::path::PathBuf;

fn workdir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("apdlkit-cli-{}-{}", std::process::id(), name));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_emit_prints_command() {
    let mut cmd = Command::cargo_bin("apdlkit").unwrap();
    cmd.args(["mesh", "emit", "vmesh", "nv1=1"]);
    cmd.assert().success().stdout("VMESH,1,,\n");
}

#[test]
fn test_emit_fixed_blank_field() {
    let mut cmd = Command::cargo_bin("apdlkit").unwrap();
    cmd.args(["mesh", "emit", "LATT", "mat=1", "type=3", "secnum=2"]);
    cmd.assert().success().stdout("LATT,1,,3,,,,2\n");
}

#[test]
fn test_emit_unknown_parameter_fails() {
    let mut cmd = Command::cargo_bin("apdlkit").unwrap();
    cmd.args(["mesh", "emit", "amesh", "nv1=1"]);
    cmd.assert().failure().code(1);
}

#[test]
fn test_emit_unknown_command_fails() {
    let mut cmd = Command::cargo_bin("apdlkit").unwrap();
    cmd.args(["mesh", "emit", "remesh"]);
    cmd.assert().failure().code(1);
}

#[test]
fn test_list_succeeds() {
    let mut cmd = Command::cargo_bin("apdlkit").unwrap();
    cmd.args(["mesh", "list", "--filter", "sweep"]);
    cmd.assert().success();
}

#[test]
fn test_submit_missing_credentials_fails() {
    let dir = workdir("no-credentials");
    let main = dir.join("main.py");
    fs::write(&main, "print('hi')\n").unwrap();

    let mut cmd = Command::cargo_bin("apdlkit").unwrap();
    cmd.current_dir(&dir)
        .env_remove("APDLKIT_HPS_HELPER")
        .arg("submit")
        .arg(&main);
    cmd.assert().failure().code(1);
}

#[cfg(unix)]
#[test]
fn test_submit_saves_resolved_config() {
    let dir = workdir("save");
    let main = dir.join("main.py");
    fs::write(&main, "print('hi')\n").unwrap();

    let helper = dir.join("helper.sh");
    fs::write(
        &helper,
        "cat > /dev/null\ncase \"$1\" in\n  create) echo proj-1 ;;\n  status) echo evaluated ;;\nesac\n",
    )
    .unwrap();

    let config = dir.join("hps_config.json");
    fs::write(
        &config,
        r#"{"url": "https://hps:3000/hps", "user": "repuser", "password": "repuser", "num_cores": 4, "stale": 1}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("apdlkit").unwrap();
    cmd.current_dir(&dir)
        .env("APDLKIT_HPS_HELPER", format!("sh {}", helper.display()))
        .arg("submit")
        .arg(&main)
        .args(["--memory", "2048", "--save_config_file", "--wait", "--poll_interval", "0"]);
    cmd.assert().success();

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(saved["num_cores"], 4);
    assert_eq!(saved["memory"], 2048);
    assert_eq!(saved["name"], "My PyMAPDL job");
    assert!(saved.get("stale").is_none());
}
