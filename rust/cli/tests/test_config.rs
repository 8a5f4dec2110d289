mod support;

use std::io::Write;

use serde_json::Value;
use serial_test::serial;
use support::{EnvGuard, SEED, run};

fn cfg() -> Value {
    let res = run(&["cfg"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    serde_json::from_str(&res.stdout).unwrap()
}

fn config_file(body: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(body.as_bytes()).unwrap();
    f
}

#[test]
#[serial]
fn defaults_are_reported_with_their_source() {
    let _env = EnvGuard::clean();
    let v = cfg();
    assert_eq!(v["players"]["value"], 2);
    assert_eq!(v["players"]["source"], "default");
    assert_eq!(v["starting_stack"]["value"], 1000);
    assert_eq!(v["big_blind"]["value"], 10);
    assert_eq!(v["max_session_loss"]["value"], 5000);
    assert_eq!(v["bot_level"]["value"], "medium");
    assert!(v["seed"]["value"].is_null());
}

#[test]
#[serial]
fn file_values_override_defaults() {
    let env = EnvGuard::clean();
    let file = config_file("players = 6\nbig_blind = 20\nbot_level = \"hard\"\n");
    env.set("ANTE_CONFIG", file.path().to_str().unwrap());
    let v = cfg();
    assert_eq!(v["players"]["value"], 6);
    assert_eq!(v["players"]["source"], "file");
    assert_eq!(v["big_blind"]["value"], 20);
    assert_eq!(v["bot_level"]["value"], "hard");
    assert_eq!(v["starting_stack"]["source"], "default");
}

#[test]
#[serial]
fn environment_overrides_file() {
    let env = EnvGuard::clean();
    let file = config_file("players = 6\n");
    env.set("ANTE_CONFIG", file.path().to_str().unwrap());
    env.set("ANTE_PLAYERS", "3");
    let v = cfg();
    assert_eq!(v["players"]["value"], 3);
    assert_eq!(v["players"]["source"], "env");
}

#[test]
#[serial]
fn seed_is_shown_as_commitment() {
    let env = EnvGuard::clean();
    env.set("ANTE_SEED", SEED);
    let res = run(&["cfg"]);
    assert_eq!(res.code, 0);
    assert!(!res.stdout.contains(SEED));
    let v: Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(v["seed"]["source"], "env");
    assert_eq!(v["seed"]["value"].as_str().unwrap().len(), 64);
}

#[test]
#[serial]
fn invalid_values_fail_with_exit_code_2() {
    let env = EnvGuard::clean();
    env.set("ANTE_PLAYERS", "many");
    let res = run(&["cfg"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Invalid players"));

    env.set("ANTE_PLAYERS", "4");
    env.set("ANTE_BIG_BLIND", "5000");
    let res = run(&["cfg"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("big_blind"));
}

#[test]
#[serial]
fn unknown_file_keys_are_rejected() {
    let env = EnvGuard::clean();
    let file = config_file("adaptive = true\n");
    env.set("ANTE_CONFIG", file.path().to_str().unwrap());
    let res = run(&["cfg"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Configuration error"));
}

#[test]
#[serial]
fn missing_config_file_is_reported() {
    let env = EnvGuard::clean();
    env.set("ANTE_CONFIG", "/nonexistent/ante.toml");
    let res = run(&["cfg"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("cannot read config file"));
}
