mod support;

use serial_test::serial;
use support::{EnvGuard, SEED, run};

#[test]
#[serial]
fn eval_prints_hand_as_json() {
    let _env = EnvGuard::clean();
    let res = run(&["eval", "AsKsQsJsTs"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    let v: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(v["hand"], "Royal Flush");
    assert_eq!(v["value"], 10);
    assert_eq!(v["cards"].as_array().unwrap().len(), 5);
}

#[test]
#[serial]
fn eval_accepts_separate_arguments() {
    let _env = EnvGuard::clean();
    let res = run(&["eval", "Ah", "Ad", "Kc", "Kd", "2s", "7h"]);
    assert_eq!(res.code, 0);
    let v: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(v["hand"], "Two Pair");
    assert_eq!(v["kickers"], serde_json::json!([14, 13, 7]));
}

#[test]
#[serial]
fn eval_rejects_bad_input() {
    let _env = EnvGuard::clean();
    let res = run(&["eval", "AsKsQs"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("ERR_INVALID_HAND_SIZE"));

    let res = run(&["eval", "ZzKsQsJsTs"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.starts_with("Error:"));
}

#[test]
#[serial]
fn deal_is_reproducible_from_seed() {
    let _env = EnvGuard::clean();
    let a = run(&["deal", "--players", "3", "--seed", SEED]);
    let b = run(&["deal", "--players", "3", "--seed", SEED]);
    assert_eq!(a.code, 0, "stderr: {}", a.stderr);
    assert_eq!(a.stdout, b.stdout);

    let lines: Vec<&str> = a.stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("Shuffle commitment: "));
    assert!(lines[1].starts_with("Seat 1: "));
    assert!(lines[3].starts_with("Seat 3: "));
    assert!(lines[4].starts_with("Board: "));
    assert_eq!(lines[4].split_whitespace().count(), 6);
    assert!(lines[5].starts_with("Winner: Seat "));
}

#[test]
#[serial]
fn deal_never_prints_the_seed() {
    let _env = EnvGuard::clean();
    let res = run(&["deal", "--seed", SEED]);
    assert_eq!(res.code, 0);
    assert!(!res.stdout.contains(SEED));
}

#[test]
#[serial]
fn deal_without_seed_uses_fresh_entropy() {
    let _env = EnvGuard::clean();
    let res = run(&["deal"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert_eq!(res.stdout.lines().count(), 5);
}

#[test]
#[serial]
fn deal_rejects_table_size_out_of_range() {
    let _env = EnvGuard::clean();
    assert_eq!(run(&["deal", "--players", "1"]).code, 2);
    let res = run(&["deal", "--players", "11"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("players must be between 2 and 10"));
}

#[test]
#[serial]
fn deal_rejects_malformed_seed() {
    let _env = EnvGuard::clean();
    let res = run(&["deal", "--seed", "abc"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("seed must be 64 hex characters"));
}

#[test]
#[serial]
fn help_goes_to_stdout() {
    let res = run(&["--help"]);
    assert_eq!(res.code, 0);
    assert!(res.stdout.contains("sim"));
    assert!(res.stderr.is_empty());
}

#[test]
#[serial]
fn unknown_command_lists_commands() {
    let res = run(&["shuffle"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Commands:"));
    assert!(res.stderr.contains("  deal"));
}
