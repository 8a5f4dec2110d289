#![allow(dead_code)]

pub const ENV_KEYS: &[&str] = &[
    "ANTE_CONFIG",
    "ANTE_SEED",
    "ANTE_PLAYERS",
    "ANTE_STARTING_STACK",
    "ANTE_BIG_BLIND",
    "ANTE_MAX_SESSION_LOSS",
    "ANTE_BOT_LEVEL",
];

pub const SEED: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

pub struct CliResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn run(args: &[&str]) -> CliResult {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut argv = vec!["ante"];
    argv.extend_from_slice(args);
    let code = ante_cli::run(argv, &mut out, &mut err);
    CliResult {
        code,
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(err).unwrap(),
    }
}

/// Removes every `ANTE_*` variable now and again on drop. Callers must be `#[serial]`.
pub struct EnvGuard;

impl EnvGuard {
    pub fn clean() -> Self {
        clear();
        EnvGuard
    }

    pub fn set(&self, key: &str, value: &str) {
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        clear();
    }
}

fn clear() {
    for key in ENV_KEYS {
        unsafe {
            std::env::remove_var(key);
        }
    }
}
