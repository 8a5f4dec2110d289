use std::fs;

use ante_ai::bot::BotLevel;
use ante_engine::rng::ShuffleSeed;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 64 hex chars; a fresh secure seed is drawn when unset
    pub seed: Option<String>,
    pub players: usize,
    pub starting_stack: u64,
    pub big_blind: u64,
    pub max_session_loss: u64,
    pub bot_level: BotLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            players: 2,
            starting_stack: 1_000,
            big_blind: 10,
            max_session_loss: 5_000,
            bot_level: BotLevel::Medium,
        }
    }
}

impl Config {
    pub fn shuffle_seed(&self) -> Result<Option<ShuffleSeed>, ConfigError> {
        self.seed
            .as_deref()
            .map(|hex| {
                ShuffleSeed::from_hex(hex)
                    .map_err(|_| ConfigError::Invalid("seed must be 64 hex characters".into()))
            })
            .transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub players: ValueSource,
    pub starting_stack: ValueSource,
    pub big_blind: ValueSource,
    pub max_session_loss: ValueSource,
    pub bot_level: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            players: ValueSource::Default,
            starting_stack: ValueSource::Default,
            big_blind: ValueSource::Default,
            max_session_loss: ValueSource::Default,
            bot_level: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `ANTE_CONFIG`, then `ANTE_*` variables.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = env_value("ANTE_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.max_session_loss {
            cfg.max_session_loss = v;
            sources.max_session_loss = ValueSource::File;
        }
        if let Some(v) = f.bot_level {
            cfg.bot_level = v;
            sources.bot_level = ValueSource::File;
        }
    }

    if let Some(seed) = env_value("ANTE_SEED") {
        cfg.seed = Some(seed);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_value("ANTE_PLAYERS") {
        cfg.players = parse_env(&v, "players")?;
        sources.players = ValueSource::Env;
    }
    if let Some(v) = env_value("ANTE_STARTING_STACK") {
        cfg.starting_stack = parse_env(&v, "starting_stack")?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(v) = env_value("ANTE_BIG_BLIND") {
        cfg.big_blind = parse_env(&v, "big_blind")?;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(v) = env_value("ANTE_MAX_SESSION_LOSS") {
        cfg.max_session_loss = parse_env(&v, "max_session_loss")?;
        sources.max_session_loss = ValueSource::Env;
    }
    if let Some(v) = env_value("ANTE_BOT_LEVEL") {
        cfg.bot_level = v.parse().map_err(ConfigError::Invalid)?;
        sources.bot_level = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<String>,
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    starting_stack: Option<u64>,
    #[serde(default)]
    big_blind: Option<u64>,
    #[serde(default)]
    max_session_loss: Option<u64>,
    #[serde(default)]
    bot_level: Option<BotLevel>,
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("Invalid {}", name)))
}

pub fn validate_players(players: usize) -> Result<(), ConfigError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        return Err(ConfigError::Invalid(format!(
            "players must be between {} and {}",
            MIN_PLAYERS, MAX_PLAYERS
        )));
    }
    Ok(())
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    validate_players(cfg.players)?;
    if cfg.starting_stack == 0 {
        return Err(ConfigError::Invalid("starting_stack must be >0".into()));
    }
    if cfg.big_blind < 2 || cfg.big_blind > cfg.starting_stack {
        return Err(ConfigError::Invalid(
            "big_blind must be at least 2 and at most starting_stack".into(),
        ));
    }
    if cfg.max_session_loss == 0 {
        return Err(ConfigError::Invalid("max_session_loss must be >0".into()));
    }
    cfg.shuffle_seed()?;
    Ok(())
}
