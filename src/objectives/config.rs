use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/objectives.toml";
const DEFAULT_TITLE: &str = "Keep {target}, the {job}, alive.";
const DEFAULT_UNKNOWN_JOB: &str = "crew member";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawObjectivesConfig {
    #[serde(default)]
    random: RawRandom,
    #[serde(default)]
    keep_alive: RawKeepAlive,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRandom {
    seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawKeepAlive {
    title: String,
    unknown_job: String,
}

impl Default for RawKeepAlive {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            unknown_job: DEFAULT_UNKNOWN_JOB.to_string(),
        }
    }
}

/// Runtime configuration derived from `config/objectives.toml`.
#[derive(Resource, Debug, Clone)]
pub struct ObjectivesConfig {
    pub rng_seed: Option<u64>,
    pub keep_alive: KeepAliveConfig,
}

#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Default objective title; `{target}` and `{job}` are substituted.
    pub title: String,
    /// Job label used when the target has no job.
    pub unknown_job: String,
}

impl ObjectivesConfig {
    pub fn load_or_default() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    path.display(),
                    err
                );
                Self::default()
            }),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawObjectivesConfig>(raw).map(Into::into)
    }
}

impl Default for ObjectivesConfig {
    fn default() -> Self {
        RawObjectivesConfig::default().into()
    }
}

impl From<RawObjectivesConfig> for ObjectivesConfig {
    fn from(value: RawObjectivesConfig) -> Self {
        let keep_alive = KeepAliveConfig {
            title: non_blank_or(value.keep_alive.title, DEFAULT_TITLE),
            unknown_job: non_blank_or(value.keep_alive.unknown_job, DEFAULT_UNKNOWN_JOB),
        };

        Self {
            rng_seed: value.random.seed,
            keep_alive,
        }
    }
}

fn non_blank_or(value: String, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
