//! Runtime configuration from the environment (and an optional `.env` file).
//!
//! Keys:
//! - `DATA_PATH`: default input CSV
//! - `MODEL_PATH`: artifact location
//! - `SENDER_NAME`, `SENDER_EMAIL` (falls back to `SMTP_USERNAME`)
//! - `OUTBOX_DIR`: directory the outbox messenger writes to
//!
//! CLI flags override these values in `app`.

use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/leads_sample.csv";
pub const DEFAULT_MODEL_PATH: &str = "models/model.bin";
pub const DEFAULT_SENDER_NAME: &str = "Lead Scorer";

/// Sender identity and delivery target for outreach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachConfig {
    pub sender_name: String,
    pub sender_email: Option<String>,
    pub outbox_dir: Option<PathBuf>,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            sender_name: DEFAULT_SENDER_NAME.to_string(),
            sender_email: None,
            outbox_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub outreach: OutreachConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            outreach: OutreachConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            data_path: get("DATA_PATH").map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from),
            model_path: get("MODEL_PATH").map_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH), PathBuf::from),
            outreach: OutreachConfig {
                sender_name: get("SENDER_NAME").unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string()),
                sender_email: get("SENDER_EMAIL").or_else(|| get("SMTP_USERNAME")),
                outbox_dir: get("OUTBOX_DIR").map(PathBuf::from),
            },
        }
    }
}
