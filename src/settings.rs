use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::util::write_json_pretty;

pub const CONFIG_FILE_NAME: &str = "config.json";

const DEFAULT_DESCRIPTION: &str = "\
Delivery instructions

1. After payment, contact the seller through the marketplace chat.
2. Provide your in-game username for verification.
3. Follow the delivery steps the seller sends you.
4. Confirm receipt once the item is secured.

Fast - Easy - Secure

Thank you for your purchase!";

/// Operator configuration, one value per process, persisted as
/// `config.json` under the data root.
///
/// Field order here is the key order in the file; saving the same value
/// twice produces byte-identical output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub active_ledger_path: PathBuf,
    pub log_directory: PathBuf,
    pub image_directory: PathBuf,
    pub browser_profile_path: Option<PathBuf>,
    pub default_description: String,
    pub initial_setup_done: bool,
}

impl Settings {
    pub fn config_path(data_root: &Path) -> PathBuf {
        data_root.join(CONFIG_FILE_NAME)
    }

    /// Hard-coded baseline. Pure, no I/O.
    pub fn defaults(data_root: &Path) -> Settings {
        Settings {
            active_ledger_path: data_root.join("items.csv"),
            log_directory: data_root.join("logs"),
            image_directory: data_root.join("img"),
            browser_profile_path: None,
            default_description: DEFAULT_DESCRIPTION.to_string(),
            initial_setup_done: false,
        }
    }

    /// Loads settings from the data root.
    ///
    /// A missing or unparseable config file is healed by persisting defaults
    /// and returning them; corruption is never surfaced to the caller. When
    /// the file parses, every field is merged independently: a present,
    /// non-empty, correctly-typed value overrides its default, anything else
    /// falls back field by field. Only a write failure while persisting the
    /// healed defaults propagates.
    pub fn load(data_root: &Path) -> Result<Settings> {
        let path = Self::config_path(data_root);

        if !path.exists() {
            let settings = Self::defaults(data_root);
            settings.save(data_root)?;
            return Ok(settings);
        }

        let parsed = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok());

        let raw = match parsed {
            Some(value) => value,
            None => {
                warn!(path = %path.display(), "config unreadable, rewriting defaults");
                let settings = Self::defaults(data_root);
                settings.save(data_root)?;
                return Ok(settings);
            }
        };

        let defaults = Self::defaults(data_root);

        Ok(Settings {
            active_ledger_path: string_field(&raw, "activeLedgerPath")
                .map(PathBuf::from)
                .unwrap_or(defaults.active_ledger_path),
            log_directory: string_field(&raw, "logDirectory")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_directory),
            image_directory: string_field(&raw, "imageDirectory")
                .map(PathBuf::from)
                .unwrap_or(defaults.image_directory),
            browser_profile_path: string_field(&raw, "browserProfilePath").map(PathBuf::from),
            default_description: string_field(&raw, "defaultDescription")
                .unwrap_or(defaults.default_description),
            initial_setup_done: raw
                .get("initialSetupDone")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    /// Persists the settings, creating the data root if needed.
    pub fn save(&self, data_root: &Path) -> Result<()> {
        write_json_pretty(&Self::config_path(data_root), self)
    }
}

/// Present, string-typed, non-blank value of `key`, or None.
fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
