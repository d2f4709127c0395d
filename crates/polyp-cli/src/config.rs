//! Session configuration file.
//!
//! ```toml
//! [session]
//! out_of_range = "reject"   # or "ignore"
//! cursor = "clamp"          # or "reject"
//! terms = "typed"           # or "escape-all"
//!
//! [keys]
//! next_patient = ["F12", "n"]
//! scan_page = ["F3"]
//! ```
//!
//! Every table and key is optional; omitted values keep their defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use polyp_core::{Key, KeyBindings};
use polyp_model::SessionOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub session: SessionOptions,
    pub keys: KeyConfig,
}

/// Physical key names per logical key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyConfig {
    pub next_patient: Vec<String>,
    pub mark_adenomatous: Vec<String>,
    pub mark_serrated: Vec<String>,
    pub scan_page: Vec<String>,
    pub reset: Vec<String>,
}

impl Default for KeyConfig {
    fn default() -> Self {
        let names = |key: Key| -> Vec<String> {
            KeyBindings::default()
                .names_for(key)
                .map(str::to_uppercase)
                .collect()
        };
        Self {
            next_patient: names(Key::NextPatient),
            mark_adenomatous: names(Key::MarkAdenomatous),
            mark_serrated: names(Key::MarkSerrated),
            scan_page: names(Key::ScanPage),
            reset: names(Key::Reset),
        }
    }
}

impl KeyConfig {
    pub fn to_bindings(&self) -> KeyBindings {
        let mut bindings = KeyBindings::empty();
        let groups = [
            (Key::NextPatient, &self.next_patient),
            (Key::MarkAdenomatous, &self.mark_adenomatous),
            (Key::MarkSerrated, &self.mark_serrated),
            (Key::ScanPage, &self.scan_page),
            (Key::Reset, &self.reset),
        ];
        for (key, names) in groups {
            for name in names {
                bindings.bind(name, key);
            }
        }
        bindings
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse config")
    }

    /// Load the config at `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file given, using defaults");
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("load config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
