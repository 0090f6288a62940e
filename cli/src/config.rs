//! CLI Configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::CliError;
use crate::output::OutputFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Keys accepted by `reporta config set|get`.
pub const KEYS: [&str; 4] = ["api_url", "token", "username", "default_format"];

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub username: Option<String>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self, CliError> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf, CliError> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.default_format.as_deref().and_then(|f| <OutputFormat as clap::ValueEnum>::from_str(f, true).ok())
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), CliError> {
        match key {
            "api_url" => self.api_url = Some(value),
            "token" => self.token = Some(value),
            "username" => self.username = Some(value),
            "default_format" => {
                if <OutputFormat as clap::ValueEnum>::from_str(&value, true).is_err() {
                    return Err(CliError::Config(format!("unknown format {value}, use table, json or yaml")));
                }
                self.default_format = Some(value)
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Value for display; the token is masked.
    pub fn get(&self, key: &str) -> Result<Option<String>, CliError> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "token" => self.token.as_deref().map(mask),
            "username" => self.username.clone(),
            "default_format" => self.default_format.clone(),
            _ => return Err(unknown_key(key)),
        })
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf, CliError> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("cannot find home directory".into()))?;
        let filename = match profile {
            Some(p) => format!("config.{p}.toml"),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".reporta").join(filename))
    }
}

fn unknown_key(key: &str) -> CliError {
    CliError::Config(format!("unknown config key {key}, expected one of {}", KEYS.join(", ")))
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(8).collect();
    format!("{visible}****")
}
