//! Configuration management.

use anyhow::Result;
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vitals::SamplerKind;

use crate::output::OutputFormat;

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "VITALS_CONFIG";

/// Where counters come from.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The local process via `/proc`
    #[default]
    Local,
    /// A JVM through its Jolokia agent
    Jolokia,
}

impl std::str::FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" | "procfs" => Ok(Self::Local),
            "jolokia" | "jvm" => Ok(Self::Jolokia),
            _ => anyhow::bail!("Unknown source: {s}\nValid sources: local, jolokia"),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Default metrics source.
    #[serde(default)]
    pub source: SourceKind,

    /// Jolokia agent URL.
    pub jolokia_url: Option<String>,

    /// Jolokia basic auth user.
    pub username: Option<String>,

    /// Jolokia basic auth password.
    pub password: Option<String>,

    /// Milliseconds between ticks.
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    /// Milliseconds before the first tick.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Tokio worker threads for `watch`.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Samplers run by `watch`.
    #[serde(default = "default_samplers")]
    pub samplers: Vec<SamplerKind>,
}

fn default_period_ms() -> u64 {
    1000
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_workers() -> usize {
    10
}

fn default_samplers() -> Vec<SamplerKind> {
    SamplerKind::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            jolokia_url: None,
            username: None,
            password: None,
            period_ms: default_period_ms(),
            initial_delay_ms: default_initial_delay_ms(),
            workers: default_workers(),
            output_format: None,
            samplers: default_samplers(),
        }
    }
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("rs", "vitals", "vitals")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Update one key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "source" => self.source = value.parse()?,
            "jolokia_url" | "url" => self.jolokia_url = Some(value.to_string()),
            "username" => self.username = Some(value.to_string()),
            "password" => self.password = Some(value.to_string()),
            "period_ms" => self.period_ms = positive(key, value)?,
            "initial_delay_ms" => self.initial_delay_ms = value.parse()?,
            "workers" => self.workers = usize::try_from(positive(key, value)?)?,
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "samplers" => {
                self.samplers = value
                    .split(',')
                    .map(|s| s.trim().parse::<SamplerKind>())
                    .collect::<Result<_, _>>()?;
            }
            _ => {
                anyhow::bail!(
                    "Unknown config key: {}\n\n\
                     Available keys:\n  \
                     source            - Metrics source (local/jolokia)\n  \
                     jolokia_url       - Jolokia agent URL\n  \
                     username          - Jolokia user\n  \
                     password          - Jolokia password\n  \
                     period_ms         - Milliseconds between ticks\n  \
                     initial_delay_ms  - Milliseconds before the first tick\n  \
                     workers           - Worker threads for watch\n  \
                     output_format     - Default output format (pretty/json/csv/yaml)\n  \
                     samplers          - Comma separated samplers (cpu,gc,memory,system)",
                    key
                );
            }
        }
        Ok(())
    }
}

fn positive(key: &str, value: &str) -> Result<u64> {
    let n: u64 = value.parse()?;
    if n == 0 {
        anyhow::bail!("{key} must be greater than zero");
    }
    Ok(n)
}
