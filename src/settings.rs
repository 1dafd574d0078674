use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_OUTPUT, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS};
use crate::feed::{default_end_date, default_start_date, QuakeQuery};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub starttime: NaiveDate,
    pub endtime: NaiveDate,
    pub timeout_secs: u64,
    pub output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            starttime: default_start_date(),
            endtime: default_end_date(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Settings {
    /// Loads `path`, or the default config location. A missing file means
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);
        if !config_path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut settings = Settings::default();
        let mut config_map = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim(), value.trim().trim_matches('"'));
            }
        }

        if let Some(port_str) = config_map.get("port") {
            match port_str.parse::<u16>() {
                Ok(port) => settings.port = port,
                Err(_) => warn!("Ignoring invalid port in config: {}", port_str),
            }
        }
        if let Some(date_str) = config_map.get("starttime") {
            match parse_date(date_str) {
                Some(date) => settings.starttime = date,
                None => warn!("Ignoring invalid starttime in config: {}", date_str),
            }
        }
        if let Some(date_str) = config_map.get("endtime") {
            match parse_date(date_str) {
                Some(date) => settings.endtime = date,
                None => warn!("Ignoring invalid endtime in config: {}", date_str),
            }
        }
        if let Some(timeout_str) = config_map.get("timeout_secs") {
            match timeout_str.parse::<u64>() {
                Ok(secs) if secs > 0 => settings.timeout_secs = secs,
                _ => warn!("Ignoring invalid timeout_secs in config: {}", timeout_str),
            }
        }
        if let Some(output) = config_map.get("output") {
            if !output.is_empty() {
                settings.output = PathBuf::from(*output);
            }
        }

        settings
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Creating config directory")?;
            }
        }

        let mut content = String::new();
        content.push_str("# QuakeMap Configuration File\n");
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("starttime = {}\n", self.starttime.format("%Y-%m-%d")));
        content.push_str(&format!("endtime = {}\n", self.endtime.format("%Y-%m-%d")));
        content.push_str(&format!("timeout_secs = {}\n", self.timeout_secs));
        content.push_str(&format!("output = \"{}\"\n", self.output.display()));

        std::fs::write(path, content).context("Failed to write to config file")?;
        Ok(())
    }

    pub fn query(&self) -> QuakeQuery {
        QuakeQuery {
            start: self.starttime,
            end: self.endtime,
            ..QuakeQuery::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `quakemap.ini` next to the executable, or at the project root when
    /// running from `target/debug` or `target/release`.
    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push(CONFIG_FILE_NAME);
        path
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
