use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use log::{debug, info, LevelFilter};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "cpumon.ini";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MonitorConfig {
    /// Initial refresh interval in milliseconds.
    pub interval_ms: u64,
    pub stress_command: String,
    /// Passed verbatim to `stress-ng --timeout`.
    pub stress_timeout: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            stress_command: "/usr/bin/stress-ng".to_string(),
            stress_timeout: "10s".to_string(),
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Locations of the kernel pseudo-files the collectors read.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PathsConfig {
    pub cpuinfo: PathBuf,
    pub meminfo: PathBuf,
    pub loadavg: PathBuf,
    pub mounts: PathBuf,
    pub hwmon: PathBuf,
    pub root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cpuinfo: PathBuf::from("/proc/cpuinfo"),
            meminfo: PathBuf::from("/proc/meminfo"),
            loadavg: PathBuf::from("/proc/loadavg"),
            mounts: PathBuf::from("/proc/mounts"),
            hwmon: PathBuf::from("/sys/class/hwmon"),
            root: PathBuf::from("/"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_file(DEFAULT_CONFIG_FILE)
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    /// Loads `path` as INI. A missing file yields the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let path_str = config_path
            .to_str()
            .context(format!("Config path {} is not valid UTF-8", config_path.display()))?;

        let config = Config::builder()
            .add_source(File::new(path_str, FileFormat::Ini).required(false))
            .build()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize config")?;

        Ok(app_config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();

        let mut config_str = String::new();

        config_str.push_str(&format!(
            "[monitor]\ninterval_ms = {}\nstress_command = {}\nstress_timeout = {}\n\n",
            self.monitor.interval_ms, self.monitor.stress_command, self.monitor.stress_timeout
        ));

        config_str.push_str(&format!(
            "[paths]\ncpuinfo = {}\nmeminfo = {}\nloadavg = {}\nmounts = {}\nhwmon = {}\nroot = {}\n\n",
            self.paths.cpuinfo.display(),
            self.paths.meminfo.display(),
            self.paths.loadavg.display(),
            self.paths.mounts.display(),
            self.paths.hwmon.display(),
            self.paths.root.display()
        ));

        config_str.push_str(&format!("[logging]\nlevel = {}\n", self.logging.level));

        fs::write(config_path, config_str)
            .context(format!("Failed to save config to {}", config_path.display()))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn ini_file() -> NamedTempFile {
        Builder::new().suffix(".ini").tempfile().unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.monitor.interval_ms, 1000);
        assert_eq!(config.monitor.stress_command, "/usr/bin/stress-ng");
        assert_eq!(config.monitor.stress_timeout, "10s");
        assert_eq!(config.paths.cpuinfo, PathBuf::from("/proc/cpuinfo"));
        assert_eq!(config.paths.hwmon, PathBuf::from("/sys/class/hwmon"));
        assert_eq!(config.get_log_level(), LevelFilter::Info);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_file(dir.path().join("absent.ini")).unwrap();
        assert_eq!(config.monitor.interval_ms, 1000);
        assert_eq!(config.paths.root, PathBuf::from("/"));
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = ini_file();
        let config_content = "[monitor]\ninterval_ms = 250\nstress_timeout = \"5s\"\n\n[paths]\nhwmon = \"/tmp/hwmon\"\n\n[logging]\nlevel = debug\n";

        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(config.monitor.interval_ms, 250);
        assert_eq!(config.monitor.interval(), Duration::from_millis(250));
        assert_eq!(config.monitor.stress_timeout, "5s");
        assert_eq!(config.monitor.stress_command, "/usr/bin/stress-ng");
        assert_eq!(config.paths.hwmon, PathBuf::from("/tmp/hwmon"));
        assert_eq!(config.paths.cpuinfo, PathBuf::from("/proc/cpuinfo"));
        assert_eq!(config.get_log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_save_config() {
        let mut config = AppConfig::default();
        config.monitor.interval_ms = 500;
        config.monitor.stress_command = "/opt/bin/stress-ng".to_string();
        config.paths.meminfo = PathBuf::from("/tmp/meminfo");
        config.logging.level = "warn".to_string();

        let temp_file = ini_file();
        config.save(temp_file.path()).unwrap();

        let loaded_config = AppConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(loaded_config.monitor.interval_ms, 500);
        assert_eq!(loaded_config.monitor.stress_command, "/opt/bin/stress-ng");
        assert_eq!(loaded_config.paths.meminfo, PathBuf::from("/tmp/meminfo"));
        assert_eq!(loaded_config.paths.loadavg, PathBuf::from("/proc/loadavg"));
        assert_eq!(loaded_config.get_log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_invalid_log_level_falls_back_to_info() {
        let mut config = AppConfig::default();
        config.logging.level = "chatty".to_string();
        assert_eq!(config.get_log_level(), LevelFilter::Info);
    }
}
