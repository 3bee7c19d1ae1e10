use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Every key a complete configuration file carries.
pub const CONFIG_KEYS: [&str; 12] = [
    "database",
    "notifier",
    "app_title",
    "idle_check_seconds",
    "reminder_check_seconds",
    "idle_enabled",
    "windup_enabled",
    "evaluator_enabled",
    "snooze_minutes",
    "default_reminder_time",
    "default_repeat_minutes",
    "wrap_width",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// `desktop` or `console`
    #[serde(default = "default_notifier")]
    pub notifier: String,
    #[serde(default = "default_app_title")]
    pub app_title: String,
    #[serde(default = "default_idle_check_seconds")]
    pub idle_check_seconds: u64,
    #[serde(default = "default_reminder_check_seconds")]
    pub reminder_check_seconds: u64,
    #[serde(default = "default_true")]
    pub idle_enabled: bool,
    #[serde(default = "default_true")]
    pub windup_enabled: bool,
    #[serde(default = "default_true")]
    pub evaluator_enabled: bool,
    #[serde(default = "default_snooze_minutes")]
    pub snooze_minutes: i64,
    #[serde(default = "default_reminder_time")]
    pub default_reminder_time: String,
    #[serde(default = "default_repeat_minutes")]
    pub default_repeat_minutes: i64,
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
}

fn default_notifier() -> String {
    "desktop".to_string()
}
fn default_app_title() -> String {
    "Day Tracker".to_string()
}
fn default_idle_check_seconds() -> u64 {
    30
}
fn default_reminder_check_seconds() -> u64 {
    60
}
fn default_true() -> bool {
    true
}
fn default_snooze_minutes() -> i64 {
    10
}
fn default_reminder_time() -> String {
    "18:30".to_string()
}
fn default_repeat_minutes() -> i64 {
    60
}
fn default_wrap_width() -> usize {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            notifier: default_notifier(),
            app_title: default_app_title(),
            idle_check_seconds: default_idle_check_seconds(),
            reminder_check_seconds: default_reminder_check_seconds(),
            idle_enabled: true,
            windup_enabled: true,
            evaluator_enabled: true,
            snooze_minutes: default_snooze_minutes(),
            default_reminder_time: default_reminder_time(),
            default_repeat_minutes: default_repeat_minutes(),
            wrap_width: default_wrap_width(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rdaytracker")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rdaytracker")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rdaytracker.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rdaytracker.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Keys that a configuration file on disk does not define yet.
    /// Missing keys fall back to their defaults when loading.
    pub fn missing_fields(path: &Path) -> AppResult<Vec<&'static str>> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let yaml: Value = serde_yaml::from_str(&content)?;
        let map = yaml
            .as_mapping()
            .ok_or_else(|| AppError::Config("configuration root is not a mapping".into()))?;

        Ok(CONFIG_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(Value::String((*k).to_string())))
            .collect())
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = expand_tilde(&name);
            if p.is_absolute() { p } else { dir.join(p) }
        } else {
            dir.join("rdaytracker.sqlite")
        };

        if !is_test {
            fs::create_dir_all(&dir)?;

            let config = Self::with_database(db_path.clone());
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
