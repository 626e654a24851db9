use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

const ENV_PREFIX: &str = "REMINDER_TIMER";
const DEFAULT_TICK_INTERVAL_SECS: u64 = 1;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    pub timer: TimerSettings,
    pub logging: LoggingSettings,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct TimerSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub tick_interval_secs: u64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl TimerSettings {
    /// Tick interval, never shorter than one second.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.max(1))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer: TimerSettings {
                tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
            },
            logging: LoggingSettings {
                filter: DEFAULT_LOG_FILTER.to_string(),
            },
        }
    }
}

/// Read settings from `./config`, the environment and defaults.
///
/// Sources, later ones winning: built-in defaults, `config/base.yaml`,
/// `config/<APP_ENVIRONMENT>.yaml` and `REMINDER_TIMER_*` environment
/// variables (nested keys separated by `__`, e.g.
/// `REMINDER_TIMER_TIMER__TICK_INTERVAL_SECS=2`). Config files are optional.
pub fn read_config() -> Result<Settings, config::ConfigError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
    })?;

    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into());
    let environment = Environment::from_str(&environment).map_err(|_| {
        config::ConfigError::Message(format!("Failed to parse APP_ENVIRONMENT: {environment}"))
    })?;

    read_config_from(&base_path.join("config"), environment)
}

/// Read settings from an explicit config directory.
pub fn read_config_from(
    config_directory: &Path,
    environment: Environment,
) -> Result<Settings, config::ConfigError> {
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .set_default("timer.tick_interval_secs", DEFAULT_TICK_INTERVAL_SECS.to_string())?
        .set_default("logging.filter", DEFAULT_LOG_FILTER)?
        .add_source(config::File::from(config_directory.join("base.yaml")).required(false))
        .add_source(
            config::File::from(config_directory.join(environment_filename)).required(false),
        )
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "reminder-timer-config-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!(Environment::from_str("LOCAL").unwrap(), Environment::Local);
        assert_eq!(
            Environment::from_str("Production").unwrap(),
            Environment::Production
        );
        assert!(Environment::from_str("staging").is_err());
        assert_eq!(Environment::Production.to_string(), "production");
    }

    #[test]
    fn defaults_without_files() {
        let dir = temp_config_dir("empty");
        let settings = read_config_from(&dir, Environment::Local).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.timer.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn environment_file_overrides_base() {
        let dir = temp_config_dir("layered");
        std::fs::write(
            dir.join("base.yaml"),
            "timer:\n  tick_interval_secs: 5\nlogging:\n  filter: warn\n",
        )
        .unwrap();
        std::fs::write(dir.join("production.yaml"), "timer:\n  tick_interval_secs: 2\n").unwrap();

        let settings = read_config_from(&dir, Environment::Production).unwrap();
        assert_eq!(settings.timer.tick_interval_secs, 2);
        assert_eq!(settings.logging.filter, "warn");

        let settings = read_config_from(&dir, Environment::Local).unwrap();
        assert_eq!(settings.timer.tick_interval_secs, 5);
    }

    #[test]
    fn zero_interval_is_raised_to_one_second() {
        let timer = TimerSettings {
            tick_interval_secs: 0,
        };
        assert_eq!(timer.tick_interval(), Duration::from_secs(1));
    }
}
