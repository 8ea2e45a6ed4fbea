//! Layered settings: defaults, an optional file, then `WARPTAIL_*` variables.
//!
//! ```toml
//! window = "10m"
//! interval = "60s"
//! smoothing = 3
//! on_malformed = "drop"
//! refresh = "1s"
//! log_level = "info"
//! ```

use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

use crate::data::{parse_duration, SamplePolicy, SeriesConfig};

/// Prefix for environment overrides, e.g. `WARPTAIL_WINDOW=5m`.
const ENV_PREFIX: &str = "WARPTAIL";

/// Errors from loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid duration for `{key}`: {message}")]
    Duration { key: &'static str, message: String },

    #[error("`{key}` must be greater than zero")]
    Zero { key: &'static str },

    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

/// Dashboard engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Trailing window shown on the chart.
    pub window: String,
    /// Expected sampling interval; longer gaps are filled.
    pub interval: String,
    /// Moving average width in samples.
    pub smoothing: usize,
    pub on_malformed: SamplePolicy,
    /// How often `--watch` polls the snapshot file.
    pub refresh: String,
    pub log_level: Option<String>,
}

/// Values given explicitly on the command line. `None` keeps the loaded value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub window: Option<String>,
    pub interval: Option<String>,
    pub smoothing: Option<usize>,
    pub on_malformed: Option<SamplePolicy>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: "10m".to_string(),
            interval: "60s".to_string(),
            smoothing: 3,
            on_malformed: SamplePolicy::Drop,
            refresh: "1s".to_string(),
            log_level: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the environment.
    ///
    /// The file format is taken from its extension. A path that does not
    /// exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Load with an explicit environment source layered over the file.
    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder.add_source(env.try_parsing(true)).build()?;

        Ok(config.try_deserialize()?)
    }

    /// Apply command-line values on top of the loaded settings.
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(window) = &overrides.window {
            self.window = window.clone();
        }
        if let Some(interval) = &overrides.interval {
            self.interval = interval.clone();
        }
        if let Some(smoothing) = overrides.smoothing {
            self.smoothing = smoothing;
        }
        if let Some(policy) = overrides.on_malformed {
            self.on_malformed = policy;
        }
        self
    }

    /// Check every setting, returning the first problem found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.series_config()?;
        self.refresh_interval()?;
        self.level()?;
        Ok(())
    }

    /// The engine-facing window, interval and smoothing width.
    pub fn series_config(&self) -> Result<SeriesConfig, SettingsError> {
        let window = positive_delta("window", &self.window)?;
        let interval = positive_delta("interval", &self.interval)?;
        if self.smoothing == 0 {
            return Err(SettingsError::Zero { key: "smoothing" });
        }

        Ok(SeriesConfig {
            window,
            interval,
            smoothing: self.smoothing,
        })
    }

    /// Poll period for watch mode.
    pub fn refresh_interval(&self) -> Result<Duration, SettingsError> {
        let refresh = duration("refresh", &self.refresh)?;
        if refresh.is_zero() {
            return Err(SettingsError::Zero { key: "refresh" });
        }
        Ok(refresh)
    }

    /// The configured log level, if any.
    pub fn level(&self) -> Result<Option<Level>, SettingsError> {
        self.log_level
            .as_deref()
            .map(|level| {
                level
                    .parse::<Level>()
                    .map_err(|_| SettingsError::LogLevel(level.to_string()))
            })
            .transpose()
    }
}

fn duration(key: &'static str, value: &str) -> Result<Duration, SettingsError> {
    parse_duration(value).map_err(|e| SettingsError::Duration {
        key,
        message: e.to_string(),
    })
}

fn positive_delta(key: &'static str, value: &str) -> Result<TimeDelta, SettingsError> {
    let parsed = duration(key, value)?;
    let delta = TimeDelta::from_std(parsed).map_err(|e| SettingsError::Duration {
        key,
        message: e.to_string(),
    })?;

    // Sub-millisecond values cannot space millisecond timestamps.
    if delta.num_milliseconds() <= 0 {
        return Err(SettingsError::Zero { key });
    }
    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn defaults_match_chart_constants() {
        let settings = Settings::default();
        assert_eq!(settings.series_config().unwrap(), SeriesConfig::default());
        assert_eq!(settings.refresh_interval().unwrap(), Duration::from_secs(1));
        assert_eq!(settings.level().unwrap(), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let file = toml_file(
            r#"
            window = "5m"
            interval = "30s"
            smoothing = 5
            on_malformed = "reject"
            log_level = "debug"
            "#,
        );

        let settings = Settings::load_with_env(Some(file.path()), env(&[])).unwrap();
        assert_eq!(settings.on_malformed, SamplePolicy::Reject);
        assert_eq!(settings.level().unwrap(), Some(Level::DEBUG));

        let series = settings.series_config().unwrap();
        assert_eq!(series.window, TimeDelta::minutes(5));
        assert_eq!(series.interval, TimeDelta::seconds(30));
        assert_eq!(series.smoothing, 5);
        // Unset keys keep their defaults
        assert_eq!(settings.refresh, "1s");
    }

    #[test]
    fn load_missing_file_fails() {
        let err = Settings::load(Some(Path::new("/nonexistent/warptail.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Load(_)));
    }

    #[test]
    fn environment_overrides_file() {
        let file = toml_file(
            r#"
            window = "5m"
            interval = "30s"
            "#,
        );

        let vars = env(&[
            ("WARPTAIL_INTERVAL", "15s"),
            ("WARPTAIL_SMOOTHING", "7"),
            ("WARPTAIL_ON_MALFORMED", "reject"),
        ]);
        let settings = Settings::load_with_env(Some(file.path()), vars).unwrap();
        assert_eq!(settings.window, "5m");
        assert_eq!(settings.interval, "15s");
        assert_eq!(settings.smoothing, 7);
        assert_eq!(settings.on_malformed, SamplePolicy::Reject);
    }

    #[test]
    fn environment_without_file() {
        let settings = Settings::load_with_env(None, env(&[("WARPTAIL_REFRESH", "250ms")])).unwrap();
        assert_eq!(
            settings.refresh_interval().unwrap(),
            Duration::from_millis(250)
        );
        assert_eq!(settings.window, "10m");
    }

    #[test]
    fn overrides_win_over_file_and_environment() {
        let file = toml_file(
            r#"
            window = "5m"
            smoothing = 5
            "#,
        );
        let vars = env(&[("WARPTAIL_WINDOW", "2m"), ("WARPTAIL_INTERVAL", "15s")]);

        let overrides = SettingsOverrides {
            window: Some("90s".into()),
            smoothing: Some(1),
            on_malformed: Some(SamplePolicy::Reject),
            ..Default::default()
        };
        let settings = Settings::load_with_env(Some(file.path()), vars)
            .unwrap()
            .with_overrides(&overrides);

        assert_eq!(settings.window, "90s");
        assert_eq!(settings.smoothing, 1);
        assert_eq!(settings.on_malformed, SamplePolicy::Reject);
        // Unset flags leave the environment value in place
        assert_eq!(settings.interval, "15s");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let settings = Settings::default().with_overrides(&SettingsOverrides::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn zero_values_are_rejected() {
        let settings = Settings {
            interval: "0s".into(),
            ..Default::default()
        };
        assert!(matches!(
            settings.series_config(),
            Err(SettingsError::Zero { key: "interval" })
        ));

        let settings = Settings {
            smoothing: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Zero { key: "smoothing" })
        ));

        let settings = Settings {
            window: "500us".into(),
            ..Default::default()
        };
        assert!(matches!(
            settings.series_config(),
            Err(SettingsError::Zero { key: "window" })
        ));

        let settings = Settings {
            refresh: "0s".into(),
            ..Default::default()
        };
        assert!(matches!(
            settings.refresh_interval(),
            Err(SettingsError::Zero { key: "refresh" })
        ));
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Zero { key: "refresh" })
        ));
    }

    #[test]
    fn bad_duration_names_the_key() {
        let settings = Settings {
            refresh: "soon".into(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("`refresh`"));
    }

    #[test]
    fn bad_log_level() {
        let settings = Settings {
            log_level: Some("loud".into()),
            ..Default::default()
        };
        assert!(matches!(settings.level(), Err(SettingsError::LogLevel(_))));
    }
}
