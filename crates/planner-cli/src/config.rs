use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use planner_core::clock::{Clock, FixedClock, SystemClock};
use planner_core::date::TaskDate;
use planner_core::error::CoreError;
use planner_core::repository::DEFAULT_LIST_LIMIT;
use serde::{Deserialize, Deserializer, Serialize};

const CONFIG_FILE: &str = "planner.toml";
const ENV_PREFIX: &str = "PLANNER_";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Path of the SQLite database file
    pub database_path: String,
    /// Maximum number of tasks `list` prints
    pub list_limit: u32,
    /// Pins "today" to a fixed `YYYYMMDD` date instead of the system clock
    #[serde(default, deserialize_with = "date_text", skip_serializing_if = "Option::is_none")]
    pub today: Option<String>,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "scheduler.db".to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            today: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Defaults, overridden by `planner.toml`, overridden by `PLANNER_*` variables.
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn clock(&self) -> Result<Box<dyn Clock>, CoreError> {
        match self.today.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => Ok(Box::new(FixedClock::at_date(TaskDate::parse(text)?))),
            None => Ok(Box::new(SystemClock)),
        }
    }
}

/// Environment values that look numeric arrive as integers, so a date may be
/// either form.
fn date_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DateText {
        Text(String),
        Number(u64),
    }

    Ok(Option::<DateText>::deserialize(deserializer)?.map(|value| match value {
        DateText::Text(text) => text,
        DateText::Number(number) => number.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::new()?;
            assert_eq!(config, Config::default());
            assert_eq!(config.list_limit, 50);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                database_path = "from-file.db"
                list_limit = 10
                "#,
            )?;
            jail.set_env("PLANNER_LIST_LIMIT", "20");
            jail.set_env("PLANNER_TODAY", "20240310");

            let config = Config::new()?;
            assert_eq!(config.database_path, "from-file.db");
            assert_eq!(config.list_limit, 20);
            assert_eq!(config.today.as_deref(), Some("20240310"));
            Ok(())
        });
    }

    #[test]
    fn test_clock_override() {
        let config = Config {
            today: Some("20240229".to_string()),
            ..Config::default()
        };
        assert_eq!(config.clock().unwrap().today().to_string(), "20240229");

        let config = Config {
            today: Some("29.02.2024".to_string()),
            ..Config::default()
        };
        assert!(matches!(config.clock(), Err(CoreError::InvalidDate(_))));
    }
}
