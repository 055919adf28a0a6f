//! Runtime configuration, read from the environment.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Browser identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const SELECTION_MODE_VAR: &str = "SCOUT_SELECTION_MODE";
pub const TIMEOUT_VAR: &str = "SCOUT_TIMEOUT_SECS";
pub const USER_AGENT_VAR: &str = "SCOUT_USER_AGENT";
pub const SCHEDULE_VAR: &str = "SCOUT_SCHEDULE";

/// How a strategy is chosen for a fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Platform detection from markup fingerprints.
    #[default]
    Structural,
    /// Hostname lookup against the hand-written per-domain strategies.
    Domain,
}

impl FromStr for SelectionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" => Ok(Self::Structural),
            "domain" => Ok(Self::Domain),
            _ => Err(ConfigError::InvalidChoice {
                key: SELECTION_MODE_VAR,
                expected: "structural, domain",
                value: s.to_string(),
            }),
        }
    }
}

/// Extractor configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Strategy-selection policy
    pub selection_mode: SelectionMode,
    /// Upper bound for the single GET of each extraction
    pub timeout: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Cron expression for re-checking prices (binary only)
    pub schedule: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            schedule: None,
        }
    }
}

impl Config {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Unset or blank keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(mode) = get(SELECTION_MODE_VAR) {
            config.selection_mode = mode.parse()?;
        }

        if let Some(raw) = get(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    key: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(agent) = get(USER_AGENT_VAR) {
            config.user_agent = agent.trim().to_string();
        }

        config.schedule = get(SCHEDULE_VAR).map(|s| s.trim().to_string());

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).expect("config");
        assert_eq!(config.selection_mode, SelectionMode::Structural);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.schedule.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            (SELECTION_MODE_VAR, " Domain "),
            (TIMEOUT_VAR, "3"),
            (USER_AGENT_VAR, "scout/1.0"),
            (SCHEDULE_VAR, "0 0 */6 * * *"),
        ])
        .expect("config");
        assert_eq!(config.selection_mode, SelectionMode::Domain);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "scout/1.0");
        assert_eq!(config.schedule.as_deref(), Some("0 0 */6 * * *"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[(SELECTION_MODE_VAR, "fastest")]),
            Err(ConfigError::InvalidChoice { .. })
        ));
        assert!(matches!(
            config_from(&[(TIMEOUT_VAR, "0")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}
