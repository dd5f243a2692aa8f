//! Client configuration from environment variables.

use std::time::Duration;
use vocab_core::IntervalTable;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Where the due-word monitor gets its due set from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueSource {
    /// Recompute from the local progress store.
    Local,
    /// Ask the backend for its due list on every tick.
    Remote,
}

/// Settings for the due-word monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub source: DueSource,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            source: DueSource::Local,
        }
    }
}

/// Full client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub monitor: MonitorConfig,
    pub intervals: IntervalTable,
}

impl ClientConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("VOCAB_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("VOCAB_API_URL"))?;
        let api_token = lookup("VOCAB_API_TOKEN").filter(|v| !v.trim().is_empty());

        let mut monitor = MonitorConfig::default();
        if let Some(raw) = lookup("VOCAB_DUE_POLL_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "VOCAB_DUE_POLL_SECS",
                message: format!("expected whole seconds, got {raw:?}"),
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: "VOCAB_DUE_POLL_SECS",
                    message: "must be greater than zero".to_string(),
                });
            }
            monitor.poll_interval = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("VOCAB_DUE_SOURCE") {
            monitor.source = match raw.trim().to_ascii_lowercase().as_str() {
                "local" => DueSource::Local,
                "remote" => DueSource::Remote,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "VOCAB_DUE_SOURCE",
                        message: format!("expected \"local\" or \"remote\", got {raw:?}"),
                    })
                }
            };
        }

        let mut intervals = IntervalTable::default();
        if let Some(raw) = lookup("VOCAB_LEARNED_INTERVALS") {
            intervals.learned = parse_days("VOCAB_LEARNED_INTERVALS", &raw)?;
        }
        if let Some(raw) = lookup("VOCAB_REVIEW_INTERVALS") {
            intervals.review = parse_days("VOCAB_REVIEW_INTERVALS", &raw)?;
        }

        Ok(Self {
            api_url,
            api_token,
            monitor,
            intervals,
        })
    }
}

fn parse_days(key: &'static str, raw: &str) -> Result<[u32; 3], ConfigError> {
    let days = raw
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConfigError::Invalid {
            key,
            message: e.to_string(),
        })?;
    <[u32; 3]>::try_from(days).map_err(|v| ConfigError::Invalid {
        key,
        message: format!("expected 3 day counts, got {}", v.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::from_lookup(lookup(&[("VOCAB_API_URL", "http://api")])).unwrap();
        assert_eq!(config.api_url, "http://api");
        assert_eq!(config.api_token, None);
        assert_eq!(config.monitor, MonitorConfig::default());
        assert_eq!(config.intervals, IntervalTable::default());
    }

    #[test]
    fn url_is_required() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("VOCAB_API_URL")));
    }

    #[test]
    fn overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("VOCAB_API_URL", "http://api"),
            ("VOCAB_API_TOKEN", "secret"),
            ("VOCAB_DUE_POLL_SECS", "15"),
            ("VOCAB_DUE_SOURCE", "Remote"),
            ("VOCAB_LEARNED_INTERVALS", "3, 6, 12"),
        ]))
        .unwrap();
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.monitor.poll_interval, Duration::from_secs(15));
        assert_eq!(config.monitor.source, DueSource::Remote);
        assert_eq!(config.intervals.learned, [3, 6, 12]);
        assert_eq!(config.intervals.review, [1, 3, 7]);
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [
            ("VOCAB_DUE_POLL_SECS", "0"),
            ("VOCAB_DUE_POLL_SECS", "soon"),
            ("VOCAB_DUE_SOURCE", "cloud"),
            ("VOCAB_REVIEW_INTERVALS", "1,2"),
        ] {
            let result =
                ClientConfig::from_lookup(lookup(&[("VOCAB_API_URL", "http://api"), (key, value)]));
            assert!(
                matches!(result, Err(ConfigError::Invalid { .. })),
                "{key}={value} should be rejected"
            );
        }
    }
}
