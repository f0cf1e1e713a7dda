//! Package feed configuration and validation.

use crate::pipeline::{Error, Result};
use serde::Deserialize;
use std::fmt;

/// Feed endpoint and credentials as supplied by configuration.
///
/// Both fields are optional at load time; [`FeedConfig::validate`] checks
/// completeness right before a push.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedConfig {
    /// Push endpoint, e.g. `https://www.nuget.org/api/v2/package`.
    pub url: Option<String>,

    pub api_key: Option<String>,
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl FeedConfig {
    /// Environment variable prefix for a feed: upper-cased, with every
    /// non-alphanumeric character replaced by `_`.
    pub fn env_prefix(feed: &str) -> String {
        feed.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Applies `<PREFIX>_FEED_URL` and `<PREFIX>_FEED_API_KEY` overrides.
    ///
    /// `lookup` is normally `|name| std::env::var(name).ok()`.
    pub fn with_env_overrides<F>(mut self, feed: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = Self::env_prefix(feed);
        if let Some(url) = lookup(&format!("{prefix}_FEED_URL")) {
            self.url = Some(url);
        }
        if let Some(key) = lookup(&format!("{prefix}_FEED_API_KEY")) {
            self.api_key = Some(key);
        }
        self
    }

    /// Checks every field is present and non-blank.
    ///
    /// # Errors
    ///
    /// [`Error::IncompleteFeedConfig`] listing all missing fields.
    pub fn validate(&self, feed: &str) -> Result<ValidatedFeed> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        match (present(&self.url), present(&self.api_key)) {
            (Some(url), Some(api_key)) => Ok(ValidatedFeed {
                name: feed.to_string(),
                url: url.to_string(),
                api_key: api_key.to_string(),
            }),
            (url, api_key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push("url");
                }
                if api_key.is_none() {
                    missing.push("apiKey");
                }
                Err(Error::IncompleteFeedConfig {
                    feed: feed.to_string(),
                    missing,
                })
            }
        }
    }
}

/// A feed configuration known to be complete.
#[derive(Clone)]
pub struct ValidatedFeed {
    pub name: String,
    pub url: String,
    pub api_key: String,
}

impl fmt::Debug for ValidatedFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedFeed")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_prefix_normalizes_feed_name() {
        assert_eq!(FeedConfig::env_prefix("nuget.org"), "NUGET_ORG");
        assert_eq!(FeedConfig::env_prefix("github-packages"), "GITHUB_PACKAGES");
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([("NUGET_FEED_API_KEY", "from-env")]);
        let config = FeedConfig {
            url: Some("https://feed.example/api/v2/package".into()),
            api_key: Some("from-file".into()),
        }
        .with_env_overrides("nuget", |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.url.as_deref(), Some("https://feed.example/api/v2/package"));
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn validate_reports_all_missing_fields() {
        let err = FeedConfig::default().validate("nuget").unwrap_err();
        match err {
            Error::IncompleteFeedConfig { feed, missing } => {
                assert_eq!(feed, "nuget");
                assert_eq!(missing, vec!["url", "apiKey"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_values_count_as_missing() {
        let config = FeedConfig {
            url: Some("https://feed.example".into()),
            api_key: Some("   ".into()),
        };
        let err = config.validate("nuget").unwrap_err();
        assert!(matches!(err, Error::IncompleteFeedConfig { ref missing, .. } if missing == &["apiKey"]));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let validated = FeedConfig {
            url: Some("https://feed.example".into()),
            api_key: Some("secret-key".into()),
        }
        .validate("nuget")
        .unwrap();
        assert!(!format!("{validated:?}").contains("secret-key"));
    }
}
