//! Configuration file loader.
//!
//! Reads `cartly.toml` and deserializes it into [`BotConfig`]. Falls back
//! to defaults when the file is missing or malformed; the token can also
//! arrive via flag or environment, so an absent file is normal.

use std::path::Path;

use cartly_telegram::client::DEFAULT_POLL_TIMEOUT_SECS;
use serde::Deserialize;

/// Settings from the optional config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Bot token; `--token` and `CARTLY_BOT_TOKEN` take precedence.
    pub token: Option<String>,
    /// Override for the Bot API endpoint (self-hosted servers, tests).
    pub api_base: Option<String>,
    /// `getUpdates` long-poll timeout in seconds.
    pub poll_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: None,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }
}

/// Load configuration from `path`.
///
/// - Missing file: returns [`BotConfig::default()`].
/// - Unreadable or malformed file: logs a warning and returns the default.
pub async fn load_config(path: &Path) -> BotConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return BotConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", path.display());
            return BotConfig::default();
        }
    };

    match toml::from_str::<BotConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("failed to parse {}: {err}, using defaults", path.display());
            BotConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_returns_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("cartly.toml")).await;
        assert!(config.token.is_none());
        assert!(config.api_base.is_none());
        assert_eq!(config.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
    }

    #[tokio::test]
    async fn valid_toml_is_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cartly.toml");
        tokio::fs::write(
            &path,
            r#"
token = "123:abc"
api_base = "http://localhost:8081"
poll_timeout_secs = 5
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.token.as_deref(), Some("123:abc"));
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:8081"));
        assert_eq!(config.poll_timeout_secs, 5);
    }

    #[tokio::test]
    async fn malformed_toml_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cartly.toml");
        tokio::fs::write(&path, "token = [not toml").await.unwrap();

        let config = load_config(&path).await;
        assert!(config.token.is_none());
        assert_eq!(config.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
    }

    #[tokio::test]
    async fn partial_config_keeps_defaults_for_the_rest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cartly.toml");
        tokio::fs::write(&path, r#"token = "123:abc""#).await.unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.token.as_deref(), Some("123:abc"));
        assert!(config.api_base.is_none());
        assert_eq!(config.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
    }
}
