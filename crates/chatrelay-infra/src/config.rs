//! Configuration loading for the relay.
//!
//! Resolves the data directory, reads `config.toml` from it into
//! [`RelayConfig`] and looks up the provider API key in the environment.
//! Every step falls back to defaults rather than failing startup.

use std::path::{Path, PathBuf};

use chatrelay_types::config::{ProviderSettings, RelayConfig};
use secrecy::SecretString;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CHATRELAY_DATA_DIR";

/// Resolve the data directory.
///
/// `CHATRELAY_DATA_DIR` wins; otherwise `~/.chatrelay`, or `./.chatrelay`
/// when no home directory is known.
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok())
}

fn data_dir_from(override_dir: Option<String>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatrelay");
    }

    PathBuf::from(".chatrelay")
}

/// Load relay configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`RelayConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
#[tracing::instrument(
    name = "load_relay_config",
    skip_all,
    fields(data_dir = %data_dir.display())
)]
pub async fn load_relay_config(data_dir: &Path) -> RelayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RelayConfig::default()
        }
    }
}

/// Read the provider API key from the variable named by `api_key_env`.
///
/// A missing key is not fatal: the relay still starts and every completion
/// falls back to the apology reply.
pub fn load_api_key(settings: &ProviderSettings) -> SecretString {
    api_key_from(settings, |name| std::env::var(name).ok())
}

fn api_key_from(
    settings: &ProviderSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> SecretString {
    match lookup(&settings.api_key_env).filter(|k| !k.trim().is_empty()) {
        Some(key) => SecretString::from(key),
        None => {
            tracing::warn!(
                env = %settings.api_key_env,
                provider = %settings.name,
                "API key not set; completions will fail until it is configured"
            );
            SecretString::from(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    #[test]
    fn data_dir_override_wins() {
        let dir = data_dir_from(Some("/srv/relay".to_string()));
        assert_eq!(dir, PathBuf::from("/srv/relay"));
    }

    #[test]
    fn data_dir_empty_override_is_ignored() {
        let dir = data_dir_from(Some(String::new()));
        assert!(dir.ends_with(".chatrelay"));
    }

    #[tokio::test]
    async fn load_relay_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_relay_config(tmp.path()).await;
        assert_eq!(config.history_window, 10);
        assert_eq!(config.provider.model, "llama-3.1-8b-instant");
    }

    #[tokio::test]
    async fn load_relay_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
history_window = 6

[provider]
model = "llama-3.3-70b-versatile"
max_tokens = 400
"#,
        )
        .await
        .unwrap();

        let config = load_relay_config(tmp.path()).await;
        assert_eq!(config.history_window, 6);
        assert_eq!(config.provider.model, "llama-3.3-70b-versatile");
        assert_eq!(config.provider.max_tokens, 400);
        assert_eq!(config.provider.name, "groq");
    }

    #[tokio::test]
    async fn load_relay_config_malformed_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "history_window = [nope")
            .await
            .unwrap();

        let config = load_relay_config(tmp.path()).await;
        assert_eq!(config.history_window, 10);
    }

    #[test]
    fn api_key_is_read_from_named_variable() {
        let settings = ProviderSettings::default();
        let key = api_key_from(&settings, |name| {
            (name == "GROQ_API_KEY").then(|| "gsk-123".to_string())
        });
        assert_eq!(key.expose_secret(), "gsk-123");
    }

    #[test]
    fn api_key_missing_or_blank_is_empty() {
        let settings = ProviderSettings::default();
        assert_eq!(api_key_from(&settings, |_| None).expose_secret(), "");
        assert_eq!(
            api_key_from(&settings, |_| Some("  ".to_string())).expose_secret(),
            ""
        );
    }
}
