use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PalaceConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub generator: GeneratorConfig,
    pub translator: TranslatorConfig,
    pub accounts: AccountsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Gemini API key. Usually supplied through `GEMINI_API_KEY` rather than the file.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Longest text sent in a single translation request.
    pub max_chunk_chars: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AccountsConfig {
    pub min_password_length: usize,
}

impl Default for PalaceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            generator: GeneratorConfig::default(),
            translator: TranslatorConfig::default(),
            accounts: AccountsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8501,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_palace_dir()
            .join("palace.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            timeout_secs: 60,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".into(),
            timeout_secs: 30,
            max_chunk_chars: 5000,
        }
    }
}

impl GeneratorConfig {
    /// Request timeout, never shorter than one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl TranslatorConfig {
    /// Request timeout, never shorter than one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            min_password_length: 6,
        }
    }
}

/// Returns `~/.palace/`
pub fn default_palace_dir() -> PathBuf {
    home_dir().join(".palace")
}

/// Returns the default config file path: `~/.palace/config.toml`
pub fn default_config_path() -> PathBuf {
    default_palace_dir().join("config.toml")
}

impl PalaceConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            PalaceConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides (PALACE_DB, PALACE_HOST, PALACE_PORT,
    /// PALACE_LOG_LEVEL, PALACE_MODEL, GEMINI_API_KEY).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PALACE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("PALACE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PALACE_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("PALACE_PORT is not a valid port: {val}"))?;
        }
        if let Ok(val) = std::env::var("PALACE_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("PALACE_MODEL") {
            self.generator.model = val;
        }
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            if !val.trim().is_empty() {
                self.generator.api_key = Some(val);
            }
        }
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// `host:port` the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Home directory, or the working directory when none can be determined.
fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PalaceConfig::default();
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.generator.model, "gemini-1.5-flash");
        assert!(config.generator.api_key.is_none());
        assert_eq!(config.translator.max_chunk_chars, 5000);
        assert_eq!(config.accounts.min_password_length, 6);
        assert!(config.storage.db_path.ends_with("palace.db"));
    }

    #[test]
    fn zero_timeouts_are_clamped_to_one_second() {
        let config: PalaceConfig = toml::from_str(
            "[generator]\ntimeout_secs = 0\n\n[translator]\ntimeout_secs = 0\n",
        )
        .unwrap();
        assert_eq!(config.generator.timeout(), Duration::from_secs(1));
        assert_eq!(config.translator.timeout(), Duration::from_secs(1));
        assert_eq!(GeneratorConfig::default().timeout(), Duration::from_secs(60));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
port = 9000

[storage]
db_path = "/tmp/test.db"

[generator]
model = "gemini-2.0-flash"
timeout_secs = 5
"#;
        let config: PalaceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.generator.model, "gemini-2.0-flash");
        assert_eq!(config.generator.timeout_secs, 5);
        // defaults still apply for unset fields
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.translator.timeout_secs, 30);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = PalaceConfig::default();
        std::env::set_var("PALACE_DB", "/tmp/override.db");
        std::env::set_var("PALACE_PORT", "8123");
        std::env::set_var("PALACE_LOG_LEVEL", "trace");
        std::env::set_var("GEMINI_API_KEY", "test-key");

        config.apply_env_overrides().unwrap();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.generator.api_key.as_deref(), Some("test-key"));

        // Clean up
        std::env::remove_var("PALACE_DB");
        std::env::remove_var("PALACE_PORT");
        std::env::remove_var("PALACE_LOG_LEVEL");
        std::env::remove_var("GEMINI_API_KEY");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = PalaceConfig::load_from(tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.translator.base_url, "https://translate.googleapis.com");
    }
}
