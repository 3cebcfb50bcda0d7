//! Configuration system for the `NotionDeck` proxy.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/notiondeck-proxy/config.toml`)
//! 4. Compiled defaults
//!
//! A missing credential or database id is not an error: the placeholders
//! are used and every upstream call will fail authentication.

use std::path::PathBuf;

/// Token used when none is configured.
pub const PLACEHOLDER_TOKEN: &str = "your-notion-token-here";

/// Database id used when none is configured.
pub const PLACEHOLDER_DATABASE_ID: &str = "your-database-id-here";

/// Errors that can occur when loading proxy configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure for the proxy.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ProxyConfigFile {
    server: ServerFileConfig,
    notion: NotionFileConfig,
}

/// `[server]` section of the proxy config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    bind_addr: Option<String>,
}

/// `[notion]` section of the proxy config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct NotionFileConfig {
    token: Option<String>,
    database_id: Option<String>,
    base_url: Option<String>,
    api_version: Option<String>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the proxy server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "NotionDeck proxy server")]
pub struct ProxyCliArgs {
    /// Address to bind the proxy server to.
    #[arg(short, long, env = "NOTIONDECK_BIND")]
    pub bind: Option<String>,

    /// Path to config file (default: `~/.config/notiondeck-proxy/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Notion integration token.
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Identifier of the Notion database holding the items.
    #[arg(long, env = "DATABASE_ID")]
    pub database_id: Option<String>,

    /// Base URL of the Notion API.
    #[arg(long, env = "NOTION_BASE_URL")]
    pub notion_base_url: Option<String>,

    /// Value of the `Notion-Version` header.
    #[arg(long)]
    pub notion_version: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "NOTIONDECK_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved proxy configuration.
#[derive(Clone)]
pub struct ProxyConfig {
    /// Address to bind the server to (e.g., `0.0.0.0:3001`).
    pub bind_addr: String,
    /// Bearer token passed to Notion on every call.
    pub token: String,
    /// Database the items live in.
    pub database_id: String,
    /// Base URL of the Notion API.
    pub notion_base_url: String,
    /// Notion protocol version header value.
    pub notion_version: String,
    /// Log level filter string.
    pub log_level: String,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("bind_addr", &self.bind_addr)
            .field("token", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("notion_base_url", &self.notion_base_url)
            .field("notion_version", &self.notion_version)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3001".to_string(),
            token: PLACEHOLDER_TOKEN.to_string(),
            database_id: PLACEHOLDER_DATABASE_ID.to_string(),
            notion_base_url: crate::upstream::DEFAULT_BASE_URL.to_string(),
            notion_version: crate::upstream::DEFAULT_NOTION_VERSION.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ProxyConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path is tried and missing file
    /// is treated as empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &ProxyCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ProxyConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &ProxyCliArgs, file: &ProxyConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            token: non_empty(cli.token.as_ref())
                .or_else(|| non_empty(file.notion.token.as_ref()))
                .unwrap_or(defaults.token),
            database_id: non_empty(cli.database_id.as_ref())
                .or_else(|| non_empty(file.notion.database_id.as_ref()))
                .unwrap_or(defaults.database_id),
            notion_base_url: cli
                .notion_base_url
                .clone()
                .or_else(|| file.notion.base_url.clone())
                .unwrap_or(defaults.notion_base_url),
            notion_version: cli
                .notion_version
                .clone()
                .or_else(|| file.notion.api_version.clone())
                .unwrap_or(defaults.notion_version),
            log_level: cli.log_level.clone(),
        }
    }

    /// Whether the credential or database id still hold their placeholders.
    #[must_use]
    pub fn uses_placeholders(&self) -> bool {
        self.token == PLACEHOLDER_TOKEN || self.database_id == PLACEHOLDER_DATABASE_ID
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// An empty credential counts as unset.
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Load and parse a TOML config file for the proxy.
fn load_config_file(
    explicit_path: Option<&std::path::Path>,
) -> Result<ProxyConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ProxyConfigFile::default());
        };
        config_dir.join("notiondeck-proxy").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ProxyConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
