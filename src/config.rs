// Configuration loading and parsing (scanner.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub upload: UploadConfig,
    pub credentials: CredentialsConfig,
    /// Where credentials.toml lives, so the key store can rewrite it.
    pub credentials_path: PathBuf,
}

// ---------------------------------------------------------------------------
// scanner.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire scanner.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ScannerFile {
    server: ServerConfig,
    ui: UiConfig,
    upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Scheme + host + port of the compliance API, without a trailing path.
    pub base_url: String,
    /// API path version segment; requests go to `{base_url}/api/{api_version}/...`.
    pub api_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub page_size: u32,
    pub health_check_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Extensions the server accepts, dot-prefixed (".pdf", ".docx", ...).
    pub accepted_extensions: Vec<String>,
    /// Advertised upload ceiling. Display-only; the server enforces it.
    pub max_size_mb: u32,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/scanner.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- scanner.toml (required) ---
    let scanner_path = config_dir.join("scanner.toml");
    let scanner_text = read_file(&scanner_path)?;
    let scanner_file: ScannerFile =
        toml::from_str(&scanner_text).map_err(|e| ConfigError::ParseError {
            path: scanner_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        server: scanner_file.server,
        ui: scanner_file.ui,
        upload: scanner_file.upload,
        credentials,
        credentials_path,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }

        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!(
                "failed to copy {} to {}: {e}",
                path.display(),
                target.display()
            ),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Load configuration from the current working directory, copying defaults
/// into `config/` first when files are missing.
pub fn load_config() -> Result<Config, ConfigError> {
    let base_dir = std::env::current_dir().map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to resolve current directory: {e}"),
    })?;
    ensure_config_files(&base_dir)?;
    load_config_from(&base_dir)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.server.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError {
            field: "server.base_url".to_string(),
            message: format!("must start with http:// or https://, got `{base_url}`"),
        });
    }

    if config.server.api_version.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "server.api_version".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if config.ui.page_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "ui.page_size".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    if config.ui.health_check_interval_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "ui.health_check_interval_secs".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    if config.upload.accepted_extensions.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "upload.accepted_extensions".to_string(),
            message: "must list at least one extension".to_string(),
        });
    }

    for ext in &config.upload.accepted_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::ValidationError {
                field: "upload.accepted_extensions".to_string(),
                message: format!("extensions must be dot-prefixed, got `{ext}`"),
            });
        }
    }

    if config.upload.max_size_mb == 0 {
        return Err(ConfigError::ValidationError {
            field: "upload.max_size_mb".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
