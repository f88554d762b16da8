use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::media::explorer::DEFAULT_MOUNT;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MUSIC_PATH: &str = "/music";
const DEFAULT_ASSETS_PATH: &str = "assets";
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// Contents of `mike.toml`. Every key is optional; unknown keys are ignored.
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub music_path: Option<PathBuf>,
    pub assets_path: Option<PathBuf>,
    pub localhost: Option<bool>,
    pub session_ttl_secs: Option<u64>,
    pub session_tokens: Option<Vec<String>>,
    /// URI prefix songs are served under.
    pub mount: Option<String>,
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub music_path: PathBuf,
    pub assets_path: PathBuf,
    pub localhost: bool,
    pub session_ttl: Duration,
    pub session_tokens: Vec<String>,
    pub mount: String,
}

impl Config {
    /// Merge CLI arguments over the config file over built-in defaults.
    /// Session tokens from both sources are all kept.
    pub fn resolve(
        file: Option<FileConfig>,
        args: &crate::cli::Args,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let mut session_tokens = args.session_tokens.clone();
        session_tokens.extend(file.session_tokens.unwrap_or_default());
        let mount = match file.mount {
            Some(mount) => validate_mount(&mount)?,
            None => DEFAULT_MOUNT.to_string(),
        };
        Ok(Config {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            music_path: args
                .music
                .clone()
                .or(file.music_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MUSIC_PATH)),
            assets_path: args
                .assets
                .clone()
                .or(file.assets_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_PATH)),
            localhost: args.localhost || file.localhost.unwrap_or(false),
            session_ttl: Duration::from_secs(
                file.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS),
            ),
            session_tokens,
            mount,
        })
    }
}

/// First path segments already taken by other routes.
const RESERVED_MOUNTS: &[&str] = &["api", "assets"];

/// Normalize a song mount to `/name` and refuse the ones the router
/// cannot serve songs under.
pub fn validate_mount(mount: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidMount {
        mount: mount.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = mount.trim_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("songs cannot be served from the site root"));
    }
    let route_syntax =
        |c: char| matches!(c, '{' | '}' | '*' | '?' | '#' | '%') || c.is_whitespace();
    if trimmed.chars().any(route_syntax) {
        return Err(invalid("only plain path segments are allowed"));
    }
    if trimmed.split('/').any(|segment| matches!(segment, "" | "." | "..")) {
        return Err(invalid("empty, `.` and `..` segments are not allowed"));
    }
    let first = trimmed.split('/').next().unwrap_or(trimmed);
    if RESERVED_MOUNTS.iter().any(|reserved| first.eq_ignore_ascii_case(reserved)) {
        return Err(invalid("clashes with the /api or /assets routes"));
    }
    Ok(format!("/{trimmed}"))
}

pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }
    let cwd_config = PathBuf::from("mike.toml");
    if cwd_config.exists() {
        return Some(cwd_config);
    }
    if let Some(config_dir) = dirs::config_dir() {
        let xdg_config = config_dir.join("mike").join("config.toml");
        if xdg_config.exists() {
            return Some(xdg_config);
        }
    }
    None
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid mount {mount:?}: {reason}")]
    InvalidMount { mount: String, reason: String },
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}
