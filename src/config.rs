//! Configuration management for moodlist.
//!
//! Values come from environment variables, optionally loaded from `.env`
//! files first. Everything is read once into a [`Config`] that is passed
//! to the server explicitly.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`moodlist/.env`)
//! 4. Application defaults (where applicable)
//!
//! # Session secret
//!
//! `SESSION_SECRET` is the key material for the encrypted session cookies.
//! Sessions survive restarts as long as the secret stays the same. Rotating
//! it invalidates every existing session and users have to log in again.
//! `moodlist secret` prints a freshly generated value.

use std::{env, path::PathBuf};

use crate::{assembler::ShortfallPolicy, error::AppError};

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-modify-private playlist-modify-public";
pub const DEFAULT_MARKET: &str = "US";
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Loads environment variables from `.env` files.
///
/// The working directory is checked first, then the platform-specific local
/// data directory:
/// - Linux: `~/.local/share/moodlist/.env`
/// - macOS: `~/Library/Application Support/moodlist/.env`
/// - Windows: `%LOCALAPPDATA%/moodlist/.env`
///
/// Missing files are not an error; variables may come from the environment.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(e.to_string());
        }
    }

    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodlist/.env");
    path
}

/// Runtime configuration.
///
/// Deliberately not `Debug`: it carries the client secret and the session secret.
#[derive(Clone)]
pub struct Config {
    pub server_address: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub session_secret: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub scope: String,
    pub market: String,
    pub shortfall: ShortfallPolicy,
    pub publish_playlists: bool,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`,
    /// `SPOTIFY_REDIRECT_URI` or `SESSION_SECRET` is missing, if the session
    /// secret is shorter than [`MIN_SESSION_SECRET_LEN`], or if an optional
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            value(key).ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };
        let optional = |key: &str, default: &str| value(key).unwrap_or_else(|| default.to_string());

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::Config(format!(
                "SESSION_SECRET must be at least {} characters, run `moodlist secret` to generate one",
                MIN_SESSION_SECRET_LEN
            )));
        }

        Ok(Self {
            server_address: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            session_secret,
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL),
            auth_url: optional("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            scope: optional("SPOTIFY_SCOPE", DEFAULT_SCOPE),
            market: optional("SPOTIFY_MARKET", DEFAULT_MARKET),
            shortfall: optional("SHORTFALL_POLICY", "recommend").parse()?,
            publish_playlists: parse_bool("PUBLISH_PLAYLISTS", &optional("PUBLISH_PLAYLISTS", "true"))?,
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
