//! Mood Playlist Web Application Library
//!
//! This library provides a small web application that logs a user in with
//! Spotify, takes a mood and a list of artists from a form, and assembles a
//! playlist of tracks whose audio features fit the mood. Missing tracks are
//! filled from Spotify's recommendation endpoint.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the web interface and OAuth callback
//! - `assembler` - Playlist assembly: candidates, classification, fill-in
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Application error type and its HTTP mapping
//! - `log` - Timestamped console output behind the logging macros
//! - `mood` - Mood set, feature bands and recommendation seeds
//! - `render` - HTML pages
//! - `server` - Router construction and HTTP server
//! - `session` - Session-backed OAuth token cache
//! - `spotify` - Spotify Web API client and OAuth helpers
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Running the server from code
//!
//! ```
//! use moodlist::{config, server};
//!
//! async fn run() -> moodlist::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     let address = config.server_address.clone();
//!     server::start_server(server::AppState::new(config)?, &address).await
//! }
//! ```

pub mod api;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod mood;
pub mod render;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// Boxed-error result for the binary side.
///
/// Used by the binary entry points where any error is reported and ends
/// the process. Library code returns [`error::AppError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Logs an informational step.
///
/// ```
/// info!("Listening on {}", address);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    $crate::log::emit($crate::log::Level::Info, std::format_args!($($arg)*));
  })
}

/// Logs a completed action with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    $crate::log::emit($crate::log::Level::Success, std::format_args!($($arg)*));
  })
}

/// Logs a fatal startup error and exits with code 1.
///
/// Request handlers never use this; they return [`error::AppError`] and the
/// server keeps running.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    $crate::log::emit($crate::log::Level::Error, std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Logs a recoverable problem, e.g. an artist name without search results.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    $crate::log::emit($crate::log::Level::Warning, std::format_args!($($arg)*));
  })
}
