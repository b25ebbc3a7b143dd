//! # API Module
//!
//! HTTP handlers for the moodlist web interface, built on
//! [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! - [`home`] - `GET /`: login link for anonymous visitors, details form otherwise
//! - [`details_form`] - `GET /details`: the mood/artists/song count form
//! - [`details_submit`] - `POST /details`: assembles (and saves) the playlist
//! - [`callback`] - `GET /callback`: OAuth redirect target, stores the token
//! - [`logout`] - `GET /logout`: clears the session
//! - [`health`] - `GET /health`: status and version for monitoring
//!
//! ## Sessions
//!
//! Handlers read and write the OAuth token through
//! [`crate::session::CookieTokenCache`] and return the updated
//! `PrivateCookieJar` with the response.
//!
//! ## Errors
//!
//! Handlers return [`crate::error::AppError`], which renders an HTML error
//! page with a matching status code.

mod callback;
mod details;
mod health;
mod home;
mod logout;

pub use callback::callback;
pub use details::build_request;
pub use details::details_form;
pub use details::details_submit;
pub use health::health;
pub use home::home;
pub use logout::logout;
