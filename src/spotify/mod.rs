//! # Spotify Integration Module
//!
//! This module is the only place that talks to the Spotify Web API. It
//! defines the [`Catalog`] trait, the seam the playlist assembler depends
//! on, and [`SpotifyClient`], its reqwest implementation.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! PlaylistAssembler ──uses──> dyn Catalog
//!                                  ↑
//!                      SpotifyClient (per request, bearer token)
//!     ├── artists   (search, top tracks)
//!     ├── tracks    (audio features, recommendations)
//!     └── playlist  (current user, create, add tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! [`auth`] holds the OAuth authorization-code helpers used by the login
//! and callback handlers.
//!
//! ## API Coverage
//!
//! - `GET /search` - artist lookup by name
//! - `GET /artists/{id}/top-tracks` - an artist's top tracks for a market
//! - `GET /audio-features` - valence, energy and danceability, up to 100 ids per call
//! - `GET /recommendations` - seeded by genre with min/max feature bounds
//! - `GET /me` - current user id
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `POST /playlists/{playlist_id}/tracks` - add tracks, up to 100 per call
//!
//! ## Error Handling
//!
//! A 502 Bad Gateway is retried after a short delay. A 429 Too Many Requests
//! honours the `Retry-After` header when it asks for at most two minutes.
//! Both are limited to [`MAX_ATTEMPTS`]. Every other non-success status
//! becomes [`AppError::Api`] with the message Spotify returned.

pub mod artists;
pub mod auth;
pub mod playlist;
pub mod tracks;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    config::Config,
    error::AppError,
    mood::RecommendationSeed,
    types::{ArtistRef, AudioFeatures, PlaylistRef, Token, TrackRef},
    warning,
};

pub const MAX_ATTEMPTS: u32 = 3;
pub const MAX_RETRY_AFTER_SECS: u64 = 120;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Read and write access to the streaming catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// First artist matching `name`, if any.
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistRef>, AppError>;

    async fn top_tracks(&self, artist_id: &str) -> Result<Vec<TrackRef>, AppError>;

    /// One entry per requested id, in request order. `None` when the
    /// catalog has no features for a track.
    async fn audio_features(
        &self,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, AppError>;

    async fn recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: u32,
    ) -> Result<Vec<TrackRef>, AppError>;

    async fn current_user_id(&self) -> Result<String, AppError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRef, AppError>;

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), AppError>;
}

/// Spotify Web API client bound to one user's access token.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    market: String,
    access_token: String,
    retry_delay: Duration,
}

impl SpotifyClient {
    pub fn new(
        http: Client,
        api_url: impl Into<String>,
        market: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            market: market.into(),
            access_token: access_token.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn from_config(http: Client, config: &Config, token: &Token) -> Self {
        Self::new(http, &config.api_url, &config.market, &token.access_token)
    }

    /// Delay before retrying a 502 response.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    /// Sends the request built by `build`, retrying 502 and 429 responses,
    /// and decodes the JSON body.
    async fn send<T, F>(&self, build: F) -> Result<T, AppError>
    where
        T: DeserializeOwned + Send,
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let response = build().bearer_auth(&self.access_token).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.json::<T>().await?);
            }

            if attempt < MAX_ATTEMPTS {
                match status {
                    StatusCode::BAD_GATEWAY => {
                        sleep(self.retry_delay).await;
                        continue; // retry
                    }
                    StatusCode::TOO_MANY_REQUESTS => {
                        let retry_after = retry_after_secs(&response);
                        if retry_after <= MAX_RETRY_AFTER_SECS {
                            sleep(Duration::from_secs(retry_after)).await;
                            continue; // retry
                        }
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds, giving up.",
                            retry_after
                        );
                    }
                    _ => {}
                }
            }

            return Err(api_error(response).await);
        }
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistRef>, AppError> {
        self.fetch_artist(name).await
    }

    async fn top_tracks(&self, artist_id: &str) -> Result<Vec<TrackRef>, AppError> {
        self.fetch_top_tracks(artist_id).await
    }

    async fn audio_features(
        &self,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, AppError> {
        self.fetch_audio_features(track_ids).await
    }

    async fn recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: u32,
    ) -> Result<Vec<TrackRef>, AppError> {
        self.fetch_recommendations(seed, limit).await
    }

    async fn current_user_id(&self) -> Result<String, AppError> {
        self.fetch_current_user_id().await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRef, AppError> {
        self.post_playlist(user_id, name, description).await
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), AppError> {
        self.post_tracks(playlist_id, uris).await
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

pub(crate) async fn api_error(response: Response) -> AppError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AppError::Api {
        status,
        message: error_message(&body),
    }
}

/// Extracts a readable message from a Spotify error body. The Web API uses
/// `{"error": {"status", "message"}}`, the accounts service uses
/// `{"error", "error_description"}`.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json["error"]["message"]
            .as_str()
            .or_else(|| json["error_description"].as_str())
            .or_else(|| json["error"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    }
}
