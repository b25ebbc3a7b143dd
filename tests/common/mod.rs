#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use moodlist::{
    config::Config,
    error::AppError,
    mood::RecommendationSeed,
    spotify::Catalog,
    types::{ArtistRef, AudioFeatures, ExternalUrls, PlaylistRef, Token, TrackRef},
};
use serde_json::{Value, json};

pub const TEST_SECRET: &str = "test-session-secret-that-is-long-enough-0123456789";

pub fn track(id: &str) -> TrackRef {
    TrackRef {
        id: id.to_string(),
        name: format!("Track {}", id),
        uri: format!("spotify:track:{}", id),
        artists: Vec::new(),
    }
}

pub fn features(id: &str, valence: f64, energy: f64, danceability: f64) -> AudioFeatures {
    AudioFeatures {
        id: id.to_string(),
        valence,
        energy,
        danceability,
    }
}

pub fn token(obtained_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: "access-1".to_string(),
        refresh_token: "refresh-1".to_string(),
        scope: "playlist-modify-private".to_string(),
        expires_in,
        obtained_at,
    }
}

pub fn config_with(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("SPOTIFY_CLIENT_ID".to_string(), "client-id".to_string()),
        ("SPOTIFY_CLIENT_SECRET".to_string(), "client-secret".to_string()),
        (
            "SPOTIFY_REDIRECT_URI".to_string(),
            "http://127.0.0.1:5000/callback".to_string(),
        ),
        ("SESSION_SECRET".to_string(), TEST_SECRET.to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config is valid")
}

/// In-memory catalog that records every call.
#[derive(Default)]
pub struct FakeCatalog {
    artists: HashMap<String, ArtistRef>,
    top_tracks: HashMap<String, Vec<TrackRef>>,
    features: HashMap<String, AudioFeatures>,
    recommended: Vec<TrackRef>,
    fail_top_tracks: bool,
    fail_add_tracks: bool,
    pub calls: Mutex<Vec<String>>,
    pub recommendation_requests: Mutex<Vec<(Vec<String>, u32)>>,
    pub added: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an artist with its top tracks given as `(id, valence, energy, danceability)`.
    pub fn with_artist(mut self, name: &str, tracks: &[(&str, f64, f64, f64)]) -> Self {
        let id = format!("id-{}", name.to_lowercase().replace(' ', "-"));
        self.artists.insert(
            name.to_string(),
            ArtistRef {
                id: id.clone(),
                name: name.to_string(),
            },
        );
        let mut top = Vec::new();
        for (track_id, v, e, d) in tracks {
            top.push(track(track_id));
            self.features
                .insert(track_id.to_string(), features(track_id, *v, *e, *d));
        }
        self.top_tracks.insert(id, top);
        self
    }

    /// Registers a top track without audio features.
    pub fn with_featureless_track(mut self, artist: &str, track_id: &str) -> Self {
        let id = format!("id-{}", artist.to_lowercase().replace(' ', "-"));
        self.top_tracks
            .entry(id)
            .or_default()
            .push(track(track_id));
        self
    }

    pub fn with_recommendations(mut self, ids: &[&str]) -> Self {
        self.recommended = ids.iter().map(|id| track(id)).collect();
        self
    }

    pub fn failing_top_tracks(mut self) -> Self {
        self.fail_top_tracks = true;
        self
    }

    pub fn failing_add_tracks(mut self) -> Self {
        self.fail_add_tracks = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistRef>, AppError> {
        self.record(format!("search:{}", name));
        Ok(self.artists.get(name).cloned())
    }

    async fn top_tracks(&self, artist_id: &str) -> Result<Vec<TrackRef>, AppError> {
        self.record(format!("top_tracks:{}", artist_id));
        if self.fail_top_tracks {
            return Err(AppError::Api {
                status: 429,
                message: "API rate limit exceeded".to_string(),
            });
        }
        Ok(self.top_tracks.get(artist_id).cloned().unwrap_or_default())
    }

    async fn audio_features(
        &self,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, AppError> {
        self.record(format!("audio_features:{}", track_ids.join(",")));
        Ok(track_ids
            .iter()
            .map(|id| self.features.get(id).cloned())
            .collect())
    }

    async fn recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: u32,
    ) -> Result<Vec<TrackRef>, AppError> {
        self.record(format!("recommendations:{}", limit));
        self.recommendation_requests.lock().unwrap().push((
            seed.genres.iter().map(|g| g.to_string()).collect(),
            limit,
        ));
        Ok(self
            .recommended
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn current_user_id(&self) -> Result<String, AppError> {
        self.record("current_user".to_string());
        Ok("user-1".to_string())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        _description: &str,
    ) -> Result<PlaylistRef, AppError> {
        self.record(format!("create_playlist:{}:{}", user_id, name));
        Ok(PlaylistRef {
            id: "playlist-1".to_string(),
            name: name.to_string(),
            external_urls: Some(ExternalUrls {
                spotify: Some("https://open.spotify.com/playlist/playlist-1".to_string()),
            }),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), AppError> {
        self.record(format!("add_tracks:{}", playlist_id));
        if self.fail_add_tracks {
            return Err(AppError::Api {
                status: 500,
                message: "Server error".to_string(),
            });
        }
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }
}

/// Requests seen by the fake Spotify server.
#[derive(Default)]
pub struct FakeSpotifyState {
    pub bad_gateways: AtomicUsize,
    pub rate_limits: AtomicUsize,
    pub retry_after_secs: AtomicUsize,
    pub paths: Mutex<Vec<String>>,
    pub recommendation_queries: Mutex<Vec<HashMap<String, String>>>,
    pub feature_queries: Mutex<Vec<String>>,
    pub token_forms: Mutex<Vec<HashMap<String, String>>>,
    pub added_uris: Mutex<Vec<Vec<String>>>,
}

pub struct FakeSpotify {
    pub base_url: String,
    pub state: Arc<FakeSpotifyState>,
}

impl FakeSpotify {
    pub fn api_url(&self) -> String {
        format!("{}/v1", self.base_url)
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.base_url)
    }

    pub fn config(&self, overrides: &[(&str, &str)]) -> Config {
        let api_url = self.api_url();
        let token_url = self.token_url();
        let mut all: Vec<(&str, &str)> = vec![
            ("SPOTIFY_API_URL", api_url.as_str()),
            ("SPOTIFY_TOKEN_URL", token_url.as_str()),
        ];
        all.extend_from_slice(overrides);
        config_with(&all)
    }

    /// Makes the next `count` requests to `/v1/me` answer 502.
    pub fn fail_next_with_bad_gateway(&self, count: usize) {
        self.state.bad_gateways.store(count, Ordering::SeqCst);
    }

    /// Makes the next `count` requests to `/v1/me` answer 429 with `Retry-After`.
    pub fn rate_limit_next(&self, count: usize, retry_after_secs: usize) {
        self.state
            .retry_after_secs
            .store(retry_after_secs, Ordering::SeqCst);
        self.state.rate_limits.store(count, Ordering::SeqCst);
    }

    pub fn paths(&self) -> Vec<String> {
        self.state.paths.lock().unwrap().clone()
    }
}

fn track_json(id: &str, name: &str, artist: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "uri": format!("spotify:track:{}", id),
        "artists": [{ "id": format!("{}-artist", id), "name": artist }],
        "popularity": 50
    })
}

fn features_json(id: &str) -> Value {
    let (valence, energy, danceability) = match id {
        "t-happy" => (0.9, 0.8, 0.7),
        "t-happy2" => (0.75, 0.6, 0.6),
        "t-sad" => (0.2, 0.3, 0.35),
        "t-romantic" => (0.5, 0.4, 0.5),
        _ => return Value::Null,
    };
    json!({
        "id": id,
        "valence": valence,
        "energy": energy,
        "danceability": danceability,
        "tempo": 120.0,
        "uri": format!("spotify:track:{}", id)
    })
}

fn unauthorized(headers: &HeaderMap) -> Option<Response> {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Bearer "))
        .unwrap_or(false);
    if authorized {
        None
    } else {
        Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "status": 401, "message": "No token provided" } })),
            )
                .into_response(),
        )
    }
}

async fn search(
    State(state): State<Arc<FakeSpotifyState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    let q = params.get("q").cloned().unwrap_or_default();
    state.paths.lock().unwrap().push(format!("/search?q={}", q));
    let items = match q.as_str() {
        "artist:\"Artist A\"" => json!([{ "id": "artist-a", "name": "Artist A" }]),
        "artist:\"Artist B\"" => json!([{ "id": "artist-b", "name": "Artist B" }]),
        _ => json!([]),
    };
    Json(json!({ "artists": { "items": items, "total": 1 } })).into_response()
}

async fn top_tracks(
    State(state): State<Arc<FakeSpotifyState>>,
    headers: HeaderMap,
    Path(artist_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    state.paths.lock().unwrap().push(format!(
        "/artists/{}/top-tracks?market={}",
        artist_id,
        params.get("market").cloned().unwrap_or_default()
    ));
    let tracks = match artist_id.as_str() {
        "artist-a" => json!([
            track_json("t-happy", "Happy Song", "Artist A"),
            track_json("t-sad", "Sad Song", "Artist A"),
            track_json("t-romantic", "Love Song", "Artist A"),
            track_json("t-none", "Podcast Intro", "Artist A"),
        ]),
        "artist-b" => json!([
            track_json("t-happy2", "Sunny Day", "Artist B"),
            track_json("t-happy", "Happy Song", "Artist A"),
        ]),
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": { "status": 404, "message": "Resource not found" } })),
            )
                .into_response();
        }
    };
    Json(json!({ "tracks": tracks })).into_response()
}

async fn audio_features(
    State(state): State<Arc<FakeSpotifyState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    let ids = params.get("ids").cloned().unwrap_or_default();
    state.feature_queries.lock().unwrap().push(ids.clone());
    let features: Vec<Value> = ids.split(',').map(features_json).collect();
    Json(json!({ "audio_features": features })).into_response()
}

async fn recommendations(
    State(state): State<Arc<FakeSpotifyState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(20);
    state
        .recommendation_queries
        .lock()
        .unwrap()
        .push(params.clone());
    let tracks: Vec<Value> = (1..=limit.min(5))
        .map(|i| track_json(&format!("rec-{}", i), &format!("Recommended {}", i), "Someone"))
        .collect();
    Json(json!({ "tracks": tracks, "seeds": [] })).into_response()
}

async fn me(State(state): State<Arc<FakeSpotifyState>>, headers: HeaderMap) -> Response {
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    state.paths.lock().unwrap().push("/me".to_string());
    let limited = state.rate_limits.load(Ordering::SeqCst);
    if limited > 0 {
        state.rate_limits.store(limited - 1, Ordering::SeqCst);
        let retry_after = state.retry_after_secs.load(Ordering::SeqCst).to_string();
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [("retry-after", retry_after)],
            Json(json!({ "error": { "status": 429, "message": "API rate limit exceeded" } })),
        )
            .into_response();
    }
    let remaining = state.bad_gateways.load(Ordering::SeqCst);
    if remaining > 0 {
        state.bad_gateways.store(remaining - 1, Ordering::SeqCst);
        return (StatusCode::BAD_GATEWAY, "Bad gateway").into_response();
    }
    Json(json!({ "id": "user-1", "display_name": "Test User" })).into_response()
}

async fn create_playlist(
    State(state): State<Arc<FakeSpotifyState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    state
        .paths
        .lock()
        .unwrap()
        .push(format!("/users/{}/playlists", user_id));
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "pl-1",
            "name": body["name"],
            "description": body["description"],
            "public": body["public"],
            "collaborative": false,
            "external_urls": { "spotify": "https://open.spotify.com/playlist/pl-1" }
        })),
    )
        .into_response()
}

async fn add_tracks(
    State(state): State<Arc<FakeSpotifyState>>,
    headers: HeaderMap,
    Path(playlist_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    state
        .paths
        .lock()
        .unwrap()
        .push(format!("/playlists/{}/tracks", playlist_id));
    let uris: Vec<String> = body["uris"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|u| u.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    state.added_uris.lock().unwrap().push(uris);
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap-1" }))).into_response()
}

async fn token_endpoint(
    State(state): State<Arc<FakeSpotifyState>>,
    headers: HeaderMap,
    axum::Form(form): axum::Form<HashMap<String, String>>,
) -> Response {
    state.token_forms.lock().unwrap().push(form.clone());

    let basic = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Basic "))
        .unwrap_or(false);
    if !basic {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_client", "error_description": "Invalid client" })),
        )
            .into_response();
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good-code") => {
            Json(json!({
                "access_token": "access-from-code",
                "token_type": "Bearer",
                "scope": "playlist-modify-private",
                "expires_in": 3600,
                "refresh_token": "refresh-from-code"
            }))
            .into_response()
        }
        Some("refresh_token") if form.get("refresh_token").map(String::as_str) == Some("refresh-1") => {
            Json(json!({
                "access_token": "access-refreshed",
                "token_type": "Bearer",
                "scope": "playlist-modify-private",
                "expires_in": 3600
            }))
            .into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid authorization code" })),
        )
            .into_response(),
    }
}

/// Starts a local server imitating the parts of the Spotify API moodlist uses.
pub async fn spawn_fake_spotify() -> FakeSpotify {
    let state = Arc::new(FakeSpotifyState::default());

    let app = Router::new()
        .route("/v1/search", get(search))
        .route("/v1/artists/{id}/top-tracks", get(top_tracks))
        .route("/v1/audio-features", get(audio_features))
        .route("/v1/recommendations", get(recommendations))
        .route("/v1/me", get(me))
        .route("/v1/users/{id}/playlists", post(create_playlist))
        .route("/v1/playlists/{id}/tracks", post(add_tracks))
        .route("/api/token", post(token_endpoint))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake spotify");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake spotify server");
    });

    FakeSpotify {
        base_url: format!("http://{}", addr),
        state,
    }
}
