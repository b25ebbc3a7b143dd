use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};

use crate::{error::AppError, types::TrackRef};

/// Song count used when the form leaves `song_no` empty.
pub const DEFAULT_SONG_COUNT: usize = 50;

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Fresh value for `SESSION_SECRET`: 64 random bytes, base64 without padding.
pub fn generate_session_secret() -> String {
    let mut bytes = [0u8; 64];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn remove_duplicate_tracks(tracks: &mut Vec<TrackRef>) {
    let mut seen_ids = HashSet::new();
    tracks.retain(|track| seen_ids.insert(track.id.clone()));
}

/// Splits the comma-separated artists field. Names are trimmed and empty
/// entries dropped; order and duplicates are kept.
pub fn parse_artist_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_song_count(input: Option<&str>) -> Result<usize, AppError> {
    let raw = match input.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_SONG_COUNT),
        Some(raw) => raw,
    };

    match raw.parse::<usize>() {
        Ok(0) => Err(AppError::InvalidInput(
            "Number of songs must be at least 1".to_string(),
        )),
        Ok(count) => Ok(count),
        Err(_) => Err(AppError::InvalidInput(format!(
            "Number of songs must be a whole number, got '{}'",
            raw
        ))),
    }
}

pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
