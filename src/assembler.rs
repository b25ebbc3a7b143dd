//! # Playlist Assembler
//!
//! Turns a mood and a list of artist names into an ordered selection of
//! tracks:
//!
//! 1. **Candidates**: every artist is looked up by name and its top tracks
//!    are appended to the pool, in artist order and then Spotify's order.
//!    Unknown artists are skipped and reported back.
//! 2. **Classification**: audio features are fetched for the pool and the
//!    tracks inside the mood's bands are kept, in pool order.
//! 3. **Reconciliation**: more matches than requested are truncated to the
//!    first N. Fewer matches are topped up from the recommendation endpoint
//!    when the [`ShortfallPolicy`] allows it.
//!
//! Any catalog error aborts the whole assembly.

use std::{cmp::Ordering, collections::HashSet, str::FromStr};

use crate::{
    error::AppError,
    info,
    mood::Mood,
    spotify::Catalog,
    success,
    types::{PlaylistRef, TrackRef},
    utils, warning,
};

/// Maximum `limit` accepted by the recommendation endpoint.
pub const RECOMMENDATION_LIMIT: usize = 100;

/// What to do when fewer tracks match than were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortfallPolicy {
    /// Ask the recommendation endpoint for the missing tracks.
    #[default]
    Recommend,
    /// Return only the matching tracks.
    Keep,
}

impl FromStr for ShortfallPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recommend" | "fill" => Ok(ShortfallPolicy::Recommend),
            "keep" => Ok(ShortfallPolicy::Keep),
            other => Err(AppError::Config(format!(
                "Unknown shortfall policy '{}', expected 'recommend' or 'keep'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyOptions {
    pub shortfall: ShortfallPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistRequest {
    pub mood: Mood,
    pub artists: Vec<String>,
    pub song_count: usize,
}

impl PlaylistRequest {
    pub fn new(mood: Mood, artists: Vec<String>, song_count: usize) -> Result<Self, AppError> {
        if song_count == 0 {
            return Err(AppError::InvalidInput(
                "Number of songs must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            mood,
            artists,
            song_count,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub tracks: Vec<TrackRef>,
    pub candidate_count: usize,
    pub matched_count: usize,
    pub recommended_count: usize,
    pub skipped_artists: Vec<String>,
}

pub struct PlaylistAssembler<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    options: AssemblyOptions,
}

impl<'a, C: Catalog + ?Sized> PlaylistAssembler<'a, C> {
    pub fn new(catalog: &'a C, options: AssemblyOptions) -> Self {
        Self { catalog, options }
    }

    pub async fn assemble(&self, request: &PlaylistRequest) -> Result<Selection, AppError> {
        let (candidates, skipped_artists) = self.gather_candidates(&request.artists).await?;
        let candidate_count = candidates.len();

        let matched = self.classify(request.mood, candidates).await?;
        let matched_count = matched.len();

        let (tracks, recommended_count) = self
            .reconcile(request.mood, matched, request.song_count)
            .await?;

        info!(
            "Selected {} of {} requested tracks for mood {} ({} candidates, {} matched, {} recommended)",
            tracks.len(),
            request.song_count,
            request.mood,
            candidate_count,
            matched_count,
            recommended_count
        );
        info!(
            "Selection: [{}]",
            tracks
                .iter()
                .map(|t| t.uri.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Selection {
            tracks,
            candidate_count,
            matched_count,
            recommended_count,
            skipped_artists,
        })
    }

    /// Returns the de-duplicated candidate pool and the names that matched no artist.
    pub async fn gather_candidates(
        &self,
        artists: &[String],
    ) -> Result<(Vec<TrackRef>, Vec<String>), AppError> {
        let mut candidates = Vec::new();
        let mut skipped = Vec::new();

        for name in artists {
            match self.catalog.search_artist(name).await? {
                Some(artist) => {
                    let tracks = self.catalog.top_tracks(&artist.id).await?;
                    info!("Found {} top tracks for {}", tracks.len(), artist.name);
                    candidates.extend(tracks);
                }
                None => {
                    warning!("No results found for artist: {}", name);
                    skipped.push(name.clone());
                }
            }
        }

        utils::remove_duplicate_tracks(&mut candidates);
        Ok((candidates, skipped))
    }

    pub async fn classify(
        &self,
        mood: Mood,
        candidates: Vec<TrackRef>,
    ) -> Result<Vec<TrackRef>, AppError> {
        if mood.bands().is_none() || candidates.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = candidates.iter().map(|t| t.id.clone()).collect();
        let features = self.catalog.audio_features(&ids).await?;

        Ok(candidates
            .into_iter()
            .zip(features)
            .filter_map(|(track, features)| match features {
                Some(f) if mood.matches(&f) => Some(track),
                _ => None,
            })
            .collect())
    }

    /// Returns the final tracks and how many of them came from recommendations.
    pub async fn reconcile(
        &self,
        mood: Mood,
        mut selected: Vec<TrackRef>,
        target: usize,
    ) -> Result<(Vec<TrackRef>, usize), AppError> {
        match selected.len().cmp(&target) {
            Ordering::Greater => {
                selected.truncate(target);
                Ok((selected, 0))
            }
            Ordering::Equal => Ok((selected, 0)),
            Ordering::Less => {
                if self.options.shortfall == ShortfallPolicy::Keep {
                    return Ok((selected, 0));
                }
                let Some(seed) = mood.recommendation_seed() else {
                    return Ok((selected, 0));
                };

                let shortfall = (target - selected.len()).min(RECOMMENDATION_LIMIT);
                let recommended = self
                    .catalog
                    .recommendations(&seed, shortfall as u32)
                    .await?;

                let before = selected.len();
                let mut seen: HashSet<String> = selected.iter().map(|t| t.id.clone()).collect();
                for track in recommended {
                    if selected.len() >= target {
                        break;
                    }
                    if seen.insert(track.id.clone()) {
                        selected.push(track);
                    }
                }

                let added = selected.len() - before;
                Ok((selected, added))
            }
        }
    }

    /// Creates a private playlist for the current user holding `tracks`.
    /// Nothing is created for an empty selection.
    pub async fn publish(
        &self,
        mood: Mood,
        tracks: &[TrackRef],
    ) -> Result<Option<PlaylistRef>, AppError> {
        if tracks.is_empty() {
            info!("Nothing selected for mood {}, no playlist created", mood);
            return Ok(None);
        }

        let user_id = self.catalog.current_user_id().await?;
        let name = playlist_name(mood);
        let description = format!(
            "{} tracks picked for a {} mood by moodlist",
            tracks.len(),
            mood
        );

        let playlist = self
            .catalog
            .create_playlist(&user_id, &name, &description)
            .await?;

        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
        if let Err(e) = self.catalog.add_tracks(&playlist.id, &uris).await {
            warning!(
                "Playlist {} ({}) was created but adding tracks failed: {}",
                playlist.name,
                playlist.id,
                e
            );
            return Err(orphaned_playlist_error(&playlist, e));
        }

        success!("Playlist {} created with {} tracks", playlist.name, uris.len());
        Ok(Some(playlist))
    }
}

/// Keeps the status of `e` and names the playlist left without tracks.
fn orphaned_playlist_error(playlist: &PlaylistRef, e: AppError) -> AppError {
    let note = format!(
        "playlist '{}' ({}) was created but is empty",
        playlist.name, playlist.id
    );
    match e {
        AppError::Api { status, message } => AppError::Api {
            status,
            message: format!("{}; {}", message, note),
        },
        other => AppError::Api {
            status: 502,
            message: format!("{}; {}", other, note),
        },
    }
}

pub fn playlist_name(mood: Mood) -> String {
    format!("{} mood mix", mood.title())
}
