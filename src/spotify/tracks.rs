use std::collections::HashMap;

use crate::{
    error::AppError,
    mood::RecommendationSeed,
    types::{AudioFeatures, AudioFeaturesResponse, RecommendationsResponse, TrackRef},
};

use super::SpotifyClient;

/// Maximum ids per `GET /audio-features` call.
pub const AUDIO_FEATURES_CHUNK: usize = 100;

impl SpotifyClient {
    /// Fetches audio features for `track_ids`, 100 ids per request.
    ///
    /// Results are matched back by id, so the returned vector lines up with
    /// `track_ids` even if Spotify leaves entries out.
    pub(crate) async fn fetch_audio_features(
        &self,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, AppError> {
        let api_url = self.url("/audio-features");
        let mut by_id: HashMap<String, AudioFeatures> = HashMap::new();

        for chunk in track_ids.chunks(AUDIO_FEATURES_CHUNK) {
            let ids = chunk.join(",");
            let res: AudioFeaturesResponse = self
                .send(|| self.http.get(&api_url).query(&[("ids", ids.as_str())]))
                .await?;

            by_id.extend(
                res.audio_features
                    .into_iter()
                    .flatten()
                    .map(|features| (features.id.clone(), features)),
            );
        }

        Ok(track_ids.iter().map(|id| by_id.remove(id)).collect())
    }

    pub(crate) async fn fetch_recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: u32,
    ) -> Result<Vec<TrackRef>, AppError> {
        let api_url = self.url("/recommendations");
        let bounds = &seed.bounds;
        let params: Vec<(&str, String)> = vec![
            ("seed_genres", seed.genres.join(",")),
            ("limit", limit.to_string()),
            ("min_valence", bounds.valence.start().to_string()),
            ("max_valence", bounds.valence.end().to_string()),
            ("min_energy", bounds.energy.start().to_string()),
            ("max_energy", bounds.energy.end().to_string()),
            ("min_danceability", bounds.danceability.start().to_string()),
            ("max_danceability", bounds.danceability.end().to_string()),
        ];

        let res: RecommendationsResponse = self
            .send(|| self.http.get(&api_url).query(&params))
            .await?;

        Ok(res.tracks)
    }
}
