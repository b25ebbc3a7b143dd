use crate::{
    error::AppError,
    types::{ArtistRef, SearchArtistsResponse, TopTracksResponse, TrackRef},
};

use super::SpotifyClient;

impl SpotifyClient {
    /// Looks up an artist by name and returns the best match.
    ///
    /// The name is quoted into an `artist:` field filter so multi-word names
    /// are matched as a phrase.
    pub(crate) async fn fetch_artist(&self, name: &str) -> Result<Option<ArtistRef>, AppError> {
        let api_url = self.url("/search");
        let query = format!("artist:\"{}\"", name);

        let res: SearchArtistsResponse = self
            .send(|| {
                self.http
                    .get(&api_url)
                    .query(&[("q", query.as_str()), ("type", "artist"), ("limit", "1")])
            })
            .await?;

        Ok(res.artists.items.into_iter().next())
    }

    /// Retrieves an artist's top tracks in the configured market.
    pub(crate) async fn fetch_top_tracks(&self, artist_id: &str) -> Result<Vec<TrackRef>, AppError> {
        let api_url = self.url(&format!("/artists/{id}/top-tracks", id = artist_id));

        let res: TopTracksResponse = self
            .send(|| {
                self.http
                    .get(&api_url)
                    .query(&[("market", self.market.as_str())])
            })
            .await?;

        Ok(res.tracks)
    }
}
