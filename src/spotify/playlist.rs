use crate::{
    error::AppError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest, CurrentUser,
        PlaylistRef,
    },
};

use super::SpotifyClient;

/// Maximum URIs per `POST /playlists/{id}/tracks` call.
pub const ADD_TRACKS_CHUNK: usize = 100;

impl SpotifyClient {
    pub(crate) async fn fetch_current_user_id(&self) -> Result<String, AppError> {
        let api_url = self.url("/me");
        let user: CurrentUser = self.send(|| self.http.get(&api_url)).await?;
        Ok(user.id)
    }

    /// Creates a private, non-collaborative playlist owned by `user_id`.
    pub(crate) async fn post_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRef, AppError> {
        let api_url = self.url(&format!("/users/{user_id}/playlists", user_id = user_id));
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
            collaborative: false,
        };

        self.send(|| self.http.post(&api_url).json(&body)).await
    }

    pub(crate) async fn post_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), AppError> {
        let api_url = self.url(&format!(
            "/playlists/{playlist_id}/tracks",
            playlist_id = playlist_id
        ));

        for chunk in uris.chunks(ADD_TRACKS_CHUNK) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let _: AddTrackToPlaylistResponse =
                self.send(|| self.http.post(&api_url).json(&body)).await?;
        }

        Ok(())
    }
}
