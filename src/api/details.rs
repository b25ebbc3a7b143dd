use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::{
    assembler::{PlaylistAssembler, PlaylistRequest},
    error::AppError,
    mood::Mood,
    render,
    server::AppState,
    session::{CookieTokenCache, TokenCache},
    spotify::{SpotifyClient, auth},
    types::{DetailsForm, Token},
    utils, warning,
};

pub async fn details_form(jar: PrivateCookieJar) -> Response {
    let cache = CookieTokenCache::new(jar);
    if cache.get().is_none() {
        return Redirect::to("/").into_response();
    }
    (cache.into_jar(), Html(render::details_page())).into_response()
}

pub async fn details_submit(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<DetailsForm>,
) -> Result<Response, AppError> {
    let request = build_request(form)?;

    let mut cache = CookieTokenCache::new(jar);
    let token = match auth::valid_token(&state.http, &state.config, &mut cache).await {
        Ok(Some(token)) => token,
        Ok(None) => return Ok((cache.into_jar(), Redirect::to("/")).into_response()),
        Err(e) => {
            warning!("Session expired: {}", e);
            return Ok((cache.into_jar(), Redirect::to("/")).into_response());
        }
    };

    // The jar may hold a refreshed token, so it goes out on failures too.
    let jar = cache.into_jar();
    match build_playlist(&state, &request, &token).await {
        Ok(page) => Ok((jar, Html(page)).into_response()),
        Err(e) => Ok((jar, e).into_response()),
    }
}

async fn build_playlist(
    state: &AppState,
    request: &PlaylistRequest,
    token: &Token,
) -> Result<String, AppError> {
    let client = SpotifyClient::from_config(state.http.clone(), &state.config, token);
    let assembler = PlaylistAssembler::new(&client, state.options());

    let selection = assembler.assemble(request).await?;
    let playlist = if state.config.publish_playlists {
        assembler.publish(request.mood, &selection.tracks).await?
    } else {
        None
    };

    Ok(render::result_page(request, &selection, playlist.as_ref()))
}

pub fn build_request(form: DetailsForm) -> Result<PlaylistRequest, AppError> {
    let mood = Mood::parse(form.mood.as_deref().unwrap_or_default());
    let artists = utils::parse_artist_list(form.artists.as_deref().unwrap_or_default());
    let song_count = utils::parse_song_count(form.song_no.as_deref())?;
    PlaylistRequest::new(mood, artists, song_count)
}
