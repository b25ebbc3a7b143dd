use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::{
    error::AppError,
    render,
    server::AppState,
    session::{self, CookieTokenCache, TokenCache},
    spotify::auth,
    utils,
};

/// Login gate: a login link for new visitors, the details form otherwise.
pub async fn home(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Html<String>), AppError> {
    let cache = CookieTokenCache::new(jar);
    if cache.get().is_some() {
        return Ok((cache.into_jar(), Html(render::details_page())));
    }

    let oauth_state = utils::generate_state();
    let auth_url = auth::authorize_url(&state.config, &oauth_state)?;
    let jar = session::store_state(cache.into_jar(), &oauth_state);

    Ok((jar, Html(render::login_page(auth_url.as_str()))))
}
