use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::{
    error::AppError,
    server::AppState,
    session::{self, CookieTokenCache, TokenCache},
    spotify::auth,
    success,
    types::CallbackParams,
};

/// OAuth redirect target. Checks the `state` issued by the login page,
/// exchanges the code and stores the token in the session.
pub async fn callback(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(PrivateCookieJar, Redirect), AppError> {
    if let Some(error) = params.error {
        return Err(AppError::Auth(format!("Spotify denied access: {}", error)));
    }

    let Some(code) = params.code else {
        return Err(AppError::Auth("Missing authorization code".to_string()));
    };

    let (jar, expected_state) = session::take_state(jar);
    match (expected_state, params.state) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => return Err(AppError::Auth("OAuth state mismatch".to_string())),
    }

    let token = auth::exchange_code(&state.http, &state.config, &code).await?;

    let mut cache = CookieTokenCache::new(jar);
    cache.set(token);
    success!("User logged in");

    Ok((cache.into_jar(), Redirect::to("/details")))
}
