use reqwest::{Client, Url};

use crate::{
    config::Config,
    error::AppError,
    info,
    session::TokenCache,
    types::{Token, TokenResponse},
    utils, warning,
};

use super::api_error;

/// Builds the Spotify authorization URL for the authorization-code flow.
///
/// `show_dialog=true` makes Spotify ask again even if the user approved the
/// app before, so switching accounts after a logout works.
pub fn authorize_url(config: &Config, state: &str) -> Result<Url, AppError> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| AppError::Config(format!("Invalid SPOTIFY_AUTH_URL: {}", e)))
}

/// Exchanges an authorization code for an access token.
///
/// The client authenticates with its id and secret over HTTP basic auth.
/// The code is single-use and has to be exchanged right after the callback.
pub async fn exchange_code(http: &Client, config: &Config, code: &str) -> Result<Token, AppError> {
    let res = http
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(api_error(res).await);
    }

    let json: TokenResponse = res.json().await?;
    Ok(json.into_token(None, utils::unix_now()))
}

/// Exchanges a refresh token for a new access token. A refresh token missing
/// from the response keeps the previous one.
pub async fn refresh_token(http: &Client, config: &Config, token: &Token) -> Result<Token, AppError> {
    let res = http
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", token.refresh_token.as_str()),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(api_error(res).await);
    }

    let json: TokenResponse = res.json().await?;
    Ok(json.into_token(Some(&token.refresh_token), utils::unix_now()))
}

/// Returns a usable token from `cache`, refreshing it first when it is about
/// to expire. `None` means the user is not logged in.
///
/// A failed refresh clears the cache, so the next request starts a new login.
pub async fn valid_token<T>(
    http: &Client,
    config: &Config,
    cache: &mut T,
) -> Result<Option<Token>, AppError>
where
    T: TokenCache + ?Sized,
{
    let Some(token) = cache.get() else {
        return Ok(None);
    };

    if !token.is_expired(utils::unix_now()) {
        return Ok(Some(token));
    }

    match refresh_token(http, config, &token).await {
        Ok(fresh) => {
            info!("Access token refreshed");
            cache.set(fresh.clone());
            Ok(Some(fresh))
        }
        Err(e) => {
            warning!("Token refresh failed, clearing session: {}", e);
            cache.clear();
            Err(e)
        }
    }
}
