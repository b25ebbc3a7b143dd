use axum_extra::extract::cookie::PrivateCookieJar;

use crate::{types::Token, warning};

use super::{COOKIE_TOKEN_KEY, TokenCache, removal_cookie, session_cookie};

/// Token cache backed by the request's private cookie jar.
///
/// Changes only reach the browser when the jar returned by
/// [`CookieTokenCache::into_jar`] is part of the response.
pub struct CookieTokenCache {
    jar: PrivateCookieJar,
}

impl CookieTokenCache {
    pub fn new(jar: PrivateCookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> PrivateCookieJar {
        self.jar
    }
}

impl TokenCache for CookieTokenCache {
    fn get(&self) -> Option<Token> {
        let cookie = self.jar.get(COOKIE_TOKEN_KEY)?;
        match serde_json::from_str(cookie.value()) {
            Ok(token) => Some(token),
            Err(e) => {
                warning!("Ignoring unreadable token cookie: {}", e);
                None
            }
        }
    }

    fn set(&mut self, token: Token) {
        match serde_json::to_string(&token) {
            Ok(json) => self.jar = self.jar.clone().add(session_cookie(COOKIE_TOKEN_KEY, json)),
            Err(e) => warning!("Failed to store token in session: {}", e),
        }
    }

    fn clear(&mut self) {
        self.jar = self.jar.clone().remove(removal_cookie(COOKIE_TOKEN_KEY));
    }
}
