//! Per-user session state.
//!
//! The OAuth token lives in the user's session, never on the server. The
//! [`TokenCache`] trait abstracts that storage: [`CookieTokenCache`] keeps
//! it in an encrypted cookie, [`MemoryTokenCache`] keeps it in memory for
//! tests.
//!
//! Cookies are encrypted and authenticated with a key derived from
//! `SESSION_SECRET`. The same secret yields the same key, so sessions
//! survive restarts; a new secret invalidates every existing cookie.

mod cookie;
mod memory;

pub use cookie::CookieTokenCache;
pub use memory::MemoryTokenCache;

use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use sha2::{Digest, Sha512};

use crate::types::Token;

pub const COOKIE_TOKEN_KEY: &str = "moodlist_token";
pub const COOKIE_STATE_KEY: &str = "moodlist_oauth_state";

pub trait TokenCache {
    fn get(&self) -> Option<Token>;
    fn set(&mut self, token: Token);
    fn clear(&mut self);
}

/// Derives the 64-byte cookie key from the configured secret.
pub fn derive_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

pub(crate) fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub(crate) fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Remembers the OAuth `state` sent with the authorization request.
pub fn store_state(jar: PrivateCookieJar, state: &str) -> PrivateCookieJar {
    jar.add(session_cookie(COOKIE_STATE_KEY, state.to_string()))
}

/// Returns the remembered OAuth `state` and removes it from the jar.
pub fn take_state(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    let state = jar.get(COOKIE_STATE_KEY).map(|c| c.value().to_string());
    (jar.remove(removal_cookie(COOKIE_STATE_KEY)), state)
}
