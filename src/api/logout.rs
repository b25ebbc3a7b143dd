use axum::response::Redirect;
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::session::{CookieTokenCache, TokenCache};

pub async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    let mut cache = CookieTokenCache::new(jar);
    cache.clear();
    (cache.into_jar(), Redirect::to("/"))
}
