use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;
use reqwest::Client;

use crate::{
    Res, api,
    assembler::AssemblyOptions,
    config::Config,
    error::AppError,
    info, session,
};

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: Client,
    key: Key,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: Config, http: Client) -> Self {
        let key = session::derive_key(&config.session_secret);
        Self {
            config: Arc::new(config),
            http,
            key,
        }
    }

    pub fn options(&self) -> AssemblyOptions {
        AssemblyOptions {
            shortfall: self.config.shortfall,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/details", get(api::details_form).post(api::details_submit))
        .route("/callback", get(api::callback))
        .route("/logout", get(api::logout))
        .route("/health", get(api::health))
        .with_state(state)
}

pub async fn start_server(state: AppState, address: &str) -> Res<()> {
    let addr = SocketAddr::from_str(address)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
