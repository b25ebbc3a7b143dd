use crate::{
    config::Config,
    error, info,
    server::{self, AppState},
};

pub async fn serve(address: Option<String>) {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    let address = address.unwrap_or_else(|| config.server_address.clone());
    info!(
        "Shortfall policy: {:?}, publishing playlists: {}",
        config.shortfall, config.publish_playlists
    );

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => error!("Cannot initialize server. Err: {}", e),
    };

    if let Err(e) = server::start_server(state, &address).await {
        error!("Server stopped. Err: {}", e);
    }
}
