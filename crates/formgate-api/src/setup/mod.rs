pub mod routes;
pub mod server;

use crate::state::AppState;
use axum::Router;
use formgate_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Sessions idle past their TTL are swept this often.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Build the application state and router, and start the session sweeper.
pub async fn initialize_app(config: Config) -> anyhow::Result<(Arc<AppState>, Router)> {
    let state = AppState::from_config(config).await?;

    tokio::spawn(state.sessions.clone().run_sweeper(SESSION_SWEEP_INTERVAL));

    let router = routes::build_router(state.clone());
    Ok((state, router))
}
