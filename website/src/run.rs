use axum::Router;
use axum::extract::FromRef;
use reqwest::{Client, ClientBuilder};
use snafu::ResultExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::Result;
use crate::config::Config;
use crate::error::{HttpClientSnafu, ServeSnafu, ServerBindSnafu};
use crate::services::session::SessionStore;
use crate::web::all_routes;

/// Upper bound for one round trip to the auth service.
pub const AUTH_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// htmx bundle, relative to the assets directory.
pub const HTMX_ASSET: &str = "assets/htmx.min.js";

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Client,
    pub sessions: SessionStore,

    /// Whether the htmx bundle is available to the pages
    pub htmx: bool,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(AUTH_REQUEST_TIMEOUT)
            .build()
            .context(HttpClientSnafu {
                msg: "Unable to create HTTP client".to_string(),
            })?;

        let htmx = config.assets_dir.join(HTMX_ASSET).is_file();
        if !htmx {
            warn!(
                "{} not found in {}, pages are served without scripts",
                HTMX_ASSET,
                config.assets_dir.display()
            );
        }

        Ok(AppState {
            config: Arc::new(config),
            client,
            sessions: SessionStore::default(),
            htmx,
        })
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new().merge(all_routes(state)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CookieManagerLayer::new()),
    )
}

pub async fn run(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.address, config.server.port);
    let state = AppState::new(config)?;
    let app = build_app(state);

    // Setup the server
    let listener = TcpListener::bind(&addr)
        .await
        .context(ServerBindSnafu { addr: addr.clone() })?;
    info!("HTTP Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(ServeSnafu)?;

    info!("HTTP Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
