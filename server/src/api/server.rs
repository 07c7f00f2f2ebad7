//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::routes::export::{self, ExportApiState};
use super::routes::health;
use crate::core::CoreApp;
use crate::core::config::ExportConfig;
use crate::data::DatabaseService;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until shutdown is triggered. Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let app = self.app;
        let shutdown = app.shutdown.clone();

        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);
        let router = build_router(app.database.clone(), &app.config.export);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            address = %addr,
            backend = %app.database.backend(),
            "Inventory export server listening"
        );

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Assemble the full HTTP router
pub fn build_router(database: Arc<DatabaseService>, export_config: &ExportConfig) -> Router {
    let state = ExportApiState {
        database,
        temp_dir: export_config.temp_dir.clone(),
    };

    Router::new()
        .route("/api/v1/health", get(health::health))
        .nest("/api/v1/resources", export::resource_routes(state.clone()))
        .nest("/api/v1/views", export::view_routes(state))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
