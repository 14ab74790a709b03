use std::net::{Ipv4Addr, SocketAddr};

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    Router,
};
use callee_config::{config, Settings};
use callee_database::{Database, DatabaseInfo};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

mod routes;
mod types;


#[derive(Clone)]
pub struct AppState {
    pub database: Database,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.database.clone()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::root::root,
        routes::upload_excel::upload_excel,
        routes::add_number::add_number,
        routes::numbers::numbers,
    ),
    tags(
        (name = "Misc", description = "Misc routes for microservice."),
        (name = "Numbers", description = "Import, insert and look up numbers by city.")
    ),
    components(
        schemas(
            types::RootResponse,
            types::UploadPayload,
            types::UploadResponse,
            types::AddNumberPayload,
            types::SuccessResponse,
            types::NumbersResponse,
            types::ErrorResponse,
        )
    ),
)]
struct ApiDoc;

/// Build the application, API routes live under `/api` and static files at the root
pub fn app(state: AppState, config: &Settings) -> Router {
    Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", routes::router())
        .fallback_service(ServeDir::new(&config.api.static_dir))
        .layer(DefaultBodyLimit::max(config.api.body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }

    tracing::info!("Shutting down.");
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Configure logging and environment
    callee_config::configure!(ledger);

    let config = config().await;
    let state = AppState {
        database: DatabaseInfo::Auto
            .connect()
            .await
            .expect("Unable to connect to database"),
    };

    // Configure TCP listener and bind
    let port = config.api.port;
    tracing::info!("Listening on 0.0.0.0:{port}");
    tracing::info!("Play around with the API: http://localhost:{port}/scalar");
    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(&address).await?;
    axum::serve(listener, app(state, &config).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}
