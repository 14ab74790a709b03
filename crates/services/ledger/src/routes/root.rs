use axum::Json;

use crate::types;

/// Capture crate version from Cargo
static CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Root response from service
#[utoipa::path(
    get,
    path = "/api",
    tag = "Misc",
    responses(
        (status = 200, description = "Root response", body = types::RootResponse)
    )
)]
pub async fn root() -> Json<types::RootResponse> {
    Json(types::RootResponse {
        ledger: "Hello, I keep numbers by city!",
        version: CRATE_VERSION,
    })
}
