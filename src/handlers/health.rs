// src/handlers/health.rs

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::config::AppState;

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Servidor e banco respondendo"),
        (status = 503, description = "Banco indisponível")
    )
)]
pub async fn health_check(State(app_state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "OK" }))),
        Err(e) => {
            tracing::error!("🔥 Health check falhou: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "ERRO" })))
        }
    }
}
