// src/handlers/logs.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermLogsLer, RequirePermission},
    },
    models::auditoria::{LogAuditoria, LogsQuery},
};

// GET /api/logs
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    params(LogsQuery),
    responses(
        (status = 200, description = "Entradas de auditoria, mais recentes primeiro", body = [LogAuditoria]),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_logs(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermLogsLer>,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Query(filtro): Query<LogsQuery>,
) -> Result<Json<Vec<LogAuditoria>>, ApiError> {
    let logs = app_state
        .auditoria_service
        .listar(&filtro, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(logs))
}
