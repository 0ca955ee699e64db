// src/handlers/captacoes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, json::AppJson},
    models::captacao::{Captacao, CreateCaptacaoPayload, UpdateCaptacaoPayload},
};

// GET /api/captacoes
#[utoipa::path(
    get,
    path = "/api/captacoes",
    tag = "Captacoes",
    responses((status = 200, description = "Captações por prioridade", body = [Captacao])),
    security(("api_jwt" = []))
)]
pub async fn list_captacoes(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
) -> Result<Json<Vec<Captacao>>, ApiError> {
    let captacoes = app_state
        .captacao_service
        .listar(&usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(captacoes))
}

// POST /api/captacoes
#[utoipa::path(
    post,
    path = "/api/captacoes",
    tag = "Captacoes",
    request_body = CreateCaptacaoPayload,
    responses(
        (status = 201, description = "Captação criada", body = Captacao),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_captacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    AppJson(payload): AppJson<CreateCaptacaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let captacao = app_state
        .captacao_service
        .criar(&payload, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(captacao)))
}

// PUT /api/captacoes/{id}
#[utoipa::path(
    put,
    path = "/api/captacoes/{id}",
    tag = "Captacoes",
    params(("id" = i64, Path, description = "ID da captação")),
    request_body = UpdateCaptacaoPayload,
    responses(
        (status = 200, description = "Captação atualizada", body = Captacao),
        (status = 404, description = "Captação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_captacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateCaptacaoPayload>,
) -> Result<Json<Captacao>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let captacao = app_state
        .captacao_service
        .atualizar(id, &payload, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(captacao))
}

// DELETE /api/captacoes/{id}
#[utoipa::path(
    delete,
    path = "/api/captacoes/{id}",
    tag = "Captacoes",
    params(("id" = i64, Path, description = "ID da captação")),
    responses(
        (status = 204, description = "Captação excluída"),
        (status = 404, description = "Captação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_captacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    app_state
        .captacao_service
        .deletar(id, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
