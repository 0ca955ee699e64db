// src/handlers/links.rs

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
    models::link::{CreateLinkPayload, LinkResponse, UpdateLinkPayload},
};

// GET /api/corretores/links
#[utoipa::path(
    get,
    path = "/api/corretores/links",
    tag = "Links",
    responses(
        (status = 200, description = "Todos os links (admin) ou os do corretor logado", body = [LinkResponse])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_links(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
) -> Result<Json<Vec<LinkResponse>>, ApiError> {
    let links = app_state
        .link_service
        .listar(&usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(links))
}

// GET /api/corretores/{id}/links
#[utoipa::path(
    get,
    path = "/api/corretores/{id}/links",
    tag = "Links",
    params(("id" = i64, Path, description = "ID do corretor")),
    responses(
        (status = 200, description = "Links vinculados ao corretor", body = [LinkResponse]),
        (status = 403, description = "Corretor consultando outro corretor")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_links_do_corretor(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(corretor_id): Path<i64>,
) -> Result<Json<Vec<LinkResponse>>, ApiError> {
    let links = app_state
        .link_service
        .listar_do_corretor(corretor_id, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(links))
}

// POST /api/links
#[utoipa::path(
    post,
    path = "/api/links",
    tag = "Links",
    request_body = CreateLinkPayload,
    responses(
        (status = 201, description = "Link criado", body = LinkResponse),
        (status = 400, description = "Dados inválidos ou corretor inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_link(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    AppJson(payload): AppJson<CreateLinkPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let link = app_state
        .link_service
        .criar(&payload, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(link)))
}

// PUT /api/corretores/links/{id}
#[utoipa::path(
    put,
    path = "/api/corretores/links/{id}",
    tag = "Links",
    params(("id" = i64, Path, description = "ID do link")),
    request_body = UpdateLinkPayload,
    responses(
        (status = 200, description = "Link atualizado", body = LinkResponse),
        (status = 404, description = "Link não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_link(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateLinkPayload>,
) -> Result<Json<LinkResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let link = app_state
        .link_service
        .atualizar(id, &payload, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(link))
}

// DELETE /api/corretores/links/{id}
#[utoipa::path(
    delete,
    path = "/api/corretores/links/{id}",
    tag = "Links",
    params(("id" = i64, Path, description = "ID do link")),
    responses(
        (status = 204, description = "Link excluído"),
        (status = 404, description = "Link não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_link(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    app_state
        .link_service
        .deletar(id, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
