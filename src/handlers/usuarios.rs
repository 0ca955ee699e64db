// src/handlers/usuarios.rs

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
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        json::AppJson,
        rbac::{PermUsuariosGerenciar, RequirePermission},
    },
    models::auth::{CorretorResumo, CreateUsuarioPayload, UpdateUsuarioPayload, Usuario},
};

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    responses(
        (status = 200, description = "Todos os usuários", body = [Usuario]),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_usuarios(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsuariosGerenciar>,
    AuthenticatedUser(ator): AuthenticatedUser,
) -> Result<Json<Vec<Usuario>>, ApiError> {
    let usuarios = app_state
        .usuario_service
        .listar(&ator)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(usuarios))
}

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CreateUsuarioPayload,
    responses(
        (status = 201, description = "Usuário criado", body = Usuario),
        (status = 400, description = "Dados inválidos, e-mail ou usuário já em uso"),
        (status = 403, description = "Sem permissão para o cargo pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsuariosGerenciar>,
    AuthenticatedUser(ator): AuthenticatedUser,
    AppJson(payload): AppJson<CreateUsuarioPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let usuario = app_state
        .usuario_service
        .criar(&payload, &ator)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

// GET /api/usuarios/{id}
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário", body = Usuario),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsuariosGerenciar>,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Usuario>, ApiError> {
    let usuario = app_state
        .usuario_service
        .obter(id, &ator)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(usuario))
}

// PUT /api/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i64, Path, description = "ID do usuário")),
    request_body = UpdateUsuarioPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = Usuario),
        (status = 403, description = "Conta ou cargo fora do alcance do administrador"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsuariosGerenciar>,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateUsuarioPayload>,
) -> Result<Json<Usuario>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let usuario = app_state
        .usuario_service
        .atualizar(id, &payload, &ator)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(usuario))
}

// DELETE /api/usuarios/{id}
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário excluído"),
        (status = 403, description = "Auto-exclusão ou conta de administrador"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermUsuariosGerenciar>,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    app_state
        .usuario_service
        .deletar(id, &ator)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/corretores
#[utoipa::path(
    get,
    path = "/api/corretores",
    tag = "Usuarios",
    responses((status = 200, description = "Corretores ativos", body = [CorretorResumo])),
    security(("api_jwt" = []))
)]
pub async fn list_corretores(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
) -> Result<Json<Vec<CorretorResumo>>, ApiError> {
    let corretores = app_state
        .usuario_service
        .listar_corretores(&ator)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(corretores))
}
