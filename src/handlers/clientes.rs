// src/handlers/clientes.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
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
        rbac::{PermClientesAtribuir, RequirePermission},
    },
    models::{
        cliente::{
            Agendamento, AtribuirClientePayload, Cliente, CreateAgendamentoPayload, CreateClientePayload,
            DuplicadoResponse, DuplicadosQuery, ResultadoCriacao, UpdateClientePayload,
        },
        historico::{HistoricoAtribuicoes, HistoricoStatus},
    },
};

// =============================================================================
//  1. CRUD
// =============================================================================

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    responses(
        (status = 200, description = "Clientes visíveis para o usuário", body = [Cliente]),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clientes(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
) -> Result<Json<Vec<Cliente>>, ApiError> {
    let clientes = app_state
        .cliente_service
        .listar(&usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(clientes))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CreateClientePayload,
    responses(
        (status = 201, description = "Cliente cadastrado", body = Cliente),
        (status = 409, description = "Telefone já cadastrado (reenviar com force = true)", body = DuplicadoResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    AppJson(payload): AppJson<CreateClientePayload>,
) -> Result<Response, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let resultado = app_state
        .cliente_service
        .criar(&payload, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let resposta = match resultado {
        ResultadoCriacao::Criado(cliente) => (StatusCode::CREATED, Json(cliente)).into_response(),
        ResultadoCriacao::Duplicado(duplicatas) => {
            let error = if locale.is_english() {
                "Duplicate client"
            } else {
                "Cliente duplicado"
            };
            (
                StatusCode::CONFLICT,
                Json(DuplicadoResponse {
                    error: error.to_string(),
                    duplicatas,
                    allow_force: true,
                }),
            )
                .into_response()
        }
    };
    Ok(resposta)
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Cliente),
        (status = 403, description = "Fora do escopo do usuário"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Cliente>, ApiError> {
    let cliente = app_state
        .cliente_service
        .obter(id, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cliente))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    request_body = UpdateClientePayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Cliente),
        (status = 403, description = "Sem permissão ou fora do escopo"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateClientePayload>,
) -> Result<Json<Cliente>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let cliente = app_state
        .cliente_service
        .atualizar(id, &payload, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cliente))
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente excluído"),
        (status = 403, description = "Sem permissão ou fora do escopo"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    app_state
        .cliente_service
        .deletar(id, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  2. DUPLICADOS E ATRIBUIÇÃO
// =============================================================================

// GET /api/clientes/duplicados?telefone=
#[utoipa::path(
    get,
    path = "/api/clientes/duplicados",
    tag = "Clientes",
    params(DuplicadosQuery),
    responses(
        (status = 200, description = "Clientes com o mesmo telefone", body = [Cliente])
    ),
    security(("api_jwt" = []))
)]
pub async fn find_duplicados(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Query(query): Query<DuplicadosQuery>,
) -> Result<Json<Vec<Cliente>>, ApiError> {
    let duplicados = app_state
        .cliente_service
        .buscar_duplicados_por_telefone(&query.telefone, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(duplicados))
}

// POST /api/clientes/{id}/atribuir
#[utoipa::path(
    post,
    path = "/api/clientes/{id}/atribuir",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    request_body = AtribuirClientePayload,
    responses(
        (status = 200, description = "Atribuição atualizada", body = Cliente),
        (status = 400, description = "Usuário alvo não é um corretor ativo"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn atribuir_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermClientesAtribuir>,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<AtribuirClientePayload>,
) -> Result<Json<Cliente>, ApiError> {
    let cliente = app_state
        .cliente_service
        .atribuir(id, payload.corretor_id, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cliente))
}

// =============================================================================
//  3. HISTÓRICOS
// =============================================================================

// GET /api/clientes/{id}/historico-atribuicoes
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/historico-atribuicoes",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cadastro, primeira atribuição e movimentações seguintes", body = HistoricoAtribuicoes),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn historico_atribuicoes(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<HistoricoAtribuicoes>, ApiError> {
    let historico = app_state
        .historico_service
        .historico_atribuicoes(id, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(historico))
}

// GET /api/clientes/{id}/historico-status
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/historico-status",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Transições de status em ordem cronológica", body = HistoricoStatus),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn historico_status(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<HistoricoStatus>, ApiError> {
    let historico = app_state
        .historico_service
        .historico_status(id, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(historico))
}

// =============================================================================
//  4. AGENDAMENTOS
// =============================================================================

// GET /api/clientes/{id}/agendamentos
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/agendamentos",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses((status = 200, description = "Agendamentos do cliente", body = [Agendamento])),
    security(("api_jwt" = []))
)]
pub async fn list_agendamentos(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Agendamento>>, ApiError> {
    let agendamentos = app_state
        .cliente_service
        .listar_agendamentos(id, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(agendamentos))
}

// POST /api/clientes/{id}/agendamentos
#[utoipa::path(
    post,
    path = "/api/clientes/{id}/agendamentos",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    request_body = CreateAgendamentoPayload,
    responses((status = 201, description = "Agendamento criado", body = Agendamento)),
    security(("api_jwt" = []))
)]
pub async fn create_agendamento(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<CreateAgendamentoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let agendamento = app_state
        .cliente_service
        .criar_agendamento(id, &payload, &usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(agendamento)))
}
