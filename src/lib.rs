// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

/// Monta o router completo da API. Tudo fora de `/api/auth/login`, `/api/auth/register`
/// e `/api/health` passa pelo `auth_guard`.
pub fn criar_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let me_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let cliente_routes = Router::new()
        .route(
            "/",
            get(handlers::clientes::list_clientes).post(handlers::clientes::create_cliente),
        )
        .route("/duplicados", get(handlers::clientes::find_duplicados))
        .route(
            "/{id}",
            get(handlers::clientes::get_cliente)
                .put(handlers::clientes::update_cliente)
                .delete(handlers::clientes::delete_cliente),
        )
        .route("/{id}/atribuir", post(handlers::clientes::atribuir_cliente))
        .route("/{id}/historico-atribuicoes", get(handlers::clientes::historico_atribuicoes))
        .route("/{id}/historico-status", get(handlers::clientes::historico_status))
        .route(
            "/{id}/agendamentos",
            get(handlers::clientes::list_agendamentos).post(handlers::clientes::create_agendamento),
        );

    let usuario_routes = Router::new()
        .route(
            "/",
            get(handlers::usuarios::list_usuarios).post(handlers::usuarios::create_usuario),
        )
        .route(
            "/{id}",
            get(handlers::usuarios::get_usuario)
                .put(handlers::usuarios::update_usuario)
                .delete(handlers::usuarios::delete_usuario),
        );

    let corretor_routes = Router::new()
        .route("/", get(handlers::usuarios::list_corretores))
        .route("/links", get(handlers::links::list_links))
        .route(
            "/links/{id}",
            put(handlers::links::update_link).delete(handlers::links::delete_link),
        )
        .route("/{id}/links", get(handlers::links::list_links_do_corretor));

    let captacao_routes = Router::new()
        .route(
            "/",
            get(handlers::captacoes::list_captacoes).post(handlers::captacoes::create_captacao),
        )
        .route(
            "/{id}",
            put(handlers::captacoes::update_captacao).delete(handlers::captacoes::delete_captacao),
        );

    // Rotas protegidas: o middleware roda antes de qualquer handler
    let protegidas = Router::new()
        .nest("/auth", me_routes)
        .nest("/clientes", cliente_routes)
        .nest("/usuarios", usuario_routes)
        .nest("/corretores", corretor_routes)
        .nest("/captacoes", captacao_routes)
        .route("/links", post(handlers::links::create_link))
        .route("/logs", get(handlers::logs::list_logs))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(handlers::health::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", protegidas)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
