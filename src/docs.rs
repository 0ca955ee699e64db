// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Clientes ---
        handlers::clientes::list_clientes,
        handlers::clientes::create_cliente,
        handlers::clientes::get_cliente,
        handlers::clientes::update_cliente,
        handlers::clientes::delete_cliente,
        handlers::clientes::find_duplicados,
        handlers::clientes::atribuir_cliente,
        handlers::clientes::historico_atribuicoes,
        handlers::clientes::historico_status,
        handlers::clientes::list_agendamentos,
        handlers::clientes::create_agendamento,

        // --- Usuários ---
        handlers::usuarios::list_usuarios,
        handlers::usuarios::create_usuario,
        handlers::usuarios::get_usuario,
        handlers::usuarios::update_usuario,
        handlers::usuarios::delete_usuario,
        handlers::usuarios::list_corretores,

        // --- Links ---
        handlers::links::list_links,
        handlers::links::list_links_do_corretor,
        handlers::links::create_link,
        handlers::links::update_link,
        handlers::links::delete_link,

        // --- Captações ---
        handlers::captacoes::list_captacoes,
        handlers::captacoes::create_captacao,
        handlers::captacoes::update_captacao,
        handlers::captacoes::delete_captacao,

        // --- Logs ---
        handlers::logs::list_logs,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Cargo,
            models::auth::StatusUsuario,
            models::auth::Usuario,
            models::auth::RegisterUserPayload,
            models::auth::RegisterResponse,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUsuarioPayload,
            models::auth::UpdateUsuarioPayload,
            models::auth::CorretorResumo,

            // --- Clientes ---
            models::cliente::StatusCliente,
            models::cliente::Interesse,
            models::cliente::Cliente,
            models::cliente::CreateClientePayload,
            models::cliente::UpdateClientePayload,
            models::cliente::AtribuirClientePayload,
            models::cliente::DuplicadoResponse,
            models::cliente::Agendamento,
            models::cliente::CreateAgendamentoPayload,

            // --- Históricos ---
            models::historico::TipoEvento,
            models::historico::PrimeiraAtribuicao,
            models::historico::ItemAtribuicao,
            models::historico::HistoricoAtribuicoes,
            models::historico::ItemStatus,
            models::historico::HistoricoStatus,

            // --- Links ---
            models::link::CorretorLink,
            models::link::LinkResponse,
            models::link::CreateLinkPayload,
            models::link::UpdateLinkPayload,

            // --- Captações ---
            models::captacao::Prioridade,
            models::captacao::Captacao,
            models::captacao::CreateCaptacaoPayload,
            models::captacao::UpdateCaptacaoPayload,

            // --- Auditoria ---
            models::auditoria::LogAuditoria,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de disponibilidade"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Clientes", description = "Cadastro, atribuição e histórico de clientes"),
        (name = "Usuarios", description = "Administração de contas e corretores"),
        (name = "Links", description = "Links compartilhados com corretores"),
        (name = "Captacoes", description = "Captação de imóveis"),
        (name = "Logs", description = "Trilha de auditoria")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
