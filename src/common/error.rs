// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio. Os serviços só conhecem este tipo;
// a tradução para HTTP (status + mensagem no idioma do cliente) fica em `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validação de regra de negócio que não cabe no `validator` (ex: corretor inexistente)
    #[error("Dados inválidos: {0}")]
    InvalidInput(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Username já existe")]
    UsernameAlreadyExists,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão negada")]
    PermissionDenied,

    // Admin tentando agir sobre (ou criar) uma conta admin/head-admin
    #[error("Hierarquia de cargos violada")]
    RoleHierarchyViolation,

    #[error("Auto-exclusão não permitida")]
    SelfDeletion,

    // Corretor tentando tocar em cliente que não criou nem lhe foi atribuído
    #[error("Registro fora do escopo do usuário")]
    OutOfScope,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Link não encontrado")]
    LinkNotFound,

    #[error("Captação não encontrada")]
    CaptacaoNotFound,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro "de fio": o que realmente vai para o cliente HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::EmailAlreadyExists
            | AppError::UsernameAlreadyExists
            | AppError::UniqueConstraintViolation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied
            | AppError::RoleHierarchyViolation
            | AppError::SelfDeletion
            | AppError::OutOfScope => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::ClientNotFound
            | AppError::LinkNotFound
            | AppError::CaptacaoNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro de domínio na resposta HTTP, com a mensagem no idioma pedido.
    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        let status = self.status_code();
        let en = locale.is_english();

        if let AppError::ValidationError(errors) = &self {
            let mut details = serde_json::Map::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                details.insert(field.to_string(), json!(messages));
            }
            let error = if en {
                "One or more fields are invalid."
            } else {
                "Um ou mais campos são inválidos."
            };
            return ApiError {
                status,
                error: error.to_string(),
                details: Some(Value::Object(details)),
            };
        }

        let error = match (&self, en) {
            (AppError::InvalidInput(msg), _) => msg.clone(),
            (AppError::UniqueConstraintViolation(msg), _) => msg.clone(),
            (AppError::EmailAlreadyExists, false) => "Este e-mail já está em uso.".into(),
            (AppError::EmailAlreadyExists, true) => "This e-mail is already in use.".into(),
            (AppError::UsernameAlreadyExists, false) => "Este nome de usuário já está em uso.".into(),
            (AppError::UsernameAlreadyExists, true) => "This username is already in use.".into(),
            (AppError::InvalidCredentials, false) => "Usuário ou senha inválidos.".into(),
            (AppError::InvalidCredentials, true) => "Invalid username or password.".into(),
            (AppError::InvalidToken, false) => "Token de autenticação inválido ou ausente.".into(),
            (AppError::InvalidToken, true) => "Missing or invalid authentication token.".into(),
            (AppError::PermissionDenied, false) => "Você não tem permissão para realizar esta ação.".into(),
            (AppError::PermissionDenied, true) => "You are not allowed to perform this action.".into(),
            (AppError::RoleHierarchyViolation, false) => {
                "Apenas o head-admin pode gerenciar contas de administradores.".into()
            }
            (AppError::RoleHierarchyViolation, true) => {
                "Only a head-admin can manage administrator accounts.".into()
            }
            (AppError::SelfDeletion, false) => "Você não pode excluir a sua própria conta.".into(),
            (AppError::SelfDeletion, true) => "You cannot delete your own account.".into(),
            (AppError::OutOfScope, false) => "Este registro não pertence a você.".into(),
            (AppError::OutOfScope, true) => "This record does not belong to you.".into(),
            (AppError::UserNotFound, false) => "Usuário não encontrado.".into(),
            (AppError::UserNotFound, true) => "User not found.".into(),
            (AppError::ClientNotFound, false) => "Cliente não encontrado.".into(),
            (AppError::ClientNotFound, true) => "Client not found.".into(),
            (AppError::LinkNotFound, false) => "Link não encontrado.".into(),
            (AppError::LinkNotFound, true) => "Link not found.".into(),
            (AppError::CaptacaoNotFound, false) => "Captação não encontrada.".into(),
            (AppError::CaptacaoNotFound, true) => "Lead sourcing record not found.".into(),

            // Todos os outros erros (DatabaseError, InternalServerError, ...) viram 500.
            // O detalhe vai para o log, nunca para o cliente.
            (e, en) => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                if en {
                    "An unexpected error occurred.".into()
                } else {
                    "Ocorreu um erro inesperado.".into()
                }
            }
        };

        ApiError {
            status,
            error,
            details: None,
        }
    }
}

// Usado pelos middlewares, que não têm o `Locale` em mãos.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomia_mapeia_para_status_http() {
        assert_eq!(AppError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::EmailAlreadyExists.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::OutOfScope.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ClientNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn erro_interno_nao_vaza_detalhes() {
        let api = AppError::InternalServerError(anyhow::anyhow!("segredo do banco"))
            .to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("segredo"));
    }

    #[test]
    fn mensagem_respeita_idioma() {
        let pt = AppError::ClientNotFound.to_api_error(&Locale("pt".into()));
        let en = AppError::ClientNotFound.to_api_error(&Locale("en".into()));
        assert_eq!(pt.error, "Cliente não encontrado.");
        assert_eq!(en.error, "Client not found.");
    }
}
