// src/models/auth.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Cargos do sistema: enumeração fechada, gravada como TEXT no banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Cargo {
    HeadAdmin,
    Admin,
    Corretor,
    Editor,
    #[serde(alias = "viewer")]
    Visualizar,
}

impl Cargo {
    pub fn is_admin(self) -> bool {
        matches!(self, Cargo::HeadAdmin | Cargo::Admin)
    }

    pub fn is_corretor(self) -> bool {
        self == Cargo::Corretor
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cargo::HeadAdmin => "head-admin",
            Cargo::Admin => "admin",
            Cargo::Corretor => "corretor",
            Cargo::Editor => "editor",
            Cargo::Visualizar => "visualizar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusUsuario {
    Ativo,
    Inativo,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Usuario {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Head Admin")]
    pub nome: String,
    #[schema(example = "head@concretizza.com")]
    pub email: String,
    #[schema(example = "head")]
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub senha: String,

    pub cargo: Cargo,
    pub status: StatusUsuario,
    pub telefone: Option<String>,
    pub departamento: Option<String>,
    pub ultimo_acesso: Option<NaiveDateTime>,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Maria Corretora")]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "maria@concretizza.com")]
    pub email: String,
    #[validate(length(min = 3, message = "O usuário deve ter no mínimo 3 caracteres."))]
    #[schema(example = "maria")]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    #[schema(example = "123456")]
    pub password: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "Informe o usuário."))]
    #[schema(example = "head")]
    pub username: String,
    #[validate(length(min = 1, message = "Informe a senha."))]
    #[schema(example = "123456")]
    pub password: String,
}

// Resposta de login: token + usuário (sem a senha)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub usuario: Usuario,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub id: i64,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,     // Subject (ID do usuário)
    pub cargo: Cargo, // Informativo: o cargo vigente é sempre relido do banco
    pub exp: usize,   // Expiration time
    pub iat: usize,   // Issued At
}

// --- Administração de usuários ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUsuarioPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 3, message = "O usuário deve ter no mínimo 3 caracteres."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    pub cargo: Cargo,
    pub status: Option<StatusUsuario>,
    pub telefone: Option<String>,
    pub departamento: Option<String>,
}

// Todos os campos opcionais: o que vier `None` fica como está.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUsuarioPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub nome: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(min = 3, message = "O usuário deve ter no mínimo 3 caracteres."))]
    pub username: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: Option<String>,
    pub cargo: Option<Cargo>,
    pub status: Option<StatusUsuario>,
    pub telefone: Option<String>,
    pub departamento: Option<String>,
}

// Visão resumida de um corretor, usada nos seletores de atribuição e de links
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct CorretorResumo {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cargo_serializa_em_kebab_case() {
        assert_eq!(serde_json::to_string(&Cargo::HeadAdmin).unwrap(), "\"head-admin\"");
        let viewer: Cargo = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(viewer, Cargo::Visualizar);
        assert_eq!(Cargo::HeadAdmin.as_str(), "head-admin");
    }

    #[test]
    fn senha_nunca_e_serializada() {
        let agora = chrono::Utc::now().naive_utc();
        let usuario = Usuario {
            id: 1,
            nome: "Head".into(),
            email: "head@x.com".into(),
            username: "head".into(),
            senha: "hash-secreto".into(),
            cargo: Cargo::HeadAdmin,
            status: StatusUsuario::Ativo,
            telefone: None,
            departamento: None,
            ultimo_acesso: None,
            criado_em: agora,
            atualizado_em: agora,
        };
        let json = serde_json::to_string(&usuario).unwrap();
        assert!(!json.contains("hash-secreto"));
        assert!(json.contains("\"cargo\":\"head-admin\""));
    }
}
