// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::Cargo,
        permissao::{pode, Acao, Recurso},
    },
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
    fn permitido(cargo: Cargo) -> bool;
}

/// 2. O Extractor (Guardião). Roda depois do `auth_guard`.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let locale = match Locale::from_request_parts(parts, state).await {
            Ok(locale) => locale,
            Err(never) => match never {},
        };

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale))?;

        if !T::permitido(user.0.cargo) {
            tracing::warn!(
                "{} ({}) sem a permissão '{}'",
                user.0.username,
                user.0.cargo.as_str(),
                T::slug()
            );
            return Err(AppError::PermissionDenied.to_api_error(&locale));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermUsuariosGerenciar;
impl PermissionDef for PermUsuariosGerenciar {
    fn slug() -> &'static str {
        "usuarios:gerenciar"
    }
    fn permitido(cargo: Cargo) -> bool {
        cargo.is_admin() && pode(cargo, Recurso::Usuarios, Acao::Ler)
    }
}

pub struct PermLogsLer;
impl PermissionDef for PermLogsLer {
    fn slug() -> &'static str {
        "logs:ler"
    }
    fn permitido(cargo: Cargo) -> bool {
        pode(cargo, Recurso::Logs, Acao::Ler)
    }
}

pub struct PermClientesAtribuir;
impl PermissionDef for PermClientesAtribuir {
    fn slug() -> &'static str {
        "clientes:atribuir"
    }
    fn permitido(cargo: Cargo) -> bool {
        cargo.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apenas_admins_gerenciam_usuarios() {
        assert!(PermUsuariosGerenciar::permitido(Cargo::HeadAdmin));
        assert!(PermUsuariosGerenciar::permitido(Cargo::Admin));
        assert!(!PermUsuariosGerenciar::permitido(Cargo::Corretor));
        assert!(!PermLogsLer::permitido(Cargo::Editor));
        assert!(!PermClientesAtribuir::permitido(Cargo::Visualizar));
    }
}
