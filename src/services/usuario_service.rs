// src/services/usuario_service.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{AuditoriaRepository, UserRepository},
    models::{
        auditoria::{acao, modulo, NovoLog},
        auth::{Cargo, CorretorResumo, CreateUsuarioPayload, StatusUsuario, UpdateUsuarioPayload, Usuario},
        permissao::{pode, Acao, Recurso},
    },
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct UsuarioService {
    pool: SqlitePool,
    repo: UserRepository,
    auditoria: AuditoriaRepository,
    auth: AuthService,
}

fn gerencia_admins(ator: &Usuario) -> bool {
    pode(ator.cargo, Recurso::Usuarios, Acao::GerenciarAdmins)
}

// Administração de contas é exclusiva dos cargos admin/head-admin.
fn exigir_admin(ator: &Usuario, acao: Acao) -> Result<(), AppError> {
    if ator.cargo.is_admin() && pode(ator.cargo, Recurso::Usuarios, acao) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

/// Admin comum não toca contas de admin/head-admin nem concede esses cargos.
pub fn validar_hierarquia(ator: &Usuario, alvo: Option<Cargo>, novo_cargo: Option<Cargo>) -> Result<(), AppError> {
    if gerencia_admins(ator) {
        return Ok(());
    }
    let envolve_admin = alvo.is_some_and(Cargo::is_admin) || novo_cargo.is_some_and(Cargo::is_admin);
    if envolve_admin {
        tracing::warn!("{} ({}) tentou gerenciar uma conta de administrador", ator.username, ator.cargo.as_str());
        return Err(AppError::RoleHierarchyViolation);
    }
    Ok(())
}

impl UsuarioService {
    pub fn new(pool: SqlitePool, repo: UserRepository, auditoria: AuditoriaRepository, auth: AuthService) -> Self {
        Self {
            pool,
            repo,
            auditoria,
            auth,
        }
    }

    async fn registrar(&self, ator: &Usuario, log_acao: &str, descricao: String) -> Result<(), AppError> {
        self.auditoria
            .registrar(
                &self.pool,
                &NovoLog {
                    usuario_id: Some(ator.id),
                    cliente_id: None,
                    acao: log_acao,
                    modulo: modulo::USUARIOS,
                    descricao,
                },
            )
            .await
    }

    pub async fn listar(&self, ator: &Usuario) -> Result<Vec<Usuario>, AppError> {
        exigir_admin(ator, Acao::Ler)?;
        self.repo.list_all().await
    }

    /// Corretores ativos, para seletores de atribuição e de links.
    pub async fn listar_corretores(&self, ator: &Usuario) -> Result<Vec<CorretorResumo>, AppError> {
        if !pode(ator.cargo, Recurso::Usuarios, Acao::Ler) {
            return Err(AppError::PermissionDenied);
        }
        self.repo.list_corretores_ativos().await
    }

    pub async fn obter(&self, id: i64, ator: &Usuario) -> Result<Usuario, AppError> {
        exigir_admin(ator, Acao::Ler)?;
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn criar(&self, payload: &CreateUsuarioPayload, ator: &Usuario) -> Result<Usuario, AppError> {
        exigir_admin(ator, Acao::Criar)?;
        validar_hierarquia(ator, None, Some(payload.cargo))?;

        let senha_hash = self.auth.hash_password(&payload.password).await?;
        let usuario = self
            .repo
            .create_user(
                &self.pool,
                payload.nome.trim(),
                payload.email.trim(),
                payload.username.trim(),
                &senha_hash,
                payload.cargo,
                payload.status.unwrap_or(StatusUsuario::Ativo),
                payload.telefone.as_deref(),
                payload.departamento.as_deref(),
            )
            .await?;

        self.registrar(
            ator,
            acao::CRIAR,
            format!("Usuário \"{}\" criado com cargo {}", usuario.username, usuario.cargo.as_str()),
        )
        .await?;

        tracing::info!("👤 Usuário {} criado por {}", usuario.username, ator.username);
        Ok(usuario)
    }

    pub async fn atualizar(&self, id: i64, patch: &UpdateUsuarioPayload, ator: &Usuario) -> Result<Usuario, AppError> {
        exigir_admin(ator, Acao::Atualizar)?;

        let mut usuario = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if id == ator.id {
            // O próprio cadastro pode ser editado, mas sem mexer no cargo ou no status
            let muda_cargo = patch.cargo.is_some_and(|c| c != usuario.cargo);
            let muda_status = patch.status.is_some_and(|s| s != usuario.status);
            if muda_cargo || muda_status {
                return Err(AppError::PermissionDenied);
            }
        } else {
            validar_hierarquia(ator, Some(usuario.cargo), patch.cargo)?;
        }

        if let Some(nome) = &patch.nome {
            usuario.nome = nome.trim().to_string();
        }
        if let Some(email) = &patch.email {
            usuario.email = email.trim().to_string();
        }
        if let Some(username) = &patch.username {
            usuario.username = username.trim().to_string();
        }
        if let Some(password) = &patch.password {
            usuario.senha = self.auth.hash_password(password).await?;
        }
        if let Some(cargo) = patch.cargo {
            usuario.cargo = cargo;
        }
        if let Some(status) = patch.status {
            usuario.status = status;
        }
        if let Some(telefone) = &patch.telefone {
            usuario.telefone = Some(telefone.clone()).filter(|t| !t.trim().is_empty());
        }
        if let Some(departamento) = &patch.departamento {
            usuario.departamento = Some(departamento.clone()).filter(|d| !d.trim().is_empty());
        }

        let usuario = self.repo.update_user(&usuario).await?;
        self.registrar(ator, acao::EDITAR, format!("Usuário \"{}\" atualizado", usuario.username))
            .await?;
        Ok(usuario)
    }

    pub async fn deletar(&self, id: i64, ator: &Usuario) -> Result<(), AppError> {
        exigir_admin(ator, Acao::Deletar)?;

        if id == ator.id {
            return Err(AppError::SelfDeletion);
        }

        let usuario = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        validar_hierarquia(ator, Some(usuario.cargo), None)?;

        self.repo.delete_user(id).await?;
        self.registrar(ator, acao::DELETAR, format!("Usuário \"{}\" excluído", usuario.username))
            .await?;

        tracing::info!("Usuário {} excluído por {}", usuario.username, ator.username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ator(cargo: Cargo) -> Usuario {
        let agora = chrono::Utc::now().naive_utc();
        Usuario {
            id: 1,
            nome: "Ator".into(),
            email: "ator@x.com".into(),
            username: "ator".into(),
            senha: String::new(),
            cargo,
            status: StatusUsuario::Ativo,
            telefone: None,
            departamento: None,
            ultimo_acesso: None,
            criado_em: agora,
            atualizado_em: agora,
        }
    }

    #[test]
    fn admin_nao_concede_cargos_administrativos() {
        let admin = ator(Cargo::Admin);
        assert!(matches!(
            validar_hierarquia(&admin, None, Some(Cargo::HeadAdmin)),
            Err(AppError::RoleHierarchyViolation)
        ));
        assert!(matches!(
            validar_hierarquia(&admin, Some(Cargo::Admin), Some(Cargo::Corretor)),
            Err(AppError::RoleHierarchyViolation)
        ));
        assert!(validar_hierarquia(&admin, Some(Cargo::Corretor), Some(Cargo::Editor)).is_ok());
    }

    #[test]
    fn head_admin_gerencia_qualquer_cargo() {
        let head = ator(Cargo::HeadAdmin);
        assert!(validar_hierarquia(&head, Some(Cargo::Admin), Some(Cargo::HeadAdmin)).is_ok());
    }
}
