// src/services/auditoria_service.rs

use crate::{
    common::error::AppError,
    db::AuditoriaRepository,
    models::{
        auditoria::{LogAuditoria, LogsQuery},
        auth::Usuario,
        permissao::{pode, Acao, Recurso},
    },
};

#[derive(Clone)]
pub struct AuditoriaService {
    repo: AuditoriaRepository,
}

impl AuditoriaService {
    pub fn new(repo: AuditoriaRepository) -> Self {
        Self { repo }
    }

    pub async fn listar(&self, filtro: &LogsQuery, ator: &Usuario) -> Result<Vec<LogAuditoria>, AppError> {
        if !pode(ator.cargo, Recurso::Logs, Acao::Ler) {
            return Err(AppError::PermissionDenied);
        }
        self.repo.listar(filtro).await
    }
}
