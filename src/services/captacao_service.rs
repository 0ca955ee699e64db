// src/services/captacao_service.rs

use crate::{
    common::error::AppError,
    db::{AuditoriaRepository, CaptacaoRepository},
    models::{
        auditoria::{acao, modulo, NovoLog},
        auth::Usuario,
        captacao::{Captacao, CreateCaptacaoPayload, UpdateCaptacaoPayload},
        permissao::{pode, Acao, Recurso},
    },
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct CaptacaoService {
    pool: SqlitePool,
    repo: CaptacaoRepository,
    auditoria: AuditoriaRepository,
}

fn exigir(ator: &Usuario, acao: Acao) -> Result<(), AppError> {
    if pode(ator.cargo, Recurso::Captacoes, acao) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

/// Prioridade mais alta primeiro. A ordenação é estável: dentro da mesma prioridade
/// vale a ordem que veio do banco (mais recentes primeiro).
pub fn ordenar_por_prioridade(captacoes: &mut [Captacao]) {
    captacoes.sort_by(|a, b| b.prioridade.peso().cmp(&a.prioridade.peso()));
}

impl CaptacaoService {
    pub fn new(pool: SqlitePool, repo: CaptacaoRepository, auditoria: AuditoriaRepository) -> Self {
        Self { pool, repo, auditoria }
    }

    async fn registrar(&self, ator: &Usuario, log_acao: &str, descricao: String) -> Result<(), AppError> {
        self.auditoria
            .registrar(
                &self.pool,
                &NovoLog {
                    usuario_id: Some(ator.id),
                    cliente_id: None,
                    acao: log_acao,
                    modulo: modulo::CAPTACOES,
                    descricao,
                },
            )
            .await
    }

    pub async fn listar(&self, ator: &Usuario) -> Result<Vec<Captacao>, AppError> {
        exigir(ator, Acao::Ler)?;
        let mut captacoes = self.repo.list_all().await?;
        ordenar_por_prioridade(&mut captacoes);
        Ok(captacoes)
    }

    pub async fn criar(&self, payload: &CreateCaptacaoPayload, ator: &Usuario) -> Result<Captacao, AppError> {
        exigir(ator, Acao::Criar)?;
        let captacao = self.repo.create(payload, ator.id).await?;
        self.registrar(ator, acao::CRIAR, format!("Captação \"{}\" criada", captacao.titulo))
            .await?;
        Ok(captacao)
    }

    pub async fn atualizar(
        &self,
        id: i64,
        patch: &UpdateCaptacaoPayload,
        ator: &Usuario,
    ) -> Result<Captacao, AppError> {
        exigir(ator, Acao::Atualizar)?;
        let mut captacao = self.repo.find_by_id(id).await?.ok_or(AppError::CaptacaoNotFound)?;

        if let Some(titulo) = &patch.titulo {
            captacao.titulo = titulo.trim().to_string();
        }
        if let Some(regiao) = &patch.regiao {
            captacao.regiao = regiao.trim().to_string();
        }
        if let Some(valor) = patch.valor_estimado {
            captacao.valor_estimado = Some(valor);
        }
        if let Some(prioridade) = patch.prioridade {
            captacao.prioridade = prioridade;
        }
        if let Some(objetivo) = &patch.objetivo {
            captacao.objetivo = Some(objetivo.clone());
        }
        if let Some(observacoes) = &patch.observacoes {
            captacao.observacoes = Some(observacoes.clone());
        }

        let captacao = self.repo.update(&captacao).await?;
        self.registrar(ator, acao::EDITAR, format!("Captação \"{}\" atualizada", captacao.titulo))
            .await?;
        Ok(captacao)
    }

    pub async fn deletar(&self, id: i64, ator: &Usuario) -> Result<(), AppError> {
        exigir(ator, Acao::Deletar)?;
        let captacao = self.repo.find_by_id(id).await?.ok_or(AppError::CaptacaoNotFound)?;
        self.repo.delete(id).await?;
        self.registrar(ator, acao::DELETAR, format!("Captação \"{}\" excluída", captacao.titulo))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::captacao::Prioridade;

    fn captacao(id: i64, prioridade: Prioridade) -> Captacao {
        let agora = chrono::Utc::now().naive_utc();
        Captacao {
            id,
            titulo: format!("Captação {}", id),
            regiao: "Centro".into(),
            valor_estimado: None,
            prioridade,
            objetivo: None,
            observacoes: None,
            usuario_id: Some(1),
            criado_em: agora,
            atualizado_em: agora,
        }
    }

    #[test]
    fn imediata_antes_de_alta_antes_de_media() {
        let mut lista = vec![
            captacao(1, Prioridade::Media),
            captacao(2, Prioridade::Imediata),
            captacao(3, Prioridade::Alta),
            captacao(4, Prioridade::Imediata),
        ];
        ordenar_por_prioridade(&mut lista);
        let ids: Vec<i64> = lista.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }
}
