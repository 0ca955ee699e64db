// src/db/captacao_repo.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    models::captacao::{Captacao, CreateCaptacaoPayload},
};

const COLUNAS: &str = "id, titulo, regiao, valor_estimado, prioridade, objetivo, observacoes, \
                       usuario_id, criado_em, atualizado_em";

#[derive(Clone)]
pub struct CaptacaoRepository {
    pool: SqlitePool,
}

impl CaptacaoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // A ordenação por prioridade é feita no serviço
    pub async fn list_all(&self) -> Result<Vec<Captacao>, AppError> {
        let captacoes = sqlx::query_as::<_, Captacao>(&format!(
            "SELECT {COLUNAS} FROM captacoes ORDER BY criado_em DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(captacoes)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Captacao>, AppError> {
        let captacao = sqlx::query_as::<_, Captacao>(&format!("SELECT {COLUNAS} FROM captacoes WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(captacao)
    }

    pub async fn create(&self, payload: &CreateCaptacaoPayload, usuario_id: i64) -> Result<Captacao, AppError> {
        let captacao = sqlx::query_as::<_, Captacao>(&format!(
            r#"
            INSERT INTO captacoes (titulo, regiao, valor_estimado, prioridade, objetivo, observacoes, usuario_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUNAS}
            "#
        ))
        .bind(payload.titulo.trim())
        .bind(payload.regiao.trim())
        .bind(payload.valor_estimado)
        .bind(payload.prioridade)
        .bind(payload.objetivo.as_deref())
        .bind(payload.observacoes.as_deref())
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(captacao)
    }

    pub async fn update(&self, captacao: &Captacao) -> Result<Captacao, AppError> {
        sqlx::query_as::<_, Captacao>(&format!(
            r#"
            UPDATE captacoes
            SET titulo = ?, regiao = ?, valor_estimado = ?, prioridade = ?, objetivo = ?,
                observacoes = ?, atualizado_em = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING {COLUNAS}
            "#
        ))
        .bind(&captacao.titulo)
        .bind(&captacao.regiao)
        .bind(captacao.valor_estimado)
        .bind(captacao.prioridade)
        .bind(&captacao.objetivo)
        .bind(&captacao.observacoes)
        .bind(captacao.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CaptacaoNotFound)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM captacoes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::CaptacaoNotFound);
        }
        Ok(())
    }
}
