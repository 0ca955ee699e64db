// src/db/auditoria_repo.rs

use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::auditoria::{LogAuditoria, LogsQuery, NovoLog},
};

const LIMITE_PADRAO: i64 = 200;

#[derive(Clone)]
pub struct AuditoriaRepository {
    pool: SqlitePool,
}

impl AuditoriaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Append-only: não existe update nem delete para logs.
    pub async fn registrar<'e, E>(&self, executor: E, log: &NovoLog<'_>) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO logs_auditoria (usuario_id, cliente_id, acao, modulo, descricao)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(log.usuario_id)
        .bind(log.cliente_id)
        .bind(log.acao)
        .bind(log.modulo)
        .bind(&log.descricao)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn listar(&self, filtro: &LogsQuery) -> Result<Vec<LogAuditoria>, AppError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT l.id, l.usuario_id, u.nome AS usuario_nome, l.cliente_id,
                   l.acao, l.modulo, l.descricao, l.criado_em
            FROM logs_auditoria l
            LEFT JOIN usuarios u ON u.id = l.usuario_id
            WHERE 1 = 1
            "#,
        );

        if let Some(modulo) = &filtro.modulo {
            qb.push(" AND l.modulo = ").push_bind(modulo.to_uppercase());
        }
        if let Some(cliente_id) = filtro.cliente_id {
            qb.push(" AND l.cliente_id = ").push_bind(cliente_id);
        }

        let limite = filtro.limite.unwrap_or(LIMITE_PADRAO).clamp(1, 1000);
        qb.push(" ORDER BY l.id DESC LIMIT ").push_bind(limite);

        let logs = qb
            .build_query_as::<LogAuditoria>()
            .fetch_all(&self.pool)
            .await?;
        Ok(logs)
    }
}
