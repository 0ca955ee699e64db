// src/db/agendamento_repo.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    models::cliente::{Agendamento, CreateAgendamentoPayload},
};

#[derive(Clone)]
pub struct AgendamentoRepository {
    pool: SqlitePool,
}

impl AgendamentoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        cliente_id: i64,
        usuario_id: i64,
        payload: &CreateAgendamentoPayload,
    ) -> Result<Agendamento, AppError> {
        let agendamento = sqlx::query_as::<_, Agendamento>(
            r#"
            INSERT INTO agendamentos (cliente_id, usuario_id, data_hora, tipo, observacoes)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, cliente_id, usuario_id, data_hora, tipo, status, observacoes, criado_em
            "#,
        )
        .bind(cliente_id)
        .bind(usuario_id)
        .bind(payload.data_hora)
        .bind(payload.tipo.trim())
        .bind(payload.observacoes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(agendamento)
    }

    pub async fn list_by_cliente(&self, cliente_id: i64) -> Result<Vec<Agendamento>, AppError> {
        let agendamentos = sqlx::query_as::<_, Agendamento>(
            r#"
            SELECT id, cliente_id, usuario_id, data_hora, tipo, status, observacoes, criado_em
            FROM agendamentos
            WHERE cliente_id = ?
            ORDER BY data_hora ASC
            "#,
        )
        .bind(cliente_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(agendamentos)
    }
}
