// src/db/evento_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::historico::{EventoCliente, NovoEvento, TipoEvento},
};

// Tabela `cliente_eventos`: histórico estruturado de cada cliente
#[derive(Clone)]
pub struct EventoRepository {
    pool: SqlitePool,
}

impl EventoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn append<'e, E>(
        &self,
        executor: E,
        cliente_id: i64,
        evento: &NovoEvento,
        ator_id: Option<i64>,
        ator_nome: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO cliente_eventos (cliente_id, tipo, valor_anterior, valor_novo, ator_id, ator_nome)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(cliente_id)
        .bind(evento.tipo)
        .bind(evento.valor_anterior.as_deref())
        .bind(evento.valor_novo.as_deref())
        .bind(ator_id)
        .bind(ator_nome)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Eventos do cliente em ordem de gravação
    pub async fn list_by_cliente(
        &self,
        cliente_id: i64,
        tipos: &[TipoEvento],
    ) -> Result<Vec<EventoCliente>, AppError> {
        let eventos = sqlx::query_as::<_, EventoCliente>(
            r#"
            SELECT sequencia, cliente_id, tipo, valor_anterior, valor_novo, ator_id, ator_nome, criado_em
            FROM cliente_eventos
            WHERE cliente_id = ?
            ORDER BY sequencia ASC
            "#,
        )
        .bind(cliente_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(eventos
            .into_iter()
            .filter(|e| tipos.is_empty() || tipos.contains(&e.tipo))
            .collect())
    }
}
