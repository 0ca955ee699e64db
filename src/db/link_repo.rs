// src/db/link_repo.rs

use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::link::{CorretorLink, LinkAssignmentRow},
};

const COLUNAS: &str = "l.id, l.titulo, l.url, l.descricao, l.criado_por, l.criado_em, l.atualizado_em";

#[derive(Clone)]
pub struct LinkRepository {
    pool: SqlitePool,
}

impl LinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_link<'e, E>(
        &self,
        executor: E,
        titulo: &str,
        url: &str,
        descricao: Option<&str>,
        criado_por: i64,
    ) -> Result<CorretorLink, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let link = sqlx::query_as::<_, CorretorLink>(
            r#"
            INSERT INTO corretor_links (titulo, url, descricao, criado_por)
            VALUES (?, ?, ?, ?)
            RETURNING id, titulo, url, descricao, criado_por, criado_em, atualizado_em
            "#,
        )
        .bind(titulo)
        .bind(url)
        .bind(descricao)
        .bind(criado_por)
        .fetch_one(executor)
        .await?;
        Ok(link)
    }

    pub async fn update_link<'e, E>(&self, executor: E, link: &CorretorLink) -> Result<CorretorLink, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, CorretorLink>(
            r#"
            UPDATE corretor_links
            SET titulo = ?, url = ?, descricao = ?, atualizado_em = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING id, titulo, url, descricao, criado_por, criado_em, atualizado_em
            "#,
        )
        .bind(&link.titulo)
        .bind(&link.url)
        .bind(&link.descricao)
        .bind(link.id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::LinkNotFound)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CorretorLink>, AppError> {
        let link = sqlx::query_as::<_, CorretorLink>(&format!(
            "SELECT {COLUNAS} FROM corretor_links l WHERE l.id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(link)
    }

    pub async fn list_all(&self) -> Result<Vec<CorretorLink>, AppError> {
        let links = sqlx::query_as::<_, CorretorLink>(&format!(
            "SELECT {COLUNAS} FROM corretor_links l ORDER BY l.criado_em DESC, l.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    pub async fn list_do_corretor(&self, corretor_id: i64) -> Result<Vec<CorretorLink>, AppError> {
        let links = sqlx::query_as::<_, CorretorLink>(&format!(
            r#"
            SELECT {COLUNAS}
            FROM corretor_links l
            JOIN link_assignments a ON a.link_id = l.id
            WHERE a.corretor_id = ?
            ORDER BY l.criado_em DESC, l.id DESC
            "#
        ))
        .bind(corretor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    // Vínculos (com dados do corretor) de um conjunto de links
    pub async fn list_assignments(&self, link_ids: &[i64]) -> Result<Vec<LinkAssignmentRow>, AppError> {
        if link_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT a.link_id, a.corretor_id, u.nome, u.email, u.telefone
            FROM link_assignments a
            JOIN usuarios u ON u.id = a.corretor_id
            WHERE a.link_id IN (
            "#,
        );
        let mut separated = qb.separated(", ");
        for id in link_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY u.nome ASC");

        let rows = qb
            .build_query_as::<LinkAssignmentRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // Substitui todos os vínculos do link (chamado dentro de transação)
    pub async fn replace_assignments(
        &self,
        conn: &mut sqlx::SqliteConnection,
        link_id: i64,
        corretor_ids: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM link_assignments WHERE link_id = ?")
            .bind(link_id)
            .execute(&mut *conn)
            .await?;

        for corretor_id in corretor_ids {
            sqlx::query("INSERT OR IGNORE INTO link_assignments (link_id, corretor_id) VALUES (?, ?)")
                .bind(link_id)
                .bind(corretor_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    pub async fn delete_link(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM corretor_links WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::LinkNotFound);
        }
        Ok(())
    }
}
