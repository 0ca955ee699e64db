// src/db/cliente_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::cliente::{normalizar_telefone, Cliente, CreateClientePayload},
};

const COLUNAS: &str = "id, nome, telefone, email, interesse, valor, status, observacoes, \
                       data_atribuicao, usuario_id, atribuido_a, atribuido_a_nome, \
                       primeiro_contato, ultimo_contato, criado_em, atualizado_em";


// Grupo de clientes com o mesmo nome (ignorando caixa)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GrupoNome {
    pub nome: String,
    pub quantidade: i64,
}

#[derive(Clone)]
pub struct ClienteRepository {
    pool: SqlitePool,
}

impl ClienteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Cliente>, AppError> {
        let clientes = sqlx::query_as::<_, Cliente>(&format!(
            "SELECT {COLUNAS} FROM clientes ORDER BY criado_em DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(clientes)
    }

    /// Clientes que o corretor cadastrou ou que estão atribuídos a ele
    pub async fn list_do_corretor(&self, corretor_id: i64) -> Result<Vec<Cliente>, AppError> {
        let clientes = sqlx::query_as::<_, Cliente>(&format!(
            r#"
            SELECT {COLUNAS} FROM clientes
            WHERE usuario_id = ? OR atribuido_a = ?
            ORDER BY criado_em DESC, id DESC
            "#
        ))
        .bind(corretor_id)
        .bind(corretor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(clientes)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(&format!("SELECT {COLUNAS} FROM clientes WHERE id = ?"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(cliente)
    }

    /// `digitos` deve vir normalizado (apenas dígitos).
    pub async fn find_by_telefone<'e, E>(&self, executor: E, digitos: &str) -> Result<Vec<Cliente>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let clientes = sqlx::query_as::<_, Cliente>(&format!(
            "SELECT {COLUNAS} FROM clientes WHERE telefone_digitos = ? ORDER BY criado_em ASC, id ASC"
        ))
        .bind(digitos)
        .fetch_all(executor)
        .await?;
        Ok(clientes)
    }

    pub async fn create_cliente<'e, E>(
        &self,
        executor: E,
        payload: &CreateClientePayload,
        usuario_id: i64,
    ) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(&format!(
            r#"
            INSERT INTO clientes (
                nome, telefone, telefone_digitos, email, interesse, valor, status, observacoes,
                primeiro_contato, ultimo_contato, usuario_id
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUNAS}
            "#
        ))
        .bind(payload.nome.trim())
        .bind(payload.telefone.trim())
        .bind(normalizar_telefone(&payload.telefone))
        .bind(payload.email.as_deref().filter(|e| !e.trim().is_empty()))
        .bind(payload.interesse)
        .bind(payload.valor)
        .bind(payload.status)
        .bind(payload.observacoes.as_deref())
        .bind(payload.primeiro_contato)
        .bind(payload.ultimo_contato)
        .bind(usuario_id)
        .fetch_one(executor)
        .await?;
        Ok(cliente)
    }

    // Grava o estado completo (status + atribuição na mesma escrita)
    pub async fn update_cliente<'e, E>(&self, executor: E, cliente: &Cliente) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Cliente>(&format!(
            r#"
            UPDATE clientes
            SET nome = ?, telefone = ?, telefone_digitos = ?, email = ?, interesse = ?, valor = ?, status = ?,
                observacoes = ?, data_atribuicao = ?, atribuido_a = ?, atribuido_a_nome = ?,
                primeiro_contato = ?, ultimo_contato = ?, atualizado_em = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING {COLUNAS}
            "#
        ))
        .bind(&cliente.nome)
        .bind(&cliente.telefone)
        .bind(normalizar_telefone(&cliente.telefone))
        .bind(&cliente.email)
        .bind(cliente.interesse)
        .bind(cliente.valor)
        .bind(cliente.status)
        .bind(&cliente.observacoes)
        .bind(cliente.data_atribuicao)
        .bind(cliente.atribuido_a)
        .bind(&cliente.atribuido_a_nome)
        .bind(cliente.primeiro_contato)
        .bind(cliente.ultimo_contato)
        .bind(cliente.id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ClientNotFound)
    }

    /// Preenche `telefone_digitos` das linhas gravadas antes da coluna existir. Devolve quantas mudaram.
    pub async fn preencher_telefone_digitos(&self) -> Result<u64, AppError> {
        let pendentes: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, telefone FROM clientes WHERE telefone_digitos IS NULL")
                .fetch_all(&self.pool)
                .await?;

        let mut tx = self.pool.begin().await?;
        for (id, telefone) in &pendentes {
            sqlx::query("UPDATE clientes SET telefone_digitos = ? WHERE id = ?")
                .bind(normalizar_telefone(telefone))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(pendentes.len() as u64)
    }

    pub async fn delete_cliente<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM clientes WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ClientNotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  MANUTENÇÃO (mesclagem de duplicados)
    // =========================================================================

    pub async fn list_grupos_por_nome(&self) -> Result<Vec<GrupoNome>, AppError> {
        let grupos = sqlx::query_as::<_, GrupoNome>(
            r#"
            SELECT MIN(nome) AS nome, COUNT(*) AS quantidade
            FROM clientes
            GROUP BY LOWER(nome)
            HAVING COUNT(*) > 1
            ORDER BY quantidade DESC, nome ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(grupos)
    }

    pub async fn list_por_nome(&self, nome: &str) -> Result<Vec<Cliente>, AppError> {
        let clientes = sqlx::query_as::<_, Cliente>(&format!(
            "SELECT {COLUNAS} FROM clientes WHERE LOWER(nome) = LOWER(?) ORDER BY criado_em ASC, id ASC"
        ))
        .bind(nome)
        .fetch_all(&self.pool)
        .await?;
        Ok(clientes)
    }

    /// Aponta `tabela.coluna` de `de` para `para`. `tabela`/`coluna` vêm de lista fixa, nunca do usuário.
    pub async fn repontar_referencia<'e, E>(
        &self,
        executor: E,
        tabela: &str,
        coluna: &str,
        de: i64,
        para: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(&format!("UPDATE {tabela} SET {coluna} = ? WHERE {coluna} = ?"))
            .bind(para)
            .bind(de)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
