// src/db/user_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::common::db_utils::mapear_violacao_unica;
use crate::common::error::AppError;
use crate::models::auth::{Cargo, CorretorResumo, StatusUsuario, Usuario};

const COLUNAS: &str = "id, nome, email, username, senha, cargo, status, telefone, departamento, \
                       ultimo_acesso, criado_em, atualizado_em";

// O repositório de usuários, responsável por todas as interações com a tabela 'usuarios'
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {COLUNAS} FROM usuarios WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(usuario)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Usuario>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let usuario = sqlx::query_as::<_, Usuario>(&format!("SELECT {COLUNAS} FROM usuarios WHERE id = ?"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(usuario)
    }

    pub async fn list_all(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>(&format!("SELECT {COLUNAS} FROM usuarios ORDER BY nome ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(usuarios)
    }

    pub async fn list_corretores_ativos(&self) -> Result<Vec<CorretorResumo>, AppError> {
        let corretores = sqlx::query_as::<_, CorretorResumo>(
            r#"
            SELECT id, nome, email, telefone
            FROM usuarios
            WHERE cargo = 'corretor' AND status = 'ativo'
            ORDER BY nome ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(corretores)
    }

    // Cria um novo usuário no banco de dados.
    // E-mail/username duplicados viram erros específicos.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        nome: &str,
        email: &str,
        username: &str,
        senha_hash: &str,
        cargo: Cargo,
        status: StatusUsuario,
        telefone: Option<&str>,
        departamento: Option<&str>,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Usuario>(&format!(
            r#"
            INSERT INTO usuarios (nome, email, username, senha, cargo, status, telefone, departamento)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUNAS}
            "#
        ))
        .bind(nome)
        .bind(email)
        .bind(username)
        .bind(senha_hash)
        .bind(cargo)
        .bind(status)
        .bind(telefone)
        .bind(departamento)
        .fetch_one(executor)
        .await
        .map_err(mapear_violacao_unica)
    }

    // Seed: não sobrescreve contas existentes
    pub async fn insert_or_ignore(
        &self,
        nome: &str,
        email: &str,
        username: &str,
        senha_hash: &str,
        cargo: Cargo,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO usuarios (nome, email, username, senha, cargo, status)
            VALUES (?, ?, ?, ?, ?, 'ativo')
            "#,
        )
        .bind(nome)
        .bind(email)
        .bind(username)
        .bind(senha_hash)
        .bind(cargo)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // Grava o estado completo do usuário (o serviço já fez o merge do patch)
    pub async fn update_user(&self, usuario: &Usuario) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(&format!(
            r#"
            UPDATE usuarios
            SET nome = ?, email = ?, username = ?, senha = ?, cargo = ?, status = ?,
                telefone = ?, departamento = ?, atualizado_em = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING {COLUNAS}
            "#
        ))
        .bind(&usuario.nome)
        .bind(&usuario.email)
        .bind(&usuario.username)
        .bind(&usuario.senha)
        .bind(usuario.cargo)
        .bind(usuario.status)
        .bind(&usuario.telefone)
        .bind(&usuario.departamento)
        .bind(usuario.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(mapear_violacao_unica)?
        .ok_or(AppError::UserNotFound)
    }

    pub async fn touch_ultimo_acesso(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE usuarios SET ultimo_acesso = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}
