// src/common/db_utils.rs

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::common::error::AppError;

/// Abre a pool SQLite. Uma única conexão: todas as chamadas ao banco são serializadas.
pub async fn conectar(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
}

/// Aplica as migrações de `migrations/` (idempotentes).
pub async fn executar_migracoes(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// Pool em memória já migrada. Usada pelos testes.
pub async fn pool_em_memoria() -> anyhow::Result<SqlitePool> {
    let pool = conectar("sqlite::memory:").await?;
    executar_migracoes(&pool).await?;
    Ok(pool)
}

/// Converte violação de UNIQUE do SQLite num erro amigável.
/// O SQLite não expõe o nome da constraint, só a mensagem ("UNIQUE constraint failed: tabela.coluna").
pub fn mapear_violacao_unica(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let msg = db_err.message();
            if msg.contains("usuarios.email") {
                return AppError::EmailAlreadyExists;
            }
            if msg.contains("usuarios.username") {
                return AppError::UsernameAlreadyExists;
            }
            return AppError::UniqueConstraintViolation("Registro duplicado.".into());
        }
    }
    e.into()
}
