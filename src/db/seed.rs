// src/db/seed.rs

use crate::{common::error::AppError, db::UserRepository, models::auth::Cargo};

// Contas padrão de uma instalação nova (username, nome, e-mail, cargo)
const USUARIOS_PADRAO: &[(&str, &str, &str, Cargo)] = &[
    ("head", "Head Admin", "head@concretizza.com", Cargo::HeadAdmin),
    ("admin", "Administrador", "admin@concretizza.com", Cargo::Admin),
    ("editor", "Editor", "editor@concretizza.com", Cargo::Editor),
    ("viewer", "Visualizador", "viewer@concretizza.com", Cargo::Visualizar),
];

const SENHA_PADRAO: &str = "123456";

/// Cria as contas padrão que ainda não existem. Idempotente.
pub async fn seed_usuarios_padrao(user_repo: &UserRepository, bcrypt_cost: u32) -> Result<usize, AppError> {
    let mut criados = 0;

    for (username, nome, email, cargo) in USUARIOS_PADRAO {
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(SENHA_PADRAO, bcrypt_cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        if user_repo.insert_or_ignore(nome, email, username, &hash, *cargo).await? {
            tracing::info!("✓ Usuário {} criado", username);
            criados += 1;
        }
    }

    Ok(criados)
}
