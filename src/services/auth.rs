// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{AuditoriaRepository, UserRepository},
    models::{
        auditoria::{acao, modulo, NovoLog},
        auth::{AuthResponse, Cargo, Claims, RegisterUserPayload, StatusUsuario, Usuario},
    },
};

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    user_repo: UserRepository,
    auditoria: AuditoriaRepository,
    jwt_secret: String,
    expiracao_horas: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        pool: SqlitePool,
        user_repo: UserRepository,
        auditoria: AuditoriaRepository,
        jwt_secret: String,
        expiracao_horas: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            pool,
            user_repo,
            auditoria,
            jwt_secret,
            expiracao_horas,
            bcrypt_cost,
        }
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    // Hashing fora do runtime async: bcrypt é CPU-bound
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    /// Auto-cadastro: a conta nasce como corretor ativo.
    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<Usuario, AppError> {
        let hashed_password = self.hash_password(&payload.password).await?;

        let usuario = self
            .user_repo
            .create_user(
                &self.pool,
                payload.nome.trim(),
                payload.email.trim(),
                payload.username.trim(),
                &hashed_password,
                Cargo::Corretor,
                StatusUsuario::Ativo,
                None,
                None,
            )
            .await?;

        tracing::info!("👤 Novo usuário registrado: {} (id {})", usuario.username, usuario.id);
        Ok(usuario)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let usuario = self
            .user_repo
            .find_by_username(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = usuario.senha.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        // Conta inativa responde igual a senha errada
        if !is_password_valid || usuario.status != StatusUsuario::Ativo {
            tracing::warn!("Tentativa de login recusada para '{}'", username);
            return Err(AppError::InvalidCredentials);
        }

        self.user_repo.touch_ultimo_acesso(usuario.id).await?;
        self.auditoria
            .registrar(
                &self.pool,
                &NovoLog {
                    usuario_id: Some(usuario.id),
                    cliente_id: None,
                    acao: acao::LOGIN,
                    modulo: modulo::AUTH,
                    descricao: format!("Usuário \"{}\" entrou no sistema", usuario.username),
                },
            )
            .await?;

        let token = self.create_token(&usuario)?;
        Ok(AuthResponse { token, usuario })
    }

    /// Decodifica o token e relê o usuário: cargo e status valem o que está no banco agora.
    pub async fn validate_token(&self, token: &str) -> Result<Usuario, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let usuario = self
            .user_repo
            .find_by_id(&self.pool, token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if usuario.status != StatusUsuario::Ativo {
            return Err(AppError::InvalidToken);
        }
        Ok(usuario)
    }

    pub fn create_token(&self, usuario: &Usuario) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.expiracao_horas);

        let claims = Claims {
            sub: usuario.id,
            cargo: usuario.cargo,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
