// src/config.rs

use anyhow::Context;
use sqlx::SqlitePool;
use std::env;

use crate::{
    common::db_utils,
    db::{
        AgendamentoRepository, AuditoriaRepository, CaptacaoRepository, ClienteRepository, EventoRepository,
        LinkRepository, UserRepository,
    },
    services::{
        auditoria_service::AuditoriaService, auth::AuthService, captacao_service::CaptacaoService,
        cliente_service::ClienteService, historico_service::HistoricoService, link_service::LinkService,
        usuario_service::UsuarioService,
    },
};

const DATABASE_URL_PADRAO: &str = "sqlite://concretizza.db?mode=rwc";

// Configuração lida do ambiente (.env incluso)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub seed_usuarios: bool,
    pub jwt_expiracao_horas: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| DATABASE_URL_PADRAO.to_string());
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let port = match env::var("PORT") {
            Ok(valor) => valor.parse().context("PORT inválida")?,
            Err(_) => 3000,
        };
        let seed_usuarios = env::var("SEED_USUARIOS")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "nao" | "não"))
            .unwrap_or(true);
        let jwt_expiracao_horas = match env::var("JWT_EXPIRACAO_HORAS") {
            Ok(valor) => valor.parse().context("JWT_EXPIRACAO_HORAS inválida")?,
            Err(_) => 24,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            seed_usuarios,
            jwt_expiracao_horas,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub auth_service: AuthService,
    pub usuario_service: UsuarioService,
    pub cliente_service: ClienteService,
    pub historico_service: HistoricoService,
    pub link_service: LinkService,
    pub captacao_service: CaptacaoService,
    pub auditoria_service: AuditoriaService,
}

impl AppState {
    /// Conecta ao banco, roda as migrações e monta o estado.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = db_utils::conectar(&config.database_url)
            .await
            .with_context(|| format!("Falha ao conectar em {}", config.database_url))?;
        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        db_utils::executar_migracoes(&db_pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        let preenchidos = ClienteRepository::new(db_pool.clone())
            .preencher_telefone_digitos()
            .await
            .context("Falha ao normalizar telefones de clientes antigos")?;
        if preenchidos > 0 {
            tracing::info!("☎️ Telefone normalizado em {} cliente(s) antigo(s)", preenchidos);
        }

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: SqlitePool, config: &Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let evento_repo = EventoRepository::new(db_pool.clone());
        let auditoria_repo = AuditoriaRepository::new(db_pool.clone());
        let agendamento_repo = AgendamentoRepository::new(db_pool.clone());
        let link_repo = LinkRepository::new(db_pool.clone());
        let captacao_repo = CaptacaoRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            db_pool.clone(),
            user_repo.clone(),
            auditoria_repo.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiracao_horas,
            config.bcrypt_cost,
        );
        let usuario_service = UsuarioService::new(
            db_pool.clone(),
            user_repo.clone(),
            auditoria_repo.clone(),
            auth_service.clone(),
        );
        let cliente_service = ClienteService::new(
            db_pool.clone(),
            cliente_repo,
            evento_repo.clone(),
            auditoria_repo.clone(),
            user_repo.clone(),
            agendamento_repo,
        );
        let historico_service = HistoricoService::new(cliente_service.clone(), evento_repo);
        let link_service = LinkService::new(db_pool.clone(), link_repo, user_repo, auditoria_repo.clone());
        let captacao_service = CaptacaoService::new(db_pool.clone(), captacao_repo, auditoria_repo.clone());
        let auditoria_service = AuditoriaService::new(auditoria_repo);

        Self {
            db_pool,
            auth_service,
            usuario_service,
            cliente_service,
            historico_service,
            link_service,
            captacao_service,
            auditoria_service,
        }
    }
}
