//src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concretizza::{
    config::{AppState, Config},
    criar_router,
    db::{seed::seed_usuarios_padrao, UserRepository},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "concretizza=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    if config.seed_usuarios {
        let user_repo = UserRepository::new(app_state.db_pool.clone());
        let criados = seed_usuarios_padrao(&user_repo, config.bcrypt_cost).await?;
        tracing::info!("✅ Seed concluído ({} usuário(s) novo(s))", criados);
    }

    let app = criar_router(app_state);

    // Inicia o servidor
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://localhost:{}/swagger-ui", config.port);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}
