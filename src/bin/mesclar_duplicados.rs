//! Mesclagem offline de clientes duplicados (mesmo nome, ignorando caixa).
//!
//! Por padrão só lista os grupos encontrados; com `--aplicar` mantém o cadastro mais antigo
//! de cada grupo e exclui os demais, repassando agendamentos, logs e eventos.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concretizza::{
    common::db_utils,
    db::{AgendamentoRepository, AuditoriaRepository, ClienteRepository, EventoRepository, UserRepository},
    services::cliente_service::ClienteService,
};

#[derive(Parser)]
#[command(name = "mesclar_duplicados")]
#[command(about = "Mescla clientes cadastrados mais de uma vez com o mesmo nome")]
struct Cli {
    /// URL do banco (padrão: variável DATABASE_URL)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://concretizza.db?mode=rwc")]
    database_url: String,

    /// Executa a mesclagem. Sem esta flag nada é alterado.
    #[arg(long)]
    aplicar: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "concretizza=info,mesclar_duplicados=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let cli = Cli::parse();

    let pool = db_utils::conectar(&cli.database_url).await?;
    db_utils::executar_migracoes(&pool).await?;
    ClienteRepository::new(pool.clone()).preencher_telefone_digitos().await?;

    let service = ClienteService::new(
        pool.clone(),
        ClienteRepository::new(pool.clone()),
        EventoRepository::new(pool.clone()),
        AuditoriaRepository::new(pool.clone()),
        UserRepository::new(pool.clone()),
        AgendamentoRepository::new(pool.clone()),
    );

    let grupos = service.listar_grupos_duplicados().await?;
    if grupos.is_empty() {
        println!("Nenhum cliente duplicado encontrado.");
        return Ok(());
    }

    println!("{} grupo(s) de clientes duplicados:", grupos.len());
    for grupo in &grupos {
        println!("  - \"{}\": {} cadastros", grupo.nome, grupo.quantidade);
    }

    if !cli.aplicar {
        println!("\nNada foi alterado. Rode novamente com --aplicar para mesclar.");
        return Ok(());
    }

    let resultados = service.mesclar_todos(None).await?;
    let removidos: usize = resultados.iter().map(|r| r.removidos.len()).sum();
    for r in &resultados {
        println!(
            "✓ \"{}\": mantido #{}, removidos {:?}, {} referência(s) movida(s)",
            r.nome, r.mantido_id, r.removidos, r.referencias_movidas
        );
    }
    println!("\n{} grupo(s) mesclado(s), {} cadastro(s) removido(s).", resultados.len(), removidos);

    Ok(())
}
