use anyhow::Context;
use clap::{Parser, Subcommand};
use cyarika_cli::{admin, defaults};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cyarika-cli", version, about = "Cyarika administration tasks")]
struct Cli {
    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending database migrations.
    Migrate,
    /// Insert the bundled prompts and tropes that are not present yet.
    ImportDefaults,
    /// Grant or revoke admin rights on an existing user.
    SetAdmin {
        username: String,
        #[arg(default_value_t = true, action = clap::ArgAction::Set)]
        is_admin: bool,
    },
    /// Create a new admin account.
    AddAdmin { username: String, password: String },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cyarika_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = cyarika_db::create_pool(&cli.database_url)
        .await
        .context("failed to connect to the database")?;

    match cli.command {
        Command::Migrate => {
            cyarika_db::run_migrations(&pool)
                .await
                .context("migration failed")?;
            println!("Migrations applied");
        }
        Command::ImportDefaults => {
            let counts = defaults::import(&pool, &defaults::Defaults::bundled()?).await?;
            println!(
                "Imported {} prompts and {} tropes",
                counts.prompts, counts.tropes
            );
        }
        Command::SetAdmin { username, is_admin } => {
            admin::set_admin(&pool, &username, is_admin).await?;
            println!("{username}: is_admin = {is_admin}");
        }
        Command::AddAdmin { username, password } => {
            let user = admin::add_admin(&pool, &username, &password).await?;
            println!("Created admin '{}' (id {})", user.username, user.id);
        }
    }
    Ok(())
}
