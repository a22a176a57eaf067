use cyarika_bot::config::BotConfig;
use cyarika_bot::error::BotError;
use cyarika_bot::handler::Handler;
use serenity::Client;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cyarika_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Bot stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BotError> {
    let config = BotConfig::from_env()?;
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| BotError::Config("DATABASE_URL must be set".into()))?;

    let pool = cyarika_db::create_pool(&database_url).await?;
    cyarika_db::run_migrations(&pool)
        .await
        .map_err(sqlx::Error::from)?;
    tracing::info!("Database ready");

    let mut client = Client::builder(&config.discord_token, Handler::intents())
        .event_handler(Handler::new(pool, config))
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shard_manager.shutdown_all().await;
    });

    client.start().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), disconnecting"),
        () = terminate => tracing::info!("Received SIGTERM, disconnecting"),
    }
}
