use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "storekeep={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server else {
        tracing::error!("missing [server] settings, nothing to run");
        return Ok(());
    };

    tracing::info!("Found server settings...");
    let db = parse_database(&server.database).await?;

    let engine = engine::Engine::builder()
        .database(db)
        .revenue_reversal(settings.ledger.revenue_reversal)
        .build()
        .await?;

    if let Err(err) = engine.ledger_company().await {
        tracing::warn!("ledger company unavailable, sales will be rejected: {err}");
    }

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let options = match config {
        // Every pooled connection would open its own empty in-memory database.
        Database::Memory => {
            let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
            options.max_connections(1);
            options
        }
        Database::Sqlite(path) => sea_orm::ConnectOptions::new(format!("sqlite:{}?mode=rwc", path)),
    };

    let database = sea_orm::Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
