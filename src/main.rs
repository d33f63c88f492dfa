use dotenvy::dotenv;
use microlend::{config, errors::Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the lending policy configuration
    let policy = config::policy::load_default_policy()
        .inspect_err(|e| error!("Failed to load lending policy: {e}"))?;
    info!(
        rate = policy.rate_per_installment,
        default_installments = policy.default_installment_count,
        "Loaded lending policy."
    );

    // 4. Connect to the database and ensure the schema exists
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;

    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    info!("Lending engine initialized.");
    Ok(())
}
