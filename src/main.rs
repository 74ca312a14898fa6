use purchase_buddy::{
    config::{self, database},
    errors::Result,
    server,
};
use dotenvy::dotenv;
use tokio::net::TcpListener;
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

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;

    // 4. Open the database and make sure the tables exist
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Serve the action endpoint
    let listener = TcpListener::bind(&app_config.bind_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.bind_address, e))?;
    info!("Endpoint listening on {}", app_config.bind_address);

    axum::serve(listener, server::router(db))
        .await
        .inspect_err(|e| error!("Server error: {}", e))?;

    Ok(())
}
