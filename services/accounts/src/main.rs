use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use accounts::{
    AppState,
    config::{AccountsConfig, StorageBackend},
    password::PasswordHasher,
    routes,
    service::AccountService,
    store::{InMemoryUserStore, PgUserStore, UserStore},
};
use common::database::{self, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting accounts service");

    let config = AccountsConfig::from_env()?;
    let hasher = PasswordHasher::new(&config.password_salt, config.hash_cost)?;

    let store: Arc<dyn UserStore> = match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = database::init_pool(&db_config).await?;

            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            let store = PgUserStore::new(pool);
            store.ensure_schema().await?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            info!("Using in-memory user store; records are lost on shutdown");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let app_state = AppState::new(AccountService::new(store, hasher));

    info!("Accounts service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("Accounts service listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
