use dotenvy::dotenv;
use mealtally::{config, core, errors::Result};
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

    // 3. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed district menus if a menus.toml is present
    match config::menus::load_default_config() {
        Ok(menu_config) => {
            let inserted = config::menus::seed_menus(&db, &menu_config)
                .await
                .inspect_err(|e| error!("Failed to seed menus: {}", e))?;
            info!(inserted, "Menu schedule seeded.");
        }
        Err(e) => info!("No menu seed applied: {}", e),
    }

    let districts = core::enroll::list_districts(&db).await?;
    info!(districts = districts.len(), "mealtally ready.");

    Ok(())
}
