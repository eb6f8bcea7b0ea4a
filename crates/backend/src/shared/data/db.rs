use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Embedded schema migrations (crates/backend/migrations)
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

fn build_sqlite_url(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Open the database file, apply migrations and publish the connection
/// for [`get_connection`].
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };

    tracing::info!("Opening database: {}", absolute_path.display());
    let conn = connect(&build_sqlite_url(&absolute_path), 8).await?;
    install(conn)
}

/// Connect and bring the schema up to date
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging(false);
    // An in-memory database lives exactly as long as its single connection
    if url.contains(":memory:") {
        options
            .idle_timeout(Duration::from_secs(24 * 3600))
            .max_lifetime(Duration::from_secs(24 * 3600));
    }

    let conn = Database::connect(options).await?;
    run_migrations(&conn).await?;
    Ok(conn)
}

/// Fresh, migrated in-memory database. Used by tests.
pub async fn open_in_memory() -> anyhow::Result<DatabaseConnection> {
    connect("sqlite::memory:", 1).await
}

/// Publish an already opened connection for the handlers
pub fn install(conn: DatabaseConnection) -> anyhow::Result<()> {
    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database connection is already initialized"))
}

async fn run_migrations(conn: &DatabaseConnection) -> anyhow::Result<()> {
    MIGRATOR.run(conn.get_sqlite_connection_pool()).await?;
    tracing::info!("Database migrations applied successfully");
    Ok(())
}

pub fn get_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DB_CONN
        .get()
        .ok_or_else(|| anyhow::anyhow!("Database connection has not been initialized"))
}
