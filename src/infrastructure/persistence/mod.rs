use crate::domain::errors::{StoreError, StoreResult};
use sqlx::{
    any::{AnyConnectOptions, AnyPoolOptions},
    AnyPool, ConnectOptions,
};
use std::str::FromStr;
use tokio::sync::OnceCell;
use tracing::log::LevelFilter;

mod enquiries;

pub struct Database {
    pub(crate) pool: AnyPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        // Ensure drivers are installed for AnyPool
        sqlx::any::install_default_drivers();

        let connect_options = AnyConnectOptions::from_str(database_url)?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, std::time::Duration::from_secs(1));

        let is_sqlite = database_url.starts_with("sqlite");

        let pool = AnyPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    // Per-connection settings; the journal mode sticks to the file
                    if is_sqlite {
                        sqlx::query("PRAGMA busy_timeout = 5000")
                            .execute(&mut *conn)
                            .await?;
                        sqlx::query("PRAGMA synchronous = NORMAL")
                            .execute(&mut *conn)
                            .await?;
                    }
                    Ok(())
                })
            })
            .connect_with(connect_options)
            .await?;

        if is_sqlite {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await?;
        }

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("migrations/sqlite").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

/// Lazily opened handle to the enquiry store.
///
/// The first successful `connect` is kept for the life of the gateway and
/// shared by every request. A failed attempt leaves the gateway unconnected,
/// so the next caller tries again; nothing retries on its own.
pub struct DatabaseGateway {
    database_url: String,
    database: OnceCell<Database>,
}

impl DatabaseGateway {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            database: OnceCell::new(),
        }
    }

    /// Wraps an already open database.
    pub fn from_database(database: Database) -> Self {
        Self {
            database_url: String::new(),
            database: OnceCell::new_with(Some(database)),
        }
    }

    pub async fn database(&self) -> StoreResult<&Database> {
        self.database
            .get_or_try_init(|| async {
                tracing::info!("Connecting to enquiry store");
                let database = Database::connect(&self.database_url)
                    .await
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
                tracing::info!("Enquiry store connection established");
                Ok(database)
            })
            .await
    }

    pub fn is_connected(&self) -> bool {
        self.database.initialized()
    }
}
