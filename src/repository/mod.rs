#[cfg(test)]
pub mod memory;

mod embedded {
    refinery::embed_migrations!("migrations");
}

use embedded::migrations;

use async_trait::async_trait;
use deadpool_postgres::{
    ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts,
};
use tokio_postgres::Row;
use tokio_postgres_rustls::MakeRustlsConnect;

use std::sync::Arc;

use crate::{
    config::{Config, REQUEST_TIMEOUT, SslMode},
    models::{Note, NoteChanges},
};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to build connection pool: {0}")]
    Build(#[from] deadpool_postgres::CreatePoolError),

    #[error("failed to set up TLS: {0}")]
    Tls(#[from] rustls::Error),

    #[error("failed to get connection from pool: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("{0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] refinery::Error),
}

/// Storage operations on the `notes` table. Each call is a single statement.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create(&self, title: &str, content: &str) -> Result<Note, StorageError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>, StorageError>;

    async fn get_all(&self) -> Result<Vec<Note>, StorageError>;

    /// Returns `false` when no note has this id.
    async fn update(&self, id: i64, changes: &NoteChanges) -> Result<bool, StorageError>;

    /// Returns `false` when no note has this id.
    async fn delete(&self, id: i64) -> Result<bool, StorageError>;
}

/// Builds the connection pool. Connections are opened lazily, so call
/// [`migrate`] afterwards to find out whether the database is reachable.
pub fn create_pool(cfg: &Config) -> Result<Pool, StorageError> {
    let mut pg = deadpool_postgres::Config::new();
    pg.host = Some(cfg.db_host.clone());
    pg.port = Some(cfg.db_port);
    pg.user = Some(cfg.db_user.clone());
    pg.password = Some(cfg.db_password.clone());
    pg.dbname = Some(cfg.db_name.clone());
    pg.ssl_mode = Some(match cfg.db_ssl_mode {
        SslMode::Disable => deadpool_postgres::SslMode::Disable,
        SslMode::Prefer => deadpool_postgres::SslMode::Prefer,
        SslMode::Require => deadpool_postgres::SslMode::Require,
    });
    pg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    let mut timeouts = Timeouts::default();
    timeouts.wait = Some(REQUEST_TIMEOUT);
    timeouts.create = Some(REQUEST_TIMEOUT);
    timeouts.recycle = Some(REQUEST_TIMEOUT);
    let mut pool_cfg = PoolConfig::new(cfg.db_pool_size);
    pool_cfg.timeouts = timeouts;
    pg.pool = Some(pool_cfg);

    let tls = MakeRustlsConnect::new(tls_config()?);

    Ok(pg.create_pool(Some(Runtime::Tokio1), tls)?)
}

fn tls_config() -> Result<rustls::ClientConfig, rustls::Error> {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()?
    .with_root_certificates(roots)
    .with_no_client_auth();

    Ok(config)
}

/// Applies the embedded migrations, creating the `notes` table if missing.
pub async fn migrate(pool: &Pool) -> Result<(), StorageError> {
    let mut client = pool.get().await?;
    let migrations_report = migrations::runner().run_async(&mut **client).await?;

    for migration in migrations_report.applied_migrations() {
        tracing::info!(
            "Migration Applied -  Name: {}, Version: {}",
            migration.name(),
            migration.version()
        );
    }

    tracing::info!("DB migrations finished!");

    Ok(())
}

#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool,
}

impl PgNoteRepository {
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn create(&self, title: &str, content: &str) -> Result<Note, StorageError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "INSERT INTO notes (title, content) VALUES ($1, $2) \
                 RETURNING id, title, content, created_at",
                &[&title, &content],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>, StorageError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, title, content, created_at FROM notes WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn get_all(&self) -> Result<Vec<Note>, StorageError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT id, title, content, created_at FROM notes ORDER BY id",
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn update(&self, id: i64, changes: &NoteChanges) -> Result<bool, StorageError> {
        let client = self.pool.get().await?;
        let rows = client
            .execute(
                "UPDATE notes SET title = COALESCE($1, title), content = COALESCE($2, content) \
                 WHERE id = $3",
                &[&changes.title, &changes.content, &id],
            )
            .await?;

        Ok(rows == 1)
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let client = self.pool.get().await?;
        let rows = client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        Ok(rows == 1)
    }
}
