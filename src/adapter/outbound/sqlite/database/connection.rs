//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and per-connection
//! pragmas for the SQLite catalog database.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Database URL for a private in-memory database.
pub const MEMORY_DATABASE: &str = ":memory:";

const FILE_POOL_SIZE: u32 = 5;

/// Pragmas applied to every pooled connection.
///
/// SQLite leaves foreign key enforcement off per connection, so the link
/// table's references are only checked when this runs on acquire.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given database URL.
///
/// An in-memory database exists per connection, so its pool holds exactly
/// one connection to keep every caller on the same data.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let max_size = if database_url == MEMORY_DATABASE {
        1
    } else {
        FILE_POOL_SIZE
    };
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

/// Create a pool and bring its schema up to date.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn open_database(database_url: &str) -> Result<DbPool> {
    let pool = create_pool(database_url)?;
    run_migrations(&pool)?;
    tracing::debug!(database = %database_url, "Database ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::prelude::*;

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    #[derive(diesel::QueryableByName)]
    struct ForeignKeys {
        #[diesel(sql_type = diesel::sql_types::Integer)]
        foreign_keys: i32,
    }

    fn table_names(pool: &DbPool) -> Vec<String> {
        let mut conn = pool.get().unwrap();
        diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect()
    }

    #[test]
    fn memory_pool_holds_a_single_connection() {
        let pool = create_pool(MEMORY_DATABASE).unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn file_pool_uses_default_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        assert_eq!(pool.max_size(), FILE_POOL_SIZE);
    }

    #[test]
    fn run_migrations_creates_tables() {
        let pool = open_database(MEMORY_DATABASE).unwrap();
        assert_eq!(
            table_names(&pool),
            vec![
                "engine",
                "product_tags",
                "products",
                "vehicle_base",
                "vehicle_engine"
            ]
        );
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let pool = create_pool(MEMORY_DATABASE).unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();
        assert_eq!(table_names(&pool).len(), 5);
    }

    #[test]
    fn connections_enforce_foreign_keys() {
        let pool = open_database(MEMORY_DATABASE).unwrap();
        let mut conn = pool.get().unwrap();
        let rows = diesel::sql_query("PRAGMA foreign_keys")
            .load::<ForeignKeys>(&mut conn)
            .unwrap();
        assert_eq!(rows[0].foreign_keys, 1);
    }
}
