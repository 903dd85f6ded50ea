pub mod models;
pub mod repositories;
pub mod schema;

use diesel::{
    Connection, PgConnection,
    r2d2::{self, ConnectionManager},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::env;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

#[derive(Debug)]
pub enum DatabaseError {
    Configuration(String),
    Connection(String),
    Pool(String),
    Migration(String),
}

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            DatabaseError::Connection(msg) => write!(f, "Connection error: {}", msg),
            DatabaseError::Pool(msg) => write!(f, "Pool error: {}", msg),
            DatabaseError::Migration(msg) => write!(f, "Migration error: {}", msg),
        }
    }
}

impl std::error::Error for DatabaseError {}

/// Pool sizing defaults match the embedding worker parallelism: the pool
/// never needs more connections than concurrent pipeline jobs plus a few
/// request handlers.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, DatabaseError> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::Configuration("DATABASE_URL not set".to_string()))?;

        Ok(Self {
            url,
            max_connections: parse_count(env::var("DATABASE_MAX_CONNECTIONS").ok(), 10),
            min_idle: parse_count(env::var("DATABASE_MIN_IDLE").ok(), 1),
        })
    }
}

fn parse_count(value: Option<String>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

pub fn create_connection_pool(config: &DatabaseConfig) -> Result<DbPool, DatabaseError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.url);

    r2d2::Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_idle.min(config.max_connections)))
        .build(manager)
        .map_err(|e| DatabaseError::Pool(e.to_string()))
}

pub fn get_connection_from_pool(pool: &DbPool) -> Result<DbConnection, DatabaseError> {
    pool.get().map_err(|e| DatabaseError::Pool(e.to_string()))
}

/// Runs pending migrations on a dedicated connection. Migrations hold a lock,
/// so they never go through the pool.
pub fn run_migrations(config: &DatabaseConfig) -> Result<(), DatabaseError> {
    let mut conn = PgConnection::establish(&config.url)
        .map_err(|e| DatabaseError::Connection(e.to_string()))?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    Ok(())
}
