use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;

use crate::error::{DeskError, Result};

pub mod access;
pub mod rentals;
pub mod reservations;
pub mod rooms;

pub use access::{AccessRepository, SqliteAccessRepository};

pub use rentals::{RentalRepository, SqliteRentalRepository};

pub use reservations::{ReservationRepository, SqliteReservationRepository};

pub use rooms::{RoomRepository, SqliteRoomRepository};

pub type SqliteTx<'a> = Transaction<'a, Sqlite>;

/// Wrap a row-decoding failure so it surfaces through the usual database
/// error path.
pub(crate) fn decode_err(e: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

/// Connection handle shared by the repositories. Every multi-record
/// mutation runs on a [`SqliteTx`] obtained from [`Store::begin`].
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| DeskError::database("connect", e))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DeskError::database("connect", e))?;

        Ok(Self { pool })
    }

    /// An in-memory database for tests. Pinned to a single connection so
    /// the database lives as long as the pool.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DeskError::database("connect", e))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DeskError::database("connect", e))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<SqliteTx<'_>> {
        self.pool
            .begin()
            .await
            .map_err(|e| DeskError::database("begin", e))
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
