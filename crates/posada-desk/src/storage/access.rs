use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use posada_common::LicensePlate;

use crate::domain::access::AccessRecord;
use crate::domain::types::{AccessRecordId, EntryMode, RentalId};
use crate::error::{DeskError, Result};
use crate::storage::{decode_err, SqliteTx, Store};

#[async_trait]
pub trait AccessRepository: Send + Sync {
    async fn insert_tx(&self, tx: &mut SqliteTx<'_>, record: &AccessRecord) -> Result<()>;
    async fn get_by_rental(&self, rental_id: &RentalId) -> Result<Option<AccessRecord>>;
    async fn record_exit_tx(
        &self,
        tx: &mut SqliteTx<'_>,
        rental_id: &RentalId,
        exited_at: DateTime<Utc>,
    ) -> Result<()>;
}

pub struct SqliteAccessRepository {
    store: Store,
}

impl SqliteAccessRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn record_from_row(r: &SqliteRow) -> sqlx::Result<AccessRecord> {
        let id: String = r.get("access_id");
        let rental_id: String = r.get("rental_id");
        let mode: String = r.get("mode");
        let plate: Option<String> = r.get("plate");

        Ok(AccessRecord {
            id: AccessRecordId::from_uuid(uuid::Uuid::parse_str(&id).map_err(decode_err)?),
            rental_id: RentalId::from_str(&rental_id).map_err(decode_err)?,
            mode: EntryMode::from_str(&mode).map_err(decode_err)?,
            plate: plate
                .map(LicensePlate::new)
                .transpose()
                .map_err(decode_err)?,
            entered_at: r.get("entered_at"),
            exited_at: r.get("exited_at"),
        })
    }
}

#[async_trait]
impl AccessRepository for SqliteAccessRepository {
    async fn insert_tx(&self, tx: &mut SqliteTx<'_>, record: &AccessRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO access_records (access_id, rental_id, mode, plate, entered_at, exited_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.rental_id.to_string())
        .bind(record.mode.to_string())
        .bind(record.plate.as_ref().map(|p| p.as_str().to_string()))
        .bind(record.entered_at)
        .bind(record.exited_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| DeskError::database("insert_access_record", e))?;

        Ok(())
    }

    async fn get_by_rental(&self, rental_id: &RentalId) -> Result<Option<AccessRecord>> {
        let row = sqlx::query(
            r#"
            SELECT access_id, rental_id, mode, plate, entered_at, exited_at
            FROM access_records
            WHERE rental_id = ?1
            "#,
        )
        .bind(rental_id.to_string())
        .fetch_optional(self.store.pool())
        .await
        .map_err(|e| DeskError::database("get_access_record", e))?;

        row.map(|r| Self::record_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("get_access_record", e))
    }

    async fn record_exit_tx(
        &self,
        tx: &mut SqliteTx<'_>,
        rental_id: &RentalId,
        exited_at: DateTime<Utc>,
    ) -> Result<()> {
        // A rental is not required to have an access record; a missing row
        // is not an error here.
        sqlx::query(
            r#"
            UPDATE access_records SET exited_at = ?2 WHERE rental_id = ?1
            "#,
        )
        .bind(rental_id.to_string())
        .bind(exited_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| DeskError::database("record_access_exit", e))?;

        Ok(())
    }
}
