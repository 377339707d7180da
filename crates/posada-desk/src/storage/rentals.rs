use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use crate::domain::rentals::Rental;
use crate::domain::types::{Money, OperatorId, RentalId, RentalStatus, RoomId};
use crate::error::{DeskError, Result};
use crate::storage::{decode_err, SqliteTx, Store};

#[async_trait]
pub trait RentalRepository: Send + Sync {
    async fn insert_tx(&self, tx: &mut SqliteTx<'_>, rental: &Rental) -> Result<()>;
    async fn get(&self, id: &RentalId) -> Result<Option<Rental>>;
    async fn get_tx(&self, tx: &mut SqliteTx<'_>, id: &RentalId) -> Result<Option<Rental>>;
    /// Persist the settlement fields written by a close.
    async fn update_closed_tx(&self, tx: &mut SqliteTx<'_>, rental: &Rental) -> Result<()>;
    async fn list_active(&self) -> Result<Vec<Rental>>;
    async fn active_for_room(&self, room_id: &RoomId) -> Result<Option<Rental>>;
    /// The most recently closed rental for a room, by actual exit time.
    async fn latest_closed_for_room(&self, room_id: &RoomId) -> Result<Option<Rental>>;
    async fn opened_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Rental>>;
}

pub struct SqliteRentalRepository {
    store: Store,
}

impl SqliteRentalRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn rental_from_row(r: &SqliteRow) -> sqlx::Result<Rental> {
        let id: String = r.get("rental_id");
        let room_id: String = r.get("room_id");
        let status: String = r.get("status");
        let hourly_rate: String = r.get("hourly_rate");
        let initial_payment: String = r.get("initial_payment");
        let overtime_payment: String = r.get("overtime_payment");
        let final_payment: String = r.get("final_payment");
        let reserved_hours: i64 = r.get("reserved_hours");
        let overtime_hours: i64 = r.get("overtime_hours");

        Ok(Rental {
            id: RentalId::from_str(&id).map_err(decode_err)?,
            room_id: RoomId::from_str(&room_id).map_err(decode_err)?,
            operator_id: OperatorId::new(r.get::<String, _>("operator_id")),
            client_name: r.get("client_name"),
            reserved_hours: reserved_hours as u32,
            entered_at: r.get("entered_at"),
            expected_exit_at: r.get("expected_exit_at"),
            actual_exit_at: r.get("actual_exit_at"),
            hourly_rate: Money::from_str(&hourly_rate).map_err(decode_err)?,
            initial_payment: Money::from_str(&initial_payment).map_err(decode_err)?,
            overtime_hours: overtime_hours as u32,
            overtime_payment: Money::from_str(&overtime_payment).map_err(decode_err)?,
            final_payment: Money::from_str(&final_payment).map_err(decode_err)?,
            status: RentalStatus::from_str(&status).map_err(decode_err)?,
        })
    }
}

#[async_trait]
impl RentalRepository for SqliteRentalRepository {
    async fn insert_tx(&self, tx: &mut SqliteTx<'_>, rental: &Rental) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rentals
            (rental_id, room_id, operator_id, client_name, reserved_hours,
             entered_at, expected_exit_at, actual_exit_at, hourly_rate,
             initial_payment, overtime_hours, overtime_payment, final_payment, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(rental.id.to_string())
        .bind(rental.room_id.to_string())
        .bind(rental.operator_id.as_str())
        .bind(&rental.client_name)
        .bind(i64::from(rental.reserved_hours))
        .bind(rental.entered_at)
        .bind(rental.expected_exit_at)
        .bind(rental.actual_exit_at)
        .bind(rental.hourly_rate.as_decimal().to_string())
        .bind(rental.initial_payment.as_decimal().to_string())
        .bind(i64::from(rental.overtime_hours))
        .bind(rental.overtime_payment.as_decimal().to_string())
        .bind(rental.final_payment.as_decimal().to_string())
        .bind(rental.status.to_string())
        .execute(&mut **tx)
        .await
        .map_err(|e| DeskError::database("insert_rental", e))?;

        Ok(())
    }

    async fn get(&self, id: &RentalId) -> Result<Option<Rental>> {
        let row = sqlx::query(
            r#"
            SELECT rental_id, room_id, operator_id, client_name, reserved_hours,
                   entered_at, expected_exit_at, actual_exit_at, hourly_rate,
                   initial_payment, overtime_hours, overtime_payment, final_payment, status
            FROM rentals
            WHERE rental_id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.store.pool())
        .await
        .map_err(|e| DeskError::database("get_rental", e))?;

        row.map(|r| Self::rental_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("get_rental", e))
    }

    async fn get_tx(&self, tx: &mut SqliteTx<'_>, id: &RentalId) -> Result<Option<Rental>> {
        let row = sqlx::query(
            r#"
            SELECT rental_id, room_id, operator_id, client_name, reserved_hours,
                   entered_at, expected_exit_at, actual_exit_at, hourly_rate,
                   initial_payment, overtime_hours, overtime_payment, final_payment, status
            FROM rentals
            WHERE rental_id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DeskError::database("get_rental", e))?;

        row.map(|r| Self::rental_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("get_rental", e))
    }

    async fn update_closed_tx(&self, tx: &mut SqliteTx<'_>, rental: &Rental) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE rentals
            SET actual_exit_at = ?2, overtime_hours = ?3, overtime_payment = ?4,
                final_payment = ?5, status = ?6
            WHERE rental_id = ?1
            "#,
        )
        .bind(rental.id.to_string())
        .bind(rental.actual_exit_at)
        .bind(i64::from(rental.overtime_hours))
        .bind(rental.overtime_payment.as_decimal().to_string())
        .bind(rental.final_payment.as_decimal().to_string())
        .bind(rental.status.to_string())
        .execute(&mut **tx)
        .await
        .map_err(|e| DeskError::database("update_closed_rental", e))?;

        if result.rows_affected() == 0 {
            return Err(DeskError::RentalNotFound {
                id: rental.id.to_string(),
            });
        }

        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<Rental>> {
        let rows = sqlx::query(
            r#"
            SELECT rental_id, room_id, operator_id, client_name, reserved_hours,
                   entered_at, expected_exit_at, actual_exit_at, hourly_rate,
                   initial_payment, overtime_hours, overtime_payment, final_payment, status
            FROM rentals
            WHERE status = 'active'
            ORDER BY entered_at
            "#,
        )
        .fetch_all(self.store.pool())
        .await
        .map_err(|e| DeskError::database("list_active_rentals", e))?;

        rows.iter()
            .map(Self::rental_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|e| DeskError::database("list_active_rentals", e))
    }

    async fn active_for_room(&self, room_id: &RoomId) -> Result<Option<Rental>> {
        let row = sqlx::query(
            r#"
            SELECT rental_id, room_id, operator_id, client_name, reserved_hours,
                   entered_at, expected_exit_at, actual_exit_at, hourly_rate,
                   initial_payment, overtime_hours, overtime_payment, final_payment, status
            FROM rentals
            WHERE room_id = ?1 AND status = 'active'
            "#,
        )
        .bind(room_id.to_string())
        .fetch_optional(self.store.pool())
        .await
        .map_err(|e| DeskError::database("active_rental_for_room", e))?;

        row.map(|r| Self::rental_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("active_rental_for_room", e))
    }

    async fn latest_closed_for_room(&self, room_id: &RoomId) -> Result<Option<Rental>> {
        let row = sqlx::query(
            r#"
            SELECT rental_id, room_id, operator_id, client_name, reserved_hours,
                   entered_at, expected_exit_at, actual_exit_at, hourly_rate,
                   initial_payment, overtime_hours, overtime_payment, final_payment, status
            FROM rentals
            WHERE room_id = ?1 AND status = 'closed'
            ORDER BY actual_exit_at DESC
            LIMIT 1
            "#,
        )
        .bind(room_id.to_string())
        .fetch_optional(self.store.pool())
        .await
        .map_err(|e| DeskError::database("latest_closed_rental", e))?;

        row.map(|r| Self::rental_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("latest_closed_rental", e))
    }

    async fn opened_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Rental>> {
        let rows = sqlx::query(
            r#"
            SELECT rental_id, room_id, operator_id, client_name, reserved_hours,
                   entered_at, expected_exit_at, actual_exit_at, hourly_rate,
                   initial_payment, overtime_hours, overtime_payment, final_payment, status
            FROM rentals
            WHERE entered_at >= ?1 AND entered_at < ?2
            ORDER BY entered_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.store.pool())
        .await
        .map_err(|e| DeskError::database("rentals_opened_between", e))?;

        rows.iter()
            .map(Self::rental_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|e| DeskError::database("rentals_opened_between", e))
    }
}
