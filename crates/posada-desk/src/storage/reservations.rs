use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use crate::domain::reservations::Reservation;
use crate::domain::types::{Money, OperatorId, ReservationId, ReservationStatus, RoomId};
use crate::error::{DeskError, Result};
use crate::storage::{decode_err, SqliteTx, Store};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn insert(&self, reservation: &Reservation) -> Result<()>;
    async fn get(&self, id: &ReservationId) -> Result<Option<Reservation>>;
    async fn get_tx(
        &self,
        tx: &mut SqliteTx<'_>,
        id: &ReservationId,
    ) -> Result<Option<Reservation>>;
    async fn update_status(&self, reservation: &Reservation) -> Result<()>;
    async fn update_status_tx(&self, tx: &mut SqliteTx<'_>, reservation: &Reservation)
        -> Result<()>;
    async fn list(&self, status: Option<ReservationStatus>) -> Result<Vec<Reservation>>;
}

pub struct SqliteReservationRepository {
    store: Store,
}

impl SqliteReservationRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn reservation_from_row(r: &SqliteRow) -> sqlx::Result<Reservation> {
        let id: String = r.get("reservation_id");
        let room_id: String = r.get("room_id");
        let status: String = r.get("status");
        let estimated_price: String = r.get("estimated_price");
        let requested_hours: i64 = r.get("requested_hours");

        Ok(Reservation {
            id: ReservationId::from_str(&id).map_err(decode_err)?,
            room_id: RoomId::from_str(&room_id).map_err(decode_err)?,
            operator_id: OperatorId::new(r.get::<String, _>("operator_id")),
            client_name: r.get("client_name"),
            client_phone: r.get("client_phone"),
            requested_at: r.get("requested_at"),
            requested_hours: requested_hours as u32,
            estimated_price: Money::from_str(&estimated_price).map_err(decode_err)?,
            status: ReservationStatus::from_str(&status).map_err(decode_err)?,
            created_at: r.get("created_at"),
            confirmed_at: r.get("confirmed_at"),
        })
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepository {
    async fn insert(&self, reservation: &Reservation) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reservations
            (reservation_id, room_id, operator_id, client_name, client_phone,
             requested_at, requested_hours, estimated_price, status, created_at, confirmed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(reservation.id.to_string())
        .bind(reservation.room_id.to_string())
        .bind(reservation.operator_id.as_str())
        .bind(&reservation.client_name)
        .bind(&reservation.client_phone)
        .bind(reservation.requested_at)
        .bind(i64::from(reservation.requested_hours))
        .bind(reservation.estimated_price.as_decimal().to_string())
        .bind(reservation.status.to_string())
        .bind(reservation.created_at)
        .bind(reservation.confirmed_at)
        .execute(self.store.pool())
        .await
        .map_err(|e| DeskError::database("insert_reservation", e))?;

        Ok(())
    }

    async fn get(&self, id: &ReservationId) -> Result<Option<Reservation>> {
        let row = sqlx::query(
            r#"
            SELECT reservation_id, room_id, operator_id, client_name, client_phone,
                   requested_at, requested_hours, estimated_price, status, created_at, confirmed_at
            FROM reservations
            WHERE reservation_id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.store.pool())
        .await
        .map_err(|e| DeskError::database("get_reservation", e))?;

        row.map(|r| Self::reservation_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("get_reservation", e))
    }

    async fn get_tx(
        &self,
        tx: &mut SqliteTx<'_>,
        id: &ReservationId,
    ) -> Result<Option<Reservation>> {
        let row = sqlx::query(
            r#"
            SELECT reservation_id, room_id, operator_id, client_name, client_phone,
                   requested_at, requested_hours, estimated_price, status, created_at, confirmed_at
            FROM reservations
            WHERE reservation_id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DeskError::database("get_reservation", e))?;

        row.map(|r| Self::reservation_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("get_reservation", e))
    }

    async fn update_status(&self, reservation: &Reservation) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE reservations SET status = ?2, confirmed_at = ?3 WHERE reservation_id = ?1
            "#,
        )
        .bind(reservation.id.to_string())
        .bind(reservation.status.to_string())
        .bind(reservation.confirmed_at)
        .execute(self.store.pool())
        .await
        .map_err(|e| DeskError::database("update_reservation_status", e))?;

        if result.rows_affected() == 0 {
            return Err(DeskError::ReservationNotFound {
                id: reservation.id.to_string(),
            });
        }

        Ok(())
    }

    async fn update_status_tx(
        &self,
        tx: &mut SqliteTx<'_>,
        reservation: &Reservation,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE reservations SET status = ?2, confirmed_at = ?3 WHERE reservation_id = ?1
            "#,
        )
        .bind(reservation.id.to_string())
        .bind(reservation.status.to_string())
        .bind(reservation.confirmed_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| DeskError::database("update_reservation_status", e))?;

        if result.rows_affected() == 0 {
            return Err(DeskError::ReservationNotFound {
                id: reservation.id.to_string(),
            });
        }

        Ok(())
    }

    async fn list(&self, status: Option<ReservationStatus>) -> Result<Vec<Reservation>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    r#"
                    SELECT reservation_id, room_id, operator_id, client_name, client_phone,
                           requested_at, requested_hours, estimated_price, status, created_at, confirmed_at
                    FROM reservations
                    WHERE status = ?1
                    ORDER BY requested_at
                    "#,
                )
                .bind(status.to_string())
                .fetch_all(self.store.pool())
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT reservation_id, room_id, operator_id, client_name, client_phone,
                           requested_at, requested_hours, estimated_price, status, created_at, confirmed_at
                    FROM reservations
                    ORDER BY requested_at
                    "#,
                )
                .fetch_all(self.store.pool())
                .await
            }
        }
        .map_err(|e| DeskError::database("list_reservations", e))?;

        rows.iter()
            .map(Self::reservation_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|e| DeskError::database("list_reservations", e))
    }
}
