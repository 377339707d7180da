use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use posada_common::RoomNumber;

use crate::domain::rooms::Room;
use crate::domain::types::{RoomId, RoomState, RoomType};
use crate::error::{DeskError, Result};
use crate::storage::{decode_err, SqliteTx, Store};

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn insert(&self, room: &Room) -> Result<()>;
    async fn get(&self, id: &RoomId) -> Result<Option<Room>>;
    async fn get_tx(&self, tx: &mut SqliteTx<'_>, id: &RoomId) -> Result<Option<Room>>;
    async fn get_by_number(&self, number: &RoomNumber) -> Result<Option<Room>>;
    async fn list(&self) -> Result<Vec<Room>>;
    async fn list_in_state(&self, state: RoomState) -> Result<Vec<Room>>;
    async fn update_state_tx(
        &self,
        tx: &mut SqliteTx<'_>,
        id: &RoomId,
        state: RoomState,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;
    async fn count(&self) -> Result<u64>;
}

pub struct SqliteRoomRepository {
    store: Store,
}

impl SqliteRoomRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn room_from_row(r: &SqliteRow) -> sqlx::Result<Room> {
        let id: String = r.get("room_id");
        let number: String = r.get("number");
        let room_type: String = r.get("room_type");
        let state: String = r.get("state");
        let base_price: Option<String> = r.get("base_price");

        Ok(Room {
            id: RoomId::from_str(&id).map_err(decode_err)?,
            number: RoomNumber::new(number).map_err(decode_err)?,
            room_type: RoomType::from_str(&room_type).map_err(decode_err)?,
            state: RoomState::from_str(&state).map_err(decode_err)?,
            base_price: base_price
                .map(|p| Decimal::from_str(&p))
                .transpose()
                .map_err(decode_err)?,
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        })
    }
}

#[async_trait]
impl RoomRepository for SqliteRoomRepository {
    async fn insert(&self, room: &Room) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rooms (room_id, number, room_type, state, base_price, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(room.id.to_string())
        .bind(room.number.as_str())
        .bind(room.room_type.to_string())
        .bind(room.state.to_string())
        .bind(room.base_price.map(|p| p.to_string()))
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(self.store.pool())
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                DeskError::validation("number", format!("room {} already exists", room.number))
            } else {
                DeskError::database("insert_room", e)
            }
        })?;

        Ok(())
    }

    async fn get(&self, id: &RoomId) -> Result<Option<Room>> {
        let row = sqlx::query(
            r#"
            SELECT room_id, number, room_type, state, base_price, created_at, updated_at
            FROM rooms
            WHERE room_id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.store.pool())
        .await
        .map_err(|e| DeskError::database("get_room", e))?;

        row.map(|r| Self::room_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("get_room", e))
    }

    async fn get_tx(&self, tx: &mut SqliteTx<'_>, id: &RoomId) -> Result<Option<Room>> {
        let row = sqlx::query(
            r#"
            SELECT room_id, number, room_type, state, base_price, created_at, updated_at
            FROM rooms
            WHERE room_id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DeskError::database("get_room", e))?;

        row.map(|r| Self::room_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("get_room", e))
    }

    async fn get_by_number(&self, number: &RoomNumber) -> Result<Option<Room>> {
        let row = sqlx::query(
            r#"
            SELECT room_id, number, room_type, state, base_price, created_at, updated_at
            FROM rooms
            WHERE number = ?1
            "#,
        )
        .bind(number.as_str())
        .fetch_optional(self.store.pool())
        .await
        .map_err(|e| DeskError::database("get_room_by_number", e))?;

        row.map(|r| Self::room_from_row(&r))
            .transpose()
            .map_err(|e| DeskError::database("get_room_by_number", e))
    }

    async fn list(&self) -> Result<Vec<Room>> {
        let rows = sqlx::query(
            r#"
            SELECT room_id, number, room_type, state, base_price, created_at, updated_at
            FROM rooms
            ORDER BY number
            "#,
        )
        .fetch_all(self.store.pool())
        .await
        .map_err(|e| DeskError::database("list_rooms", e))?;

        rows.iter()
            .map(Self::room_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|e| DeskError::database("list_rooms", e))
    }

    async fn list_in_state(&self, state: RoomState) -> Result<Vec<Room>> {
        let rows = sqlx::query(
            r#"
            SELECT room_id, number, room_type, state, base_price, created_at, updated_at
            FROM rooms
            WHERE state = ?1
            ORDER BY number
            "#,
        )
        .bind(state.to_string())
        .fetch_all(self.store.pool())
        .await
        .map_err(|e| DeskError::database("list_rooms_in_state", e))?;

        rows.iter()
            .map(Self::room_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|e| DeskError::database("list_rooms_in_state", e))
    }

    async fn update_state_tx(
        &self,
        tx: &mut SqliteTx<'_>,
        id: &RoomId,
        state: RoomState,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE rooms SET state = ?2, updated_at = ?3 WHERE room_id = ?1
            "#,
        )
        .bind(id.to_string())
        .bind(state.to_string())
        .bind(updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| DeskError::database("update_room_state", e))?;

        if result.rows_affected() == 0 {
            return Err(DeskError::RoomNotFound { id: id.to_string() });
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM rooms")
            .fetch_one(self.store.pool())
            .await
            .map_err(|e| DeskError::database("count_rooms", e))?;

        let n: i64 = row.get("n");
        Ok(n as u64)
    }
}
