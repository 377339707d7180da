//! The front-desk service façade: every operation the view layer calls.
//!
//! Each mutating operation runs as a single transaction; the room-state
//! check and the room-state update commit together or not at all. Read
//! operations run the lazy cleaning-release sweep first, so the board never
//! shows a room still in Cleaning past its delay.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use posada_common::{LicensePlate, RoomNumber};

use crate::clock::Clock;
use crate::config::DeskConfig;
use crate::domain::access::AccessRecord;
use crate::domain::auto_release::AutoReleasePolicy;
use crate::domain::billing::{self, RateCard};
use crate::domain::rentals::Rental;
use crate::domain::reservations::Reservation;
use crate::domain::rooms::Room;
use crate::domain::types::{
    EntryMode, Money, OperatorId, RentalId, ReservationId, ReservationStatus, RoomId, RoomState,
    RoomType,
};
use crate::error::{DeskError, Result};
use crate::storage::{
    AccessRepository, RentalRepository, ReservationRepository, RoomRepository,
    SqliteAccessRepository, SqliteRentalRepository, SqliteReservationRepository,
    SqliteRoomRepository, Store,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub room_id: RoomId,
    pub operator_id: OperatorId,
    pub client_name: String,
    pub hours: u32,
    pub entry_mode: EntryMode,
    pub plate: Option<LicensePlate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub room_id: RoomId,
    pub operator_id: OperatorId,
    pub client_name: String,
    pub client_phone: String,
    pub requested_at: DateTime<Utc>,
    pub hours: u32,
}

/// An active rental with its live timing, computed against "now" at call
/// time.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveRentalView {
    pub rental: Rental,
    pub room_number: RoomNumber,
    pub remaining_minutes: i64,
    pub overtime_minutes: i64,
}

/// One row of the live board.
#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    pub room: Room,
    pub active_rental: Option<Rental>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub client_count: u64,
    pub total_initial_revenue: Money,
    pub total_hours: u64,
    pub occupied_count: u64,
    pub available_count: u64,
}

pub struct FrontDesk {
    store: Store,
    rooms: SqliteRoomRepository,
    rentals: SqliteRentalRepository,
    access: SqliteAccessRepository,
    reservations: SqliteReservationRepository,
    rates: RateCard,
    auto_release: AutoReleasePolicy,
    clock: Arc<dyn Clock>,
}

impl FrontDesk {
    pub fn new(store: Store, config: &DeskConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: SqliteRoomRepository::new(store.clone()),
            rentals: SqliteRentalRepository::new(store.clone()),
            access: SqliteAccessRepository::new(store.clone()),
            reservations: SqliteReservationRepository::new(store.clone()),
            rates: config.rate_card(),
            auto_release: AutoReleasePolicy::from_secs(config.release_delay_secs),
            clock,
            store,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ---- provisioning ----

    pub async fn add_room(
        &self,
        number: RoomNumber,
        room_type: RoomType,
        base_price: Option<Decimal>,
    ) -> Result<Room> {
        let room = Room::new(number, room_type, base_price, self.now());
        self.rooms.insert(&room).await?;

        info!(room = %room.number, room_type = %room.room_type, "room added to catalog");
        Ok(room)
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>> {
        self.rooms.list().await
    }

    /// Seed the standard house layout (eight normal rooms, two jacuzzi)
    /// when the catalog is empty. Returns the number of rooms created.
    pub async fn seed_default_rooms(&self) -> Result<u64> {
        if self.rooms.count().await? > 0 {
            return Ok(0);
        }

        let mut created = 0;
        for i in 1..=8u32 {
            let number = RoomNumber::new(format!("H0{i}"))
                .map_err(|e| DeskError::validation("number", e.to_string()))?;
            self.add_room(number, RoomType::Normal, None).await?;
            created += 1;
        }
        for number in ["J09", "J10"] {
            let number = RoomNumber::new(number)
                .map_err(|e| DeskError::validation("number", e.to_string()))?;
            self.add_room(number, RoomType::Jacuzzi, None).await?;
            created += 1;
        }

        Ok(created)
    }

    // ---- rentals ----

    pub async fn check_in(&self, request: CheckInRequest) -> Result<Rental> {
        let client_name = required_text("client_name", &request.client_name)?;
        if request.hours == 0 {
            return Err(DeskError::validation("hours", "must be at least 1"));
        }

        let now = self.now();
        let mut tx = self.store.begin().await?;

        let mut room = self
            .rooms
            .get_tx(&mut tx, &request.room_id)
            .await?
            .ok_or_else(|| DeskError::RoomNotFound {
                id: request.room_id.to_string(),
            })?;

        if !room.state.is_available() {
            return Err(DeskError::RoomUnavailable {
                number: room.number.to_string(),
                state: room.state.to_string(),
            });
        }

        let rate = room.hourly_rate(&self.rates);
        let rental = Rental::open(
            room.id,
            request.operator_id,
            client_name,
            request.hours,
            rate,
            now,
        );
        room.occupy(now)?;

        self.rentals.insert_tx(&mut tx, &rental).await?;

        let record = AccessRecord::new(rental.id, request.entry_mode, request.plate, now);
        self.access.insert_tx(&mut tx, &record).await?;

        self.rooms
            .update_state_tx(&mut tx, &room.id, room.state, now)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DeskError::database("commit_check_in", e))?;

        info!(
            room = %room.number,
            rental = %rental.id,
            hours = rental.reserved_hours,
            initial_payment = %rental.initial_payment,
            "check-in completed"
        );

        Ok(rental)
    }

    pub async fn check_out(&self, rental_id: RentalId) -> Result<Rental> {
        let now = self.now();
        let mut tx = self.store.begin().await?;

        let mut rental = self
            .rentals
            .get_tx(&mut tx, &rental_id)
            .await?
            .ok_or_else(|| DeskError::RentalNotFound {
                id: rental_id.to_string(),
            })?;

        let settlement = rental.close(now)?;
        self.rentals.update_closed_tx(&mut tx, &rental).await?;

        let mut room = self
            .rooms
            .get_tx(&mut tx, &rental.room_id)
            .await?
            .ok_or_else(|| DeskError::RoomNotFound {
                id: rental.room_id.to_string(),
            })?;
        room.begin_cleaning(now)?;
        self.rooms
            .update_state_tx(&mut tx, &room.id, room.state, now)
            .await?;

        self.access.record_exit_tx(&mut tx, &rental.id, now).await?;

        tx.commit()
            .await
            .map_err(|e| DeskError::database("commit_check_out", e))?;

        info!(
            room = %room.number,
            rental = %rental.id,
            overtime_hours = settlement.overtime_hours,
            final_payment = %settlement.final_payment,
            "check-out completed, room in cleaning"
        );

        Ok(rental)
    }

    pub async fn mark_cleaning_complete(&self, room_id: RoomId) -> Result<Room> {
        let now = self.now();
        let mut tx = self.store.begin().await?;

        let mut room = self
            .rooms
            .get_tx(&mut tx, &room_id)
            .await?
            .ok_or_else(|| DeskError::RoomNotFound {
                id: room_id.to_string(),
            })?;
        room.finish_cleaning(now)?;
        self.rooms
            .update_state_tx(&mut tx, &room.id, room.state, now)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DeskError::database("commit_cleaning_complete", e))?;

        info!(room = %room.number, "cleaning complete, room available");
        Ok(room)
    }

    pub async fn set_maintenance(&self, room_id: RoomId) -> Result<Room> {
        self.administrative_transition(room_id, RoomState::Maintenance)
            .await
    }

    pub async fn clear_maintenance(&self, room_id: RoomId) -> Result<Room> {
        self.administrative_transition(room_id, RoomState::Available)
            .await
    }

    async fn administrative_transition(&self, room_id: RoomId, to: RoomState) -> Result<Room> {
        let now = self.now();
        let mut tx = self.store.begin().await?;

        let mut room = self
            .rooms
            .get_tx(&mut tx, &room_id)
            .await?
            .ok_or_else(|| DeskError::RoomNotFound {
                id: room_id.to_string(),
            })?;
        room.transition_to(to, now)?;
        self.rooms
            .update_state_tx(&mut tx, &room.id, room.state, now)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DeskError::database("commit_maintenance", e))?;

        info!(room = %room.number, state = %room.state, "maintenance flag updated");
        Ok(room)
    }

    // ---- lazy cleaning release ----

    /// Flip every room out of Cleaning whose most recent closed rental
    /// ended at least the configured delay ago. Idempotent; also invoked at
    /// the head of the read operations below.
    pub async fn release_expired_cleaning(&self) -> Result<Vec<RoomId>> {
        let now = self.now();
        let mut released = Vec::new();

        for room in self.rooms.list_in_state(RoomState::Cleaning).await? {
            // Never release on the strength of a rental still open.
            if self.rentals.active_for_room(&room.id).await?.is_some() {
                continue;
            }

            let last_closed = match self.rentals.latest_closed_for_room(&room.id).await? {
                Some(rental) => rental,
                None => continue,
            };
            let actual_exit = match last_closed.actual_exit_at {
                Some(exit) => exit,
                None => continue,
            };

            if !self.auto_release.is_due(actual_exit, now) {
                continue;
            }

            let mut tx = self.store.begin().await?;
            let mut current = match self.rooms.get_tx(&mut tx, &room.id).await? {
                Some(room) => room,
                None => continue,
            };
            if current.state != RoomState::Cleaning {
                continue;
            }

            current.finish_cleaning(now)?;
            self.rooms
                .update_state_tx(&mut tx, &current.id, current.state, now)
                .await?;
            tx.commit()
                .await
                .map_err(|e| DeskError::database("commit_auto_release", e))?;

            debug!(room = %current.number, "cleaning delay elapsed, room released");
            released.push(current.id);
        }

        Ok(released)
    }

    // ---- read operations ----

    pub async fn list_active_rentals(&self) -> Result<Vec<ActiveRentalView>> {
        self.release_expired_cleaning().await?;

        let now = self.now();
        let rentals = self.rentals.list_active().await?;

        let mut views = Vec::with_capacity(rentals.len());
        for rental in rentals {
            let room = self
                .rooms
                .get(&rental.room_id)
                .await?
                .ok_or_else(|| DeskError::RoomNotFound {
                    id: rental.room_id.to_string(),
                })?;

            views.push(ActiveRentalView {
                room_number: room.number,
                remaining_minutes: rental.remaining_against(now).num_minutes(),
                overtime_minutes: rental.overtime_against(now).num_minutes(),
                rental,
            });
        }

        Ok(views)
    }

    pub async fn live_board(&self) -> Result<Vec<RoomView>> {
        self.release_expired_cleaning().await?;

        let mut board = Vec::new();
        for room in self.rooms.list().await? {
            let active_rental = if room.state == RoomState::Occupied {
                self.rentals.active_for_room(&room.id).await?
            } else {
                None
            };
            board.push(RoomView {
                room,
                active_rental,
            });
        }

        Ok(board)
    }

    pub async fn daily_summary(&self, date: NaiveDate) -> Result<DailySummary> {
        self.release_expired_cleaning().await?;

        let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        let end = start + Duration::days(1);

        let rentals = self.rentals.opened_between(start, end).await?;
        let client_count = rentals.len() as u64;
        let total_initial_revenue = rentals
            .iter()
            .fold(Money::zero(), |acc, r| acc.add(r.initial_payment));
        let total_hours = rentals.iter().map(|r| u64::from(r.reserved_hours)).sum();

        let rooms = self.rooms.list().await?;
        let occupied_count = rooms
            .iter()
            .filter(|r| r.state == RoomState::Occupied)
            .count() as u64;
        let available_count = rooms
            .iter()
            .filter(|r| r.state == RoomState::Available)
            .count() as u64;

        Ok(DailySummary {
            date,
            client_count,
            total_initial_revenue,
            total_hours,
            occupied_count,
            available_count,
        })
    }

    pub async fn get_rental(&self, rental_id: RentalId) -> Result<Rental> {
        self.rentals
            .get(&rental_id)
            .await?
            .ok_or_else(|| DeskError::RentalNotFound {
                id: rental_id.to_string(),
            })
    }

    pub async fn access_record_for(&self, rental_id: RentalId) -> Result<Option<AccessRecord>> {
        self.access.get_by_rental(&rental_id).await
    }

    // ---- reservations ----

    pub async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> Result<Reservation> {
        let client_name = required_text("client_name", &request.client_name)?;
        let client_phone = required_text("client_phone", &request.client_phone)?;
        if request.hours == 0 {
            return Err(DeskError::validation("hours", "must be at least 1"));
        }

        let room = self
            .rooms
            .get(&request.room_id)
            .await?
            .ok_or_else(|| DeskError::RoomNotFound {
                id: request.room_id.to_string(),
            })?;

        let estimated_price = billing::quote(room.hourly_rate(&self.rates), request.hours);
        let reservation = Reservation::new(
            room.id,
            request.operator_id,
            client_name,
            client_phone,
            request.requested_at,
            request.hours,
            estimated_price,
            self.now(),
        );
        self.reservations.insert(&reservation).await?;

        info!(
            reservation = %reservation.id,
            room = %room.number,
            estimated_price = %reservation.estimated_price,
            "reservation created"
        );
        Ok(reservation)
    }

    pub async fn confirm_reservation(&self, id: ReservationId) -> Result<Reservation> {
        let mut reservation = self.get_reservation(id).await?;
        reservation.confirm(self.now())?;
        self.reservations.update_status(&reservation).await?;

        info!(reservation = %reservation.id, "reservation confirmed");
        Ok(reservation)
    }

    pub async fn cancel_reservation(&self, id: ReservationId) -> Result<Reservation> {
        let mut reservation = self.get_reservation(id).await?;
        reservation.cancel()?;
        self.reservations.update_status(&reservation).await?;

        info!(reservation = %reservation.id, "reservation cancelled");
        Ok(reservation)
    }

    /// Convert a confirmed reservation into a walk-in-equivalent rental.
    ///
    /// The room may have been taken since confirmation, so availability is
    /// re-checked inside the same transaction that claims it; on any
    /// failure the reservation is left exactly as it was.
    pub async fn convert_reservation(&self, id: ReservationId) -> Result<Rental> {
        let now = self.now();
        let mut tx = self.store.begin().await?;

        let mut reservation = self
            .reservations
            .get_tx(&mut tx, &id)
            .await?
            .ok_or_else(|| DeskError::ReservationNotFound { id: id.to_string() })?;

        if reservation.status != ReservationStatus::Confirmed {
            return Err(DeskError::InvalidStateTransition {
                entity: "reservation",
                from: reservation.status.to_string(),
                to: ReservationStatus::Completed.to_string(),
            });
        }

        let mut room = self
            .rooms
            .get_tx(&mut tx, &reservation.room_id)
            .await?
            .ok_or_else(|| DeskError::RoomNotFound {
                id: reservation.room_id.to_string(),
            })?;

        if !room.state.is_available() {
            return Err(DeskError::RoomUnavailable {
                number: room.number.to_string(),
                state: room.state.to_string(),
            });
        }

        let rate = room.hourly_rate(&self.rates);
        let rental = Rental::open(
            room.id,
            reservation.operator_id.clone(),
            reservation.client_name.clone(),
            reservation.requested_hours,
            rate,
            now,
        );
        room.occupy(now)?;
        reservation.complete()?;

        self.rentals.insert_tx(&mut tx, &rental).await?;

        let record = AccessRecord::on_foot(rental.id, now);
        self.access.insert_tx(&mut tx, &record).await?;

        self.rooms
            .update_state_tx(&mut tx, &room.id, room.state, now)
            .await?;
        self.reservations
            .update_status_tx(&mut tx, &reservation)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DeskError::database("commit_convert_reservation", e))?;

        info!(
            reservation = %reservation.id,
            rental = %rental.id,
            room = %room.number,
            "reservation converted to rental"
        );
        Ok(rental)
    }

    pub async fn list_reservations(
        &self,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>> {
        self.reservations.list(status).await
    }

    async fn get_reservation(&self, id: ReservationId) -> Result<Reservation> {
        self.reservations
            .get(&id)
            .await?
            .ok_or_else(|| DeskError::ReservationNotFound { id: id.to_string() })
    }
}

fn required_text(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeskError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
