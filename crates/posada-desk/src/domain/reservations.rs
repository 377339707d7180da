use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Money, OperatorId, ReservationId, ReservationStatus, RoomId};
use crate::error::{DeskError, Result};

/// A pre-booking against a room. Satellite record: it never holds the room
/// itself, so conversion re-checks room availability at conversion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub room_id: RoomId,
    pub operator_id: OperatorId,
    pub client_name: String,
    pub client_phone: String,
    pub requested_at: DateTime<Utc>,
    pub requested_hours: u32,
    pub estimated_price: Money,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Reservation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        room_id: RoomId,
        operator_id: OperatorId,
        client_name: String,
        client_phone: String,
        requested_at: DateTime<Utc>,
        requested_hours: u32,
        estimated_price: Money,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReservationId::new(),
            room_id,
            operator_id,
            client_name,
            client_phone,
            requested_at,
            requested_hours,
            estimated_price,
            status: ReservationStatus::Pending,
            created_at: now,
            confirmed_at: None,
        }
    }

    fn transition_to(&mut self, next: ReservationStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(DeskError::InvalidStateTransition {
                entity: "reservation",
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        self.status = next;
        Ok(())
    }

    /// Only a pending reservation can be confirmed.
    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(ReservationStatus::Confirmed)?;
        self.confirmed_at = Some(now);
        Ok(())
    }

    /// Legal unless already completed. Re-cancelling is a no-op.
    pub fn cancel(&mut self) -> Result<()> {
        self.transition_to(ReservationStatus::Cancelled)
    }

    /// Marks the reservation consumed by a rental. Only legal when
    /// confirmed; the caller is responsible for the room-availability
    /// check-then-act.
    pub fn complete(&mut self) -> Result<()> {
        self.transition_to(ReservationStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn reservation() -> Reservation {
        Reservation::new(
            RoomId::new(),
            OperatorId::new("op-1"),
            "M. Cliente".to_string(),
            "555-0134".to_string(),
            now() + Duration::hours(6),
            3,
            Money::from_decimal(dec!(300)),
            now(),
        )
    }

    #[test]
    fn test_confirm_then_complete() {
        let mut reservation = reservation();
        assert_eq!(reservation.status, ReservationStatus::Pending);

        reservation.confirm(now()).unwrap();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.confirmed_at, Some(now()));

        reservation.complete().unwrap();
        assert_eq!(reservation.status, ReservationStatus::Completed);
    }

    #[test]
    fn test_cannot_complete_unconfirmed() {
        let mut reservation = reservation();
        let err = reservation.complete().unwrap_err();
        assert!(matches!(err, DeskError::InvalidStateTransition { .. }));
        assert_eq!(reservation.status, ReservationStatus::Pending);
    }

    #[test]
    fn test_cancel_rules() {
        let mut reservation = reservation();
        reservation.cancel().unwrap();
        assert_eq!(reservation.status, ReservationStatus::Cancelled);

        // re-cancel is a no-op, not an error
        reservation.cancel().unwrap();

        let mut completed = self::reservation();
        completed.confirm(now()).unwrap();
        completed.complete().unwrap();
        assert!(completed.cancel().is_err());
    }

    #[test]
    fn test_cannot_confirm_twice() {
        let mut reservation = reservation();
        reservation.confirm(now()).unwrap();
        assert!(reservation.confirm(now()).is_err());
    }
}
