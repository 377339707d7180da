use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posada_common::RoomNumber;

use crate::domain::billing::RateCard;
use crate::domain::types::{Money, RoomId, RoomState, RoomType};
use crate::error::{DeskError, Result};

/// A rentable room in the catalog. State is mutated only through the
/// lifecycle transitions; rooms are never deleted in normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub number: RoomNumber,
    pub room_type: RoomType,
    pub state: RoomState,
    /// Per-room price override; when absent the type rate from the
    /// [`RateCard`] applies.
    pub base_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(
        number: RoomNumber,
        room_type: RoomType,
        base_price: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RoomId::new(),
            number,
            room_type,
            state: RoomState::Available,
            base_price,
            created_at: now,
            updated_at: now,
        }
    }

    /// The rate a new rental of this room is quoted at: the room's own
    /// price when set, the type rate otherwise.
    pub fn hourly_rate(&self, rates: &RateCard) -> Money {
        match self.base_price {
            Some(price) => Money::from_decimal(price),
            None => rates.rate_for(self.room_type),
        }
    }

    pub fn transition_to(&mut self, next: RoomState, now: DateTime<Utc>) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(DeskError::InvalidStateTransition {
                entity: "room",
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }

        self.state = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn occupy(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(RoomState::Occupied, now)
    }

    pub fn begin_cleaning(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(RoomState::Cleaning, now)
    }

    pub fn finish_cleaning(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(RoomState::Available, now)
    }

    pub fn set_maintenance(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(RoomState::Maintenance, now)
    }

    pub fn clear_maintenance(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(RoomState::Available, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn room(room_type: RoomType, base_price: Option<Decimal>) -> Room {
        Room::new(RoomNumber::new("H01").unwrap(), room_type, base_price, now())
    }

    #[test]
    fn test_full_lifecycle_cycle() {
        let mut room = room(RoomType::Normal, None);
        assert_eq!(room.state, RoomState::Available);

        room.occupy(now()).unwrap();
        assert_eq!(room.state, RoomState::Occupied);

        room.begin_cleaning(now()).unwrap();
        assert_eq!(room.state, RoomState::Cleaning);

        room.finish_cleaning(now()).unwrap();
        assert_eq!(room.state, RoomState::Available);

        // and around again
        room.occupy(now()).unwrap();
        assert_eq!(room.state, RoomState::Occupied);
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let mut room = room(RoomType::Normal, None);

        let err = room.begin_cleaning(now()).unwrap_err();
        assert!(matches!(err, DeskError::InvalidStateTransition { .. }));
        assert_eq!(room.state, RoomState::Available);

        room.occupy(now()).unwrap();
        assert!(room.occupy(now()).is_err());
        assert!(room.finish_cleaning(now()).is_err());
    }

    #[test]
    fn test_maintenance_flag() {
        let mut room = room(RoomType::Jacuzzi, None);
        room.set_maintenance(now()).unwrap();
        assert_eq!(room.state, RoomState::Maintenance);

        assert!(room.occupy(now()).is_err());

        room.clear_maintenance(now()).unwrap();
        assert_eq!(room.state, RoomState::Available);
    }

    #[test]
    fn test_hourly_rate_prefers_room_override() {
        let rates = RateCard {
            normal_hourly: dec!(100),
            jacuzzi_hourly: dec!(150),
        };

        assert_eq!(
            room(RoomType::Jacuzzi, None).hourly_rate(&rates).as_decimal(),
            dec!(150)
        );
        assert_eq!(
            room(RoomType::Normal, Some(dec!(120)))
                .hourly_rate(&rates)
                .as_decimal(),
            dec!(120)
        );
    }
}
