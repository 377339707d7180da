use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posada_common::LicensePlate;

use crate::domain::types::{AccessRecordId, EntryMode, RentalId};

/// Entry metadata for a rental: how the client arrived, and the plate when
/// they arrived by vehicle. One per rental.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRecord {
    pub id: AccessRecordId,
    pub rental_id: RentalId,
    pub mode: EntryMode,
    pub plate: Option<LicensePlate>,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
}

impl AccessRecord {
    /// A plate is only meaningful for vehicle entries; for other modes it is
    /// discarded.
    pub fn new(
        rental_id: RentalId,
        mode: EntryMode,
        plate: Option<LicensePlate>,
        entered_at: DateTime<Utc>,
    ) -> Self {
        let plate = match mode {
            EntryMode::Vehicle => plate,
            EntryMode::OnFoot | EntryMode::CameraDetected => None,
        };

        Self {
            id: AccessRecordId::new(),
            rental_id,
            mode,
            plate,
            entered_at,
            exited_at: None,
        }
    }

    /// Reservation conversions carry no vehicle or camera data.
    pub fn on_foot(rental_id: RentalId, entered_at: DateTime<Utc>) -> Self {
        Self::new(rental_id, EntryMode::OnFoot, None, entered_at)
    }

    pub fn record_exit(&mut self, now: DateTime<Utc>) {
        self.exited_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_vehicle_entry_keeps_plate() {
        let plate = LicensePlate::new("abc-123").unwrap();
        let record = AccessRecord::new(RentalId::new(), EntryMode::Vehicle, Some(plate), now());
        assert_eq!(record.plate.as_ref().map(|p| p.as_str()), Some("ABC-123"));
    }

    #[test]
    fn test_plate_dropped_for_non_vehicle_modes() {
        let plate = LicensePlate::new("abc-123").unwrap();
        let record = AccessRecord::new(
            RentalId::new(),
            EntryMode::CameraDetected,
            Some(plate),
            now(),
        );
        assert!(record.plate.is_none());
    }

    #[test]
    fn test_exit_recorded_once_closed() {
        let mut record = AccessRecord::on_foot(RentalId::new(), now());
        assert!(record.exited_at.is_none());

        record.record_exit(now() + chrono::Duration::hours(2));
        assert!(record.exited_at.is_some());
    }
}
