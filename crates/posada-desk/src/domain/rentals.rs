use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::billing::{self, Settlement};
use crate::domain::types::{Money, OperatorId, RentalId, RentalStatus, RoomId};
use crate::error::{DeskError, Result};

/// A timed stay against a single room. Sole source of truth for billing:
/// the hourly rate is snapshotted at open time and later room price changes
/// never reach an open rental.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
    pub id: RentalId,
    pub room_id: RoomId,
    pub operator_id: OperatorId,
    pub client_name: String,
    pub reserved_hours: u32,
    pub entered_at: DateTime<Utc>,
    pub expected_exit_at: DateTime<Utc>,
    pub actual_exit_at: Option<DateTime<Utc>>,
    pub hourly_rate: Money,
    pub initial_payment: Money,
    pub overtime_hours: u32,
    pub overtime_payment: Money,
    pub final_payment: Money,
    pub status: RentalStatus,
}

impl Rental {
    /// Open a rental: quote the reserved block and fix the expected exit.
    pub fn open(
        room_id: RoomId,
        operator_id: OperatorId,
        client_name: String,
        reserved_hours: u32,
        hourly_rate: Money,
        now: DateTime<Utc>,
    ) -> Self {
        let initial_payment = billing::quote(hourly_rate, reserved_hours);

        Self {
            id: RentalId::new(),
            room_id,
            operator_id,
            client_name,
            reserved_hours,
            entered_at: now,
            expected_exit_at: now + Duration::hours(i64::from(reserved_hours)),
            actual_exit_at: None,
            hourly_rate,
            initial_payment,
            overtime_hours: 0,
            overtime_payment: Money::zero(),
            final_payment: Money::zero(),
            status: RentalStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Close the rental at `now`, applying the overtime settlement.
    pub fn close(&mut self, now: DateTime<Utc>) -> Result<Settlement> {
        if !self.is_active() {
            return Err(DeskError::RentalAlreadyClosed {
                id: self.id.to_string(),
            });
        }

        let settlement = billing::settle(
            self.expected_exit_at,
            now,
            self.initial_payment,
            self.hourly_rate,
        );

        self.actual_exit_at = Some(now);
        self.overtime_hours = settlement.overtime_hours;
        self.overtime_payment = settlement.overtime_payment;
        self.final_payment = settlement.final_payment;
        self.status = RentalStatus::Closed;

        Ok(settlement)
    }

    /// Time left before the expected exit, zero once past it.
    pub fn remaining_against(&self, now: DateTime<Utc>) -> Duration {
        (self.expected_exit_at - now).max(Duration::zero())
    }

    /// Time past the expected exit, zero while still within the block.
    pub fn overtime_against(&self, now: DateTime<Utc>) -> Duration {
        (now - self.expected_exit_at).max(Duration::zero())
    }
}
