//! Pure billing computations: the check-in quote and the check-out
//! settlement. No storage access and no hidden clock; everything is a
//! function of its arguments.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Money, RoomType};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Hourly prices by room type. A room carrying its own base price overrides
/// this lookup (see [`crate::domain::rooms::Room::hourly_rate`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    pub normal_hourly: Decimal,
    pub jacuzzi_hourly: Decimal,
}

impl RateCard {
    pub fn rate_for(&self, room_type: RoomType) -> Money {
        match room_type {
            RoomType::Normal => Money::from_decimal(self.normal_hourly),
            RoomType::Jacuzzi => Money::from_decimal(self.jacuzzi_hourly),
        }
    }
}

/// The up-front payment for a reserved block of hours.
pub fn quote(hourly_rate: Money, reserved_hours: u32) -> Money {
    hourly_rate.multiply(Decimal::from(reserved_hours))
}

/// Outcome of closing a rental.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub overtime_hours: u32,
    pub overtime_payment: Money,
    pub final_payment: Money,
}

/// Compute the final settlement for a rental.
///
/// Overtime is billed in whole-hour increments rounded up: any fraction of
/// an hour past the expected exit is charged as a full hour at the rate
/// snapshotted when the rental was opened. Leaving at or before the
/// expected exit bills nothing extra.
pub fn settle(
    expected_exit: DateTime<Utc>,
    actual_exit: DateTime<Utc>,
    initial_payment: Money,
    hourly_rate: Money,
) -> Settlement {
    let overtime_ms = (actual_exit - expected_exit).num_milliseconds();

    if overtime_ms <= 0 {
        return Settlement {
            overtime_hours: 0,
            overtime_payment: Money::zero(),
            final_payment: initial_payment,
        };
    }

    let overtime_hours = ((overtime_ms + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR) as u32;
    let overtime_payment = hourly_rate.multiply(Decimal::from(overtime_hours));

    Settlement {
        overtime_hours,
        overtime_payment,
        final_payment: initial_payment.add(overtime_payment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn rate(amount: Decimal) -> Money {
        Money::from_decimal(amount)
    }

    fn expected_exit() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_quote_multiplies_rate_by_hours() {
        assert_eq!(quote(rate(dec!(150)), 2).as_decimal(), dec!(300));
        assert_eq!(quote(rate(dec!(100)), 1).as_decimal(), dec!(100));
    }

    #[test]
    fn test_on_time_exit_bills_nothing_extra() {
        let settlement = settle(
            expected_exit(),
            expected_exit(),
            rate(dec!(300)),
            rate(dec!(150)),
        );
        assert_eq!(settlement.overtime_hours, 0);
        assert_eq!(settlement.overtime_payment, Money::zero());
        assert_eq!(settlement.final_payment.as_decimal(), dec!(300));
    }

    #[test]
    fn test_early_exit_bills_nothing_extra() {
        let settlement = settle(
            expected_exit(),
            expected_exit() - Duration::minutes(30),
            rate(dec!(300)),
            rate(dec!(150)),
        );
        assert_eq!(settlement.overtime_hours, 0);
        assert_eq!(settlement.final_payment.as_decimal(), dec!(300));
    }

    #[test]
    fn test_one_second_over_bills_a_full_hour() {
        let settlement = settle(
            expected_exit(),
            expected_exit() + Duration::seconds(1),
            rate(dec!(300)),
            rate(dec!(150)),
        );
        assert_eq!(settlement.overtime_hours, 1);
        assert_eq!(settlement.overtime_payment.as_decimal(), dec!(150));
        assert_eq!(settlement.final_payment.as_decimal(), dec!(450));
    }

    #[test]
    fn test_forty_five_minutes_over_bills_one_hour() {
        // $150/hr for 2 hours, 45 minutes late: ceil(0.75) = 1 extra hour
        let settlement = settle(
            expected_exit(),
            expected_exit() + Duration::minutes(45),
            rate(dec!(300)),
            rate(dec!(150)),
        );
        assert_eq!(settlement.overtime_hours, 1);
        assert_eq!(settlement.overtime_payment.as_decimal(), dec!(150));
        assert_eq!(settlement.final_payment.as_decimal(), dec!(450));
    }

    #[test]
    fn test_exact_hours_over_are_not_rounded_up_further() {
        let settlement = settle(
            expected_exit(),
            expected_exit() + Duration::hours(2),
            rate(dec!(200)),
            rate(dec!(100)),
        );
        assert_eq!(settlement.overtime_hours, 2);
        assert_eq!(settlement.overtime_payment.as_decimal(), dec!(200));
        assert_eq!(settlement.final_payment.as_decimal(), dec!(400));
    }

    #[test]
    fn test_fraction_past_whole_hours_rounds_up() {
        let settlement = settle(
            expected_exit(),
            expected_exit() + Duration::hours(2) + Duration::seconds(1),
            rate(dec!(200)),
            rate(dec!(100)),
        );
        assert_eq!(settlement.overtime_hours, 3);
        assert_eq!(settlement.final_payment.as_decimal(), dec!(500));
    }

    #[test]
    fn test_rate_card_lookup() {
        let card = RateCard {
            normal_hourly: dec!(100),
            jacuzzi_hourly: dec!(150),
        };
        assert_eq!(card.rate_for(RoomType::Normal).as_decimal(), dec!(100));
        assert_eq!(card.rate_for(RoomType::Jacuzzi).as_decimal(), dec!(150));
    }
}
