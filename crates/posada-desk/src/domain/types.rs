use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Raised when a persisted enum value no longer matches the closed set.
#[derive(Debug, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Room identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(Uuid);

impl RoomId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Rental identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RentalId(Uuid);

impl RentalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RentalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RentalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RentalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Reservation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReservationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Access record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRecordId(Uuid);

impl AccessRecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccessRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccessRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operator identifier (the receptionist on shift, from the auth collaborator)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorId(String);

impl OperatorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monetary amount, kept at 2 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn from_decimal(amount: Decimal) -> Self {
        Self(amount.round_dp(2))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn add(&self, other: Money) -> Self {
        Self::from_decimal(self.0 + other.0)
    }

    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::from_decimal(self.0 * factor)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_decimal(Decimal::from_str(s)?))
    }
}

/// Room categories with distinct hourly pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Normal,
    Jacuzzi,
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomType::Normal => write!(f, "normal"),
            RoomType::Jacuzzi => write!(f, "jacuzzi"),
        }
    }
}

impl FromStr for RoomType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(RoomType::Normal),
            "jacuzzi" => Ok(RoomType::Jacuzzi),
            other => Err(ParseEnumError::new("room type", other)),
        }
    }
}

/// Room lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomState {
    Available,
    Occupied,
    Cleaning,
    Maintenance,
}

impl RoomState {
    pub fn is_available(&self) -> bool {
        matches!(self, RoomState::Available)
    }

    /// The machine cycles indefinitely; no state is terminal. Maintenance is
    /// reachable from every non-maintenance state and always returns to
    /// Available.
    pub fn can_transition_to(&self, next: RoomState) -> bool {
        matches!(
            (self, next),
            (RoomState::Available, RoomState::Occupied)
                | (RoomState::Occupied, RoomState::Cleaning)
                | (RoomState::Cleaning, RoomState::Available)
                | (RoomState::Available, RoomState::Maintenance)
                | (RoomState::Occupied, RoomState::Maintenance)
                | (RoomState::Cleaning, RoomState::Maintenance)
                | (RoomState::Maintenance, RoomState::Available)
        )
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomState::Available => write!(f, "available"),
            RoomState::Occupied => write!(f, "occupied"),
            RoomState::Cleaning => write!(f, "cleaning"),
            RoomState::Maintenance => write!(f, "maintenance"),
        }
    }
}

impl FromStr for RoomState {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(RoomState::Available),
            "occupied" => Ok(RoomState::Occupied),
            "cleaning" => Ok(RoomState::Cleaning),
            "maintenance" => Ok(RoomState::Maintenance),
            other => Err(ParseEnumError::new("room state", other)),
        }
    }
}

/// Rental lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    Active,
    Closed,
}

impl RentalStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, RentalStatus::Active)
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RentalStatus::Active => write!(f, "active"),
            RentalStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for RentalStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RentalStatus::Active),
            "closed" => Ok(RentalStatus::Closed),
            other => Err(ParseEnumError::new("rental status", other)),
        }
    }
}

/// How the client entered the premises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    OnFoot,
    Vehicle,
    CameraDetected,
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryMode::OnFoot => write!(f, "on_foot"),
            EntryMode::Vehicle => write!(f, "vehicle"),
            EntryMode::CameraDetected => write!(f, "camera_detected"),
        }
    }
}

impl FromStr for EntryMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_foot" => Ok(EntryMode::OnFoot),
            "vehicle" => Ok(EntryMode::Vehicle),
            "camera_detected" => Ok(EntryMode::CameraDetected),
            other => Err(ParseEnumError::new("entry mode", other)),
        }
    }
}

/// Reservation lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    /// Cancelling an already-cancelled reservation is a no-op transition;
    /// only Completed refuses further movement.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Pending, ReservationStatus::Confirmed)
                | (ReservationStatus::Pending, ReservationStatus::Cancelled)
                | (ReservationStatus::Confirmed, ReservationStatus::Completed)
                | (ReservationStatus::Confirmed, ReservationStatus::Cancelled)
                | (ReservationStatus::Cancelled, ReservationStatus::Cancelled)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Confirmed => write!(f, "confirmed"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
            ReservationStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "completed" => Ok(ReservationStatus::Completed),
            other => Err(ParseEnumError::new("reservation status", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_to_cents() {
        let amount = Money::from_decimal(dec!(10.006));
        assert_eq!(amount.as_decimal(), dec!(10.01));

        let sum = Money::from_decimal(dec!(100.50)).add(Money::from_decimal(dec!(49.50)));
        assert_eq!(sum.as_decimal(), dec!(150.00));
    }

    #[test]
    fn test_room_state_transitions() {
        assert!(RoomState::Available.can_transition_to(RoomState::Occupied));
        assert!(RoomState::Occupied.can_transition_to(RoomState::Cleaning));
        assert!(RoomState::Cleaning.can_transition_to(RoomState::Available));
        assert!(!RoomState::Available.can_transition_to(RoomState::Cleaning));
        assert!(!RoomState::Cleaning.can_transition_to(RoomState::Occupied));
        assert!(!RoomState::Occupied.can_transition_to(RoomState::Available));
        assert!(RoomState::Cleaning.can_transition_to(RoomState::Maintenance));
        assert!(RoomState::Maintenance.can_transition_to(RoomState::Available));
    }

    #[test]
    fn test_reservation_status_transitions() {
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Confirmed));
        assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Completed));
        assert!(ReservationStatus::Cancelled.can_transition_to(ReservationStatus::Cancelled));
        assert!(!ReservationStatus::Pending.can_transition_to(ReservationStatus::Completed));
        assert!(!ReservationStatus::Completed.can_transition_to(ReservationStatus::Cancelled));
    }

    #[test]
    fn test_enum_wire_format_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&RoomState::Cleaning).unwrap(),
            "\"cleaning\""
        );
        assert_eq!(
            serde_json::to_string(&EntryMode::CameraDetected).unwrap(),
            "\"camera_detected\""
        );
        assert_eq!(
            serde_json::from_str::<ReservationStatus>("\"confirmed\"").unwrap(),
            ReservationStatus::Confirmed
        );
    }

    #[test]
    fn test_enum_display_round_trip() {
        for state in [
            RoomState::Available,
            RoomState::Occupied,
            RoomState::Cleaning,
            RoomState::Maintenance,
        ] {
            assert_eq!(state.to_string().parse::<RoomState>().unwrap(), state);
        }

        for mode in [EntryMode::OnFoot, EntryMode::Vehicle, EntryMode::CameraDetected] {
            assert_eq!(mode.to_string().parse::<EntryMode>().unwrap(), mode);
        }

        assert!("checked_in".parse::<RoomState>().is_err());
    }
}
