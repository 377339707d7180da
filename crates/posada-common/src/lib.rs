//! Shared foundation for Posada components: validated identifier types and
//! unified logging initialization.

pub mod logging;
pub mod types;

pub use types::{LicensePlate, LicensePlateError, RoomNumber, RoomNumberError};
