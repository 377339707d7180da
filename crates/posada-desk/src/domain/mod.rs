pub mod access;
pub mod auto_release;
pub mod billing;
pub mod rentals;
pub mod reservations;
pub mod rooms;
pub mod types;

pub use access::AccessRecord;
pub use rentals::Rental;
pub use reservations::Reservation;
pub use rooms::Room;
