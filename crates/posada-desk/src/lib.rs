pub mod clock;
pub mod config;
pub mod desk;
pub mod domain;
pub mod error;
pub mod storage;

pub use config::DeskConfig;
pub use desk::FrontDesk;
pub use error::{DeskError, ErrorKind, Result};
