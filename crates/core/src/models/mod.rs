//! Data models for Seatplan

mod hall;
mod person;
mod table;

pub use hall::*;
pub use person::*;
pub use table::*;
