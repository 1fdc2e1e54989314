//! Domain entities

mod reading;

pub use reading::{Measurements, Reading};
