//! Value Objects - Immutable, identity-less domain primitives

mod timezone;
mod wind_direction;

pub use timezone::Timezone;
pub use wind_direction::WindDirection;
