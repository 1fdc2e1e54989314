//! Wind direction value object
//!
//! Degrees clockwise from north as reported by the station. The station does
//! not guarantee the nominal 0-359 range, so values are stored as reported.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::WindDirection;
//!
//! let dir = WindDirection::new(225);
//! assert_eq!(dir.degrees(), 225);
//! assert_eq!(dir.arrow(), '↙');
//! assert_eq!(format!("{dir}"), "225°");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrow thresholds, checked in order; the first one exceeded wins
const ARROWS: [(u16, char); 8] = [
    (337, '↑'),
    (292, '↖'),
    (247, '←'),
    (202, '↙'),
    (157, '↓'),
    (112, '↘'),
    (67, '→'),
    (22, '↗'),
];

/// Wind direction in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindDirection(u16);

impl WindDirection {
    /// Create a wind direction from degrees
    #[must_use]
    pub const fn new(degrees: u16) -> Self {
        Self(degrees)
    }

    /// Get the raw degrees
    #[must_use]
    pub const fn degrees(self) -> u16 {
        self.0
    }

    /// Check if the value is inside the nominal 0-359 range
    #[must_use]
    pub const fn is_nominal(self) -> bool {
        self.0 < 360
    }

    /// Arrow glyph for compact display
    #[must_use]
    pub fn arrow(self) -> char {
        ARROWS
            .iter()
            .find(|(threshold, _)| self.0 > *threshold)
            .map_or('↑', |(_, arrow)| *arrow)
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl From<u16> for WindDirection {
    fn from(degrees: u16) -> Self {
        Self(degrees)
    }
}

impl From<WindDirection> for u16 {
    fn from(dir: WindDirection) -> Self {
        dir.0
    }
}
