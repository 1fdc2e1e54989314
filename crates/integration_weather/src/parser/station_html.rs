//! Station page scraper
//!
//! The department page renders every value as `label：value</div>`. All
//! labels are located in a single Aho-Corasick pass; for each field the first
//! occurrence followed by a well-formed value is used.

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use chrono::NaiveDateTime;
use domain::{Measurements, Timezone, WindDirection};
use tracing::debug;

use super::{observation, FeedParser};
use crate::{client::FeedError, models::Observation};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// `YYYY-MM-DD HH:MM:SS`
const TIMESTAMP_LEN: usize = 19;
const VALUE_TERMINATOR: &str = "</div>";

/// Fields scraped from the page, in label-pattern order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ObservedAt,
    Temperature,
    Pressure,
    Humidity,
    WindSpeed,
    WindDirection,
    RainPerHour,
    RainPerMinute,
    GroundTemperature,
}

impl Field {
    const ALL: [Self; 9] = [
        Self::ObservedAt,
        Self::Temperature,
        Self::Pressure,
        Self::Humidity,
        Self::WindSpeed,
        Self::WindDirection,
        Self::RainPerHour,
        Self::RainPerMinute,
        Self::GroundTemperature,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::ObservedAt => "資料擷取時間：",
            Self::Temperature => "氣溫(℃)：",
            Self::Pressure => "海平面氣壓(hPa)：",
            Self::Humidity => "相對溼度(％)：",
            Self::WindSpeed => "風速(推移十分鐘平均)(m/s)：",
            Self::WindDirection => "風向(推移十分鐘平均)(方位)：",
            Self::RainPerHour => "小時累積降雨量(mm)：",
            Self::RainPerMinute => "分鐘降雨量(mm)：",
            Self::GroundTemperature => "0cm地溫(℃)：",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::ObservedAt => "date",
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::Humidity => "humidity",
            Self::WindSpeed => "wind_speed",
            Self::WindDirection => "wind_direction",
            Self::RainPerHour => "rain_per_hour",
            Self::RainPerMinute => "rain_per_minute",
            Self::GroundTemperature => "ground_temperature",
        }
    }

    /// Extract this field's value text directly following a label match
    fn value_after(self, rest: &str) -> Option<&str> {
        let rest = rest.trim_start();
        if self == Self::ObservedAt {
            let candidate = rest.get(..TIMESTAMP_LEN)?;
            return is_timestamp_shaped(candidate).then_some(candidate);
        }

        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        rest[end..]
            .trim_start()
            .starts_with(VALUE_TERMINATOR)
            .then(|| &rest[..end])
    }
}

/// `dddd-dd-dd dd:dd:dd`
fn is_timestamp_shaped(s: &str) -> bool {
    s.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        10 => b == b' ',
        13 | 16 => b == b':',
        _ => b.is_ascii_digit(),
    })
}

/// Pre-compiled label matcher; pattern IDs follow `Field::ALL`
static LABEL_MATCHER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    let labels: Vec<&str> = Field::ALL.iter().map(|f| f.label()).collect();
    #[allow(clippy::expect_used)] // Infallible with valid static patterns
    AhoCorasick::new(labels).expect("Failed to build label matcher")
});

/// Parser for the department station HTML page
#[derive(Debug, Clone, Copy)]
pub struct StationHtmlParser {
    timezone: Timezone,
}

impl StationHtmlParser {
    /// The page timestamp is naive local time in `timezone`
    #[must_use]
    pub const fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }

    /// First well-formed value text for every field, indexed like `Field::ALL`
    fn locate(raw: &str) -> [Option<&str>; 9] {
        let mut found: [Option<&str>; 9] = [None; 9];
        for m in LABEL_MATCHER.find_overlapping_iter(raw) {
            let index = m.pattern().as_usize();
            if found[index].is_some() {
                continue;
            }
            found[index] = Field::ALL[index].value_after(&raw[m.end()..]);
        }
        found
    }
}

impl FeedParser for StationHtmlParser {
    fn parse(&self, raw: &str) -> Result<Observation, FeedError> {
        if raw.trim().is_empty() {
            return Err(FeedError::parse("empty response body", raw));
        }

        let found = Self::locate(raw);
        let text = |field: Field| {
            found[field as usize]
                .ok_or_else(|| FeedError::parse(format!("missing {}", field.name()), raw))
        };
        let float = |field: Field| {
            let value = text(field)?;
            value
                .parse::<f64>()
                .map_err(|_| FeedError::parse(format!("invalid {}: {value}", field.name()), raw))
        };

        let stamp = text(Field::ObservedAt)?;
        let naive = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|e| FeedError::parse(format!("invalid date {stamp}: {e}"), raw))?;
        let observed_at = self
            .timezone
            .localize(naive)
            .map_err(|e| FeedError::parse(e.to_string(), raw))?;

        let direction = text(Field::WindDirection)?;
        let wind_direction = direction.parse::<u16>().map_err(|_| {
            FeedError::parse(format!("invalid wind_direction: {direction}"), raw)
        })?;

        let measurements = Measurements {
            temperature: float(Field::Temperature)?,
            pressure: float(Field::Pressure)?,
            humidity: float(Field::Humidity)?,
            wind_speed: float(Field::WindSpeed)?,
            wind_direction: WindDirection::new(wind_direction),
            rain_per_hour: float(Field::RainPerHour)?,
            rain_per_minute: float(Field::RainPerMinute)?,
            ground_temperature: float(Field::GroundTemperature)?,
        };

        debug!(observed_at = %observed_at, "Parsed station page");
        observation(observed_at, measurements, None, raw)
    }
}
