//! Terminal formatting of readings

use domain::Reading;

/// Heading printed above current conditions
pub const HEADING: &str = "Weather for National Taiwan University, Taiwan";

/// Observation time as `YYYY-MM-DD HH:MM+hh:mm`
#[must_use]
pub fn observation_time(reading: &Reading) -> String {
    reading.observed_at.format("%Y-%m-%d %H:%M%:z").to_string()
}

/// Multi-line summary of current conditions
#[must_use]
pub fn format_current(reading: &Reading) -> String {
    let m = &reading.measurements;
    [
        HEADING.to_string(),
        format!(
            "Currently {:.1} °C (Ground {} °C)",
            m.temperature, m.ground_temperature
        ),
        format!("Humidity {:.0} % | {:.1} hPa", m.humidity, m.pressure),
        format!("{} {} m/s", m.wind_direction.arrow(), m.wind_speed),
        format!(
            "Precipitation {} mm | {} mm/h",
            m.rain_per_minute, m.rain_per_hour
        ),
        format!("{} @ {}", observation_time(reading), reading.provider_name),
    ]
    .join("\n")
}

/// One line of the daily report; placeholders show `--`
#[must_use]
pub fn format_slot(reading: &Reading) -> String {
    let time = observation_time(reading);
    if !reading.is_valid() {
        return format!("{time}  --");
    }
    let m = &reading.measurements;
    format!(
        "{time}  {:>5.1} °C  {:>3.0} %  {:>6.1} hPa  {} {} m/s  {} mm/h",
        m.temperature,
        m.humidity,
        m.pressure,
        m.wind_direction.arrow(),
        m.wind_speed,
        m.rain_per_hour
    )
}

/// Daily report, one slot per line
#[must_use]
pub fn format_report(report: &[Reading]) -> String {
    report.iter().map(format_slot).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use domain::{Measurements, WindDirection};

    use super::*;

    fn reading() -> Reading {
        let at = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2020, 6, 1, 14, 30, 45)
            .unwrap();
        let measurements = Measurements {
            temperature: 31.26,
            pressure: 1008.14,
            humidity: 66.6,
            wind_speed: 2.4,
            wind_direction: WindDirection::new(100),
            rain_per_hour: 1.5,
            rain_per_minute: 0.2,
            ground_temperature: 35.0,
        };
        Reading::new(at, measurements).unwrap().with_provider("Rooftop")
    }

    #[test]
    fn current_summary() {
        let text = format_current(&reading());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], HEADING);
        assert_eq!(lines[1], "Currently 31.3 °C (Ground 35 °C)");
        assert_eq!(lines[2], "Humidity 67 % | 1008.1 hPa");
        assert_eq!(lines[3], "→ 2.4 m/s");
        assert_eq!(lines[4], "Precipitation 0.2 mm | 1.5 mm/h");
        assert_eq!(lines[5], "2020-06-01 14:30+08:00 @ Rooftop");
    }

    #[test]
    fn placeholder_slot_is_dashes() {
        let placeholder = Reading::placeholder(reading().observed_at);
        assert_eq!(format_slot(&placeholder), "2020-06-01 14:30+08:00  --");
    }

    #[test]
    fn report_has_one_line_per_slot() {
        let valid = reading();
        let report = vec![Reading::placeholder(valid.observed_at), valid];

        let text = format_report(&report);

        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains(" 31.3 °C"));
        assert!(text.lines().nth(1).unwrap().ends_with("1.5 mm/h"));
    }
}
