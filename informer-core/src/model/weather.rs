/// Weather at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
    /// Meteorological degrees: where the wind blows from, 0 = north.
    pub wind_degree: u16,
    pub condition: String,
}

impl WeatherSnapshot {
    pub fn to_human_readable(&self) -> String {
        format!(
            "{:.1}°C, wind {:.1} m/s from the {}, {}",
            self.temperature_c,
            self.wind_speed_mps,
            wind_direction(self.wind_degree),
            self.condition
        )
    }
}

/// Weather yesterday at this time, now, and expected tomorrow at this time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub provider: String,
    pub location_name: String,
    pub yesterday: Option<WeatherSnapshot>,
    pub now: WeatherSnapshot,
    pub tomorrow: Option<WeatherSnapshot>,
}

impl WeatherReport {
    pub fn to_human_readable(&self) -> String {
        let describe = |snapshot: &Option<WeatherSnapshot>| match snapshot {
            Some(s) => s.to_human_readable(),
            None => format!("no data from {}", self.provider),
        };

        format!(
            "Weather in {}\nYesterday at this time: {}\nNow: {}\nTomorrow expected: {}",
            self.location_name,
            describe(&self.yesterday),
            self.now.to_human_readable(),
            describe(&self.tomorrow),
        )
    }
}

/// Eight-point compass name for a wind bearing.
pub fn wind_direction(degree: u16) -> &'static str {
    const POINTS: [&str; 8] = [
        "north",
        "north-east",
        "east",
        "south-east",
        "south",
        "south-west",
        "west",
        "north-west",
    ];
    let sector = ((u32::from(degree) % 360) * 2 + 45) / 90 % 8;
    POINTS[sector as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(temp: f64, degree: u16) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: temp,
            wind_speed_mps: 3.0,
            wind_degree: degree,
            condition: "light snow".to_string(),
        }
    }

    #[test]
    fn compass_sectors() {
        assert_eq!(wind_direction(0), "north");
        assert_eq!(wind_direction(22), "north");
        assert_eq!(wind_direction(23), "north-east");
        assert_eq!(wind_direction(180), "south");
        assert_eq!(wind_direction(300), "north-west");
        assert_eq!(wind_direction(350), "north");
        assert_eq!(wind_direction(360), "north");
    }

    #[test]
    fn report_marks_missing_days() {
        let report = WeatherReport {
            provider: "openweather".to_string(),
            location_name: "Moscow, RU".to_string(),
            yesterday: None,
            now: snapshot(-3.04, 270),
            tomorrow: Some(snapshot(-5.0, 90)),
        };

        let text = report.to_human_readable();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Weather in Moscow, RU");
        assert_eq!(lines[1], "Yesterday at this time: no data from openweather");
        assert_eq!(lines[2], "Now: -3.0°C, wind 3.0 m/s from the west, light snow");
        assert!(lines[3].starts_with("Tomorrow expected: -5.0°C"));
    }
}
