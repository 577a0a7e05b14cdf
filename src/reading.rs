use anyhow::{anyhow, Error, Result};
use std::fmt;
use std::str::FromStr;

/// Temperature readings for ten Colombian cities, in the `"<city>: <celsius>"`
/// wire format the demo feeds.
pub const CITY_TEMPERATURES: [&str; 10] = [
    "Bogotá: 16",
    "Medellín: 22",
    "Cali: 28",
    "Barranquilla: 30",
    "Cartagena: 32",
    "Bucaramanga: 18",
    "Pereira: 20",
    "Cúcuta: 19",
    "Santa Marta: 34",
    "Manizales: 17",
];

/// A single city temperature measurement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reading {
    pub city: String,
    pub celsius: i32,
}

impl Reading {
    pub fn new(city: impl Into<String>, celsius: i32) -> Self {
        Self {
            city: city.into(),
            celsius,
        }
    }
}

impl FromStr for Reading {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (city, celsius) = value
            .split_once(": ")
            .ok_or_else(|| anyhow!("reading {:?} is missing the ': ' separator", value))?;
        if city.is_empty() {
            return Err(anyhow!("reading {:?} has an empty city", value));
        }
        let celsius = celsius
            .parse::<i32>()
            .map_err(|err| anyhow!("reading {:?} has a bad temperature: {}", value, err))?;
        Ok(Self::new(city, celsius))
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.city, self.celsius)
    }
}

/// A reading annotated with an hour-of-day label, produced by the hourly
/// expansion step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedReading {
    pub reading: Reading,
    pub hour: &'static str,
}

impl fmt::Display for TimedReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.reading, self.hour)
    }
}

/// Parses the fixed dataset. A malformed literal is a defect, so the error
/// propagates all the way out.
pub fn city_readings() -> Result<Vec<Reading>> {
    CITY_TEMPERATURES.iter().map(|raw| raw.parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_city_and_temperature() {
        let reading: Reading = "Bogotá: 16".parse().unwrap();
        assert_eq!(reading, Reading::new("Bogotá", 16));
    }

    #[test]
    fn display_round_trips_the_wire_format() {
        let reading: Reading = "Santa Marta: 34".parse().unwrap();
        assert_eq!(reading.to_string(), "Santa Marta: 34");
    }

    #[test]
    fn rejects_missing_separator() {
        assert!("Bogotá 16".parse::<Reading>().is_err());
    }

    #[test]
    fn rejects_non_integer_temperature() {
        assert!("Bogotá: dieciséis".parse::<Reading>().is_err());
    }

    #[test]
    fn rejects_empty_city() {
        assert!(": 16".parse::<Reading>().is_err());
    }

    #[test]
    fn fixed_dataset_parses() {
        let readings = city_readings().unwrap();
        assert_eq!(readings.len(), 10);
        assert_eq!(readings[0], Reading::new("Bogotá", 16));
        assert_eq!(readings[9], Reading::new("Manizales", 17));
    }
}
