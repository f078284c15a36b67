//! Dynamic fare calculation.
//!
//! `fare = BASE_FARE + distance_km * PER_KM_RATE * band multiplier`, where the
//! band is picked from the local hour of the day.

use std::fmt;

use chrono::{Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const BASE_FARE: f64 = 10.0;

pub const PER_KM_RATE: f64 = 3.5;

pub const CURRENCY_PREFIX: &str = "R$";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBand {
    Rush,
    Night,
    Day,
}

impl TimeBand {
    /// Rush is [7,9) and [17,20); night is [20,24) and [0,6).
    pub fn from_hour(hour: u32) -> Result<Self, Error> {
        match hour {
            7..=8 | 17..=19 => Ok(Self::Rush),
            20..=23 | 0..=5 => Ok(Self::Night),
            6 | 9..=16 => Ok(Self::Day),
            _ => Err(Error::invalid_input_error()),
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Rush => 1.2,
            Self::Night => 1.4,
            Self::Day => 1.0,
        }
    }

    pub fn per_km_rate(&self) -> f64 {
        PER_KM_RATE * self.multiplier()
    }

    pub fn label(&self) -> String {
        match self {
            Self::Rush => "rush hour (+20%)".into(),
            Self::Night => "night (+40%)".into(),
            Self::Day => "day".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    pub amount: f64,
    pub band: TimeBand,
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", CURRENCY_PREFIX, self.amount)
    }
}

pub fn price(distance_km: f64, hour: u32) -> Result<Fare, Error> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(Error::invalid_distance_error());
    }

    let band = TimeBand::from_hour(hour)?;
    let total = BASE_FARE + distance_km * band.per_km_rate();

    Ok(Fare {
        amount: (total * 100.0).round() / 100.0,
        band,
    })
}

/// Source of the hour used for pricing.
pub trait Clock: Send + Sync {
    fn hour(&self) -> u32;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour(&self) -> u32 {
        Local::now().hour()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn hour(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_examples_format_with_currency_prefix() {
        assert_eq!(price(3.5, 8).unwrap().to_string(), "R$ 24.70");
        assert_eq!(price(3.5, 22).unwrap().to_string(), "R$ 27.15");
        assert_eq!(price(3.5, 13).unwrap().to_string(), "R$ 22.25");
    }

    #[test]
    fn bands_cover_every_hour() {
        let rush = [7, 8, 17, 18, 19];
        let night = [20, 21, 22, 23, 0, 1, 2, 3, 4, 5];

        for hour in 0..24 {
            let band = TimeBand::from_hour(hour).unwrap();
            let expected = if rush.contains(&hour) {
                TimeBand::Rush
            } else if night.contains(&hour) {
                TimeBand::Night
            } else {
                TimeBand::Day
            };
            assert_eq!(band, expected, "hour {}", hour);
        }

        assert!(TimeBand::from_hour(24).is_err());
    }

    #[test]
    fn per_km_rates() {
        assert!((TimeBand::Day.per_km_rate() - 3.5).abs() < 1e-9);
        assert!((TimeBand::Rush.per_km_rate() - 4.2).abs() < 1e-9);
        assert!((TimeBand::Night.per_km_rate() - 4.9).abs() < 1e-9);
    }

    #[test]
    fn fare_matches_formula_for_each_band() {
        for (hour, rate) in [(13, 3.5), (8, 4.2), (22, 4.9)] {
            for step in 0..200 {
                let distance = step as f64 * 0.37;
                let expected = ((10.0 + distance * rate) * 100.0_f64).round() / 100.0;
                let fare = price(distance, hour).unwrap();

                assert!(
                    (fare.amount - expected).abs() < 0.011,
                    "distance {} hour {}: {} != {}",
                    distance,
                    hour,
                    fare.amount,
                    expected
                );
            }
        }
    }

    #[test]
    fn fare_is_monotonic_in_distance() {
        for hour in 0..24 {
            let mut previous = price(0.0, hour).unwrap().amount;
            for step in 1..500 {
                let current = price(step as f64 * 0.1, hour).unwrap().amount;
                assert!(current >= previous);
                previous = current;
            }
        }
    }

    #[test]
    fn zero_distance_costs_the_base_fare() {
        assert_eq!(price(0.0, 3).unwrap().amount, BASE_FARE);
    }

    #[test]
    fn negative_and_non_finite_distances_are_rejected() {
        for distance in [-0.01, f64::NAN, f64::INFINITY] {
            let err = price(distance, 12).unwrap_err();
            assert_eq!(err, Error::invalid_distance_error());
        }
    }
}
