use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderPreference {
    Any,
    Female,
    Male,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingPreference {
    Any,
    AtLeastFour,
    AtLeastFourAndHalf,
}

impl RatingPreference {
    pub fn minimum(&self) -> Option<f64> {
        match self {
            Self::Any => None,
            Self::AtLeastFour => Some(4.0),
            Self::AtLeastFourAndHalf => Some(4.5),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPreference {
    Any,
    Card,
    Cash,
    Pix,
}

/// Request filters a driver picks on the home screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverPreferences {
    pub passenger_gender: GenderPreference,
    pub min_rating: RatingPreference,
    pub accept_scheduled: bool,
    pub payment: PaymentPreference,
    pub min_distance_km: f64,
    pub max_distance_km: Option<f64>,
    pub accept_silent: bool,
}

impl Default for DriverPreferences {
    fn default() -> Self {
        Self {
            passenger_gender: GenderPreference::Any,
            min_rating: RatingPreference::Any,
            accept_scheduled: true,
            payment: PaymentPreference::Any,
            min_distance_km: 0.0,
            max_distance_km: None,
            accept_silent: true,
        }
    }
}

impl DriverPreferences {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.min_distance_km.is_finite() || self.min_distance_km < 0.0 {
            return Err(Error::invalid_input_error());
        }

        match self.max_distance_km {
            Some(max) if !max.is_finite() || max < self.min_distance_km => {
                Err(Error::invalid_input_error())
            }
            _ => Ok(()),
        }
    }
}
