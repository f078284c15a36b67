use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Passenger,
    Driver,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub color: String,
    pub plate: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub birthdate: Option<NaiveDate>,
    pub address: String,
    pub rating: Option<f64>,
    pub total_rides: u32,
    pub license: Option<String>,
    pub vehicle: Option<Vehicle>,
    pub verified: bool,
}

impl Profile {
    pub fn new(role: Role, name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            name,
            email,
            phone: "".into(),
            cpf: "".into(),
            birthdate: None,
            address: "".into(),
            rating: None,
            total_rides: 0,
            license: None,
            vehicle: None,
            verified: false,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() || !self.email.contains('@') {
            return Err(Error::invalid_input_error());
        }

        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(Error::invalid_input_error());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profiles_are_valid_and_unverified() {
        let profile = Profile::new(Role::Driver, "Carlos Oliveira".into(), "carlos@email.com".into());

        assert!(profile.validate().is_ok());
        assert!(!profile.verified);
        assert_eq!(profile.total_rides, 0);
    }

    #[test]
    fn blank_names_bad_emails_and_out_of_range_ratings_are_rejected() {
        let profile = Profile::new(Role::Passenger, " ".into(), "a@b.com".into());
        assert!(profile.validate().is_err());

        let profile = Profile::new(Role::Passenger, "Ana".into(), "ana".into());
        assert!(profile.validate().is_err());

        let profile = Profile {
            rating: Some(5.5),
            ..Profile::new(Role::Driver, "Ana".into(), "ana@email.com".into())
        };
        assert!(profile.validate().is_err());
    }
}
