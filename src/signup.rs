use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{PostalAddress, Profile, Role, Vehicle};
use crate::error::Error;

const PHONE_DIGITS: usize = 11;
const CEP_DIGITS: usize = 8;

pub fn clean_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn take_digits(text: &str, max: usize) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).take(max).collect()
}

/// Masks up to 11 digits as `(xx) xxxxx-xxxx`, partially while typing.
pub fn format_phone(text: &str) -> String {
    let digits = take_digits(text, PHONE_DIGITS);

    match digits.len() {
        0 => String::new(),
        1..=2 => format!("({}", digits),
        3..=7 => format!("({}) {}", &digits[..2], &digits[2..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}

/// Masks up to 8 digits as `xxxxx-xxx`.
pub fn format_cep(text: &str) -> String {
    let digits = take_digits(text, CEP_DIGITS);

    if digits.len() > 5 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleForm {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub color: String,
    pub plate: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub cpf: String,
    /// `dd/mm/yyyy`, as typed.
    pub birthdate: String,
    pub cep: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub city: String,
    pub state: String,
    pub license: Option<String>,
    pub vehicle: Option<VehicleForm>,
}

impl SignupForm {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            name: "".into(),
            email: "".into(),
            phone: "".into(),
            password: "".into(),
            confirm_password: "".into(),
            cpf: "".into(),
            birthdate: "".into(),
            cep: "".into(),
            street: "".into(),
            number: "".into(),
            complement: "".into(),
            city: "".into(),
            state: "".into(),
            license: None,
            vehicle: None,
        }
    }

    pub fn set_phone(&mut self, text: &str) {
        self.phone = format_phone(text);
    }

    /// Masks the CEP and returns its digits when a lookup should run.
    pub fn set_cep(&mut self, text: &str) -> Option<String> {
        self.cep = format_cep(text);
        self.lookup_cep()
    }

    pub fn lookup_cep(&self) -> Option<String> {
        let digits = clean_digits(&self.cep);
        (digits.len() == CEP_DIGITS).then(|| digits)
    }

    /// Prefills the address on success. A miss clears street, city and state;
    /// any other failure leaves the form untouched. Failures are handed back.
    pub fn apply_postal_lookup(&mut self, result: Result<PostalAddress, Error>) -> Result<(), Error> {
        match result {
            Ok(address) => {
                self.street = address.street;
                self.city = address.city;
                self.state = address.state;
                Ok(())
            }
            Err(err) if err.is_not_found_error() => {
                self.street.clear();
                self.city.clear();
                self.state.clear();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn into_profile(self) -> Result<Profile, Error> {
        if self.password.is_empty() || self.password != self.confirm_password {
            return Err(Error::invalid_input_error());
        }

        let birthdate = match self.birthdate.trim() {
            "" => None,
            text => Some(
                NaiveDate::parse_from_str(text, "%d/%m/%Y")
                    .map_err(|_| Error::invalid_input_error())?,
            ),
        };

        let vehicle = match (self.role, self.vehicle) {
            (Role::Driver, Some(form)) => Some(Vehicle {
                year: form.year.trim().parse().map_err(|_| Error::invalid_input_error())?,
                brand: form.brand,
                model: form.model,
                color: form.color,
                plate: form.plate.to_uppercase(),
            }),
            (Role::Driver, None) => return Err(Error::invalid_input_error()),
            (Role::Passenger, _) => None,
        };

        let license = match self.role {
            Role::Driver => Some(
                self.license
                    .filter(|license| !license.trim().is_empty())
                    .ok_or_else(Error::invalid_input_error)?,
            ),
            Role::Passenger => None,
        };

        let address = [self.street, self.number, self.complement, self.city, self.state]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let profile = Profile {
            phone: self.phone,
            cpf: self.cpf,
            birthdate,
            address,
            license,
            vehicle,
            ..Profile::new(self.role, self.name, self.email)
        };

        profile.validate()?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_mask_follows_typing() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("1"), "(1");
        assert_eq!(format_phone("11"), "(11");
        assert_eq!(format_phone("119"), "(11) 9");
        assert_eq!(format_phone("1198765"), "(11) 98765");
        assert_eq!(format_phone("11987654"), "(11) 98765-4");
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
    }

    #[test]
    fn phone_mask_ignores_extra_digits_and_symbols() {
        assert_eq!(format_phone("(11) 98765-4321 99"), "(11) 98765-4321");
    }

    #[test]
    fn cep_mask() {
        assert_eq!(format_cep("01310"), "01310");
        assert_eq!(format_cep("013101"), "01310-1");
        assert_eq!(format_cep("01310-100"), "01310-100");
        assert_eq!(format_cep("013101009"), "01310-100");
    }

    #[test]
    fn lookup_only_runs_for_eight_digits() {
        let mut form = SignupForm::new(Role::Passenger);

        assert_eq!(form.set_cep("0131010"), None);
        assert_eq!(form.set_cep("01310100"), Some("01310100".into()));
        assert_eq!(form.cep, "01310-100");
    }

    #[test]
    fn successful_lookup_prefills_the_address() {
        let mut form = SignupForm::new(Role::Passenger);
        let address = PostalAddress {
            cep: "01310100".into(),
            street: "Avenida Paulista".into(),
            district: "Bela Vista".into(),
            city: "São Paulo".into(),
            state: "SP".into(),
        };

        form.apply_postal_lookup(Ok(address)).unwrap();

        assert_eq!(form.street, "Avenida Paulista");
        assert_eq!(form.city, "São Paulo");
        assert_eq!(form.state, "SP");
    }

    #[test]
    fn missing_cep_clears_the_address() {
        let mut form = SignupForm {
            street: "old".into(),
            city: "old".into(),
            state: "XX".into(),
            number: "12".into(),
            ..SignupForm::new(Role::Passenger)
        };

        let err = form.apply_postal_lookup(Err(Error::not_found_error())).unwrap_err();

        assert!(err.is_not_found_error());
        assert_eq!((form.street.as_str(), form.city.as_str(), form.state.as_str()), ("", "", ""));
        assert_eq!(form.number, "12");
    }

    #[test]
    fn network_failures_leave_the_form_alone() {
        let mut form = SignupForm {
            street: "kept".into(),
            ..SignupForm::new(Role::Passenger)
        };

        assert!(form.apply_postal_lookup(Err(Error::upstream_error())).is_err());
        assert_eq!(form.street, "kept");
    }

    fn driver_form() -> SignupForm {
        SignupForm {
            name: "Carlos Oliveira".into(),
            email: "carlos@email.com".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
            birthdate: "15/03/1985".into(),
            street: "Avenida Paulista".into(),
            number: "1500".into(),
            city: "São Paulo".into(),
            state: "SP".into(),
            license: Some("12345678900".into()),
            vehicle: Some(VehicleForm {
                brand: "Toyota".into(),
                model: "Corolla".into(),
                year: "2022".into(),
                color: "Prata".into(),
                plate: "abc1d23".into(),
            }),
            ..SignupForm::new(Role::Driver)
        }
    }

    #[test]
    fn driver_form_becomes_a_profile() {
        let profile = driver_form().into_profile().unwrap();

        assert_eq!(profile.role, Role::Driver);
        assert_eq!(profile.address, "Avenida Paulista, 1500, São Paulo, SP");
        assert_eq!(profile.birthdate, NaiveDate::from_ymd_opt(1985, 3, 15));
        assert_eq!(profile.vehicle.unwrap().plate, "ABC1D23");
    }

    #[test]
    fn incomplete_forms_are_rejected() {
        let form = SignupForm {
            confirm_password: "other".into(),
            ..driver_form()
        };
        assert_eq!(form.into_profile().unwrap_err(), Error::invalid_input_error());

        let form = SignupForm {
            vehicle: None,
            ..driver_form()
        };
        assert!(form.into_profile().is_err());

        let form = SignupForm {
            birthdate: "1985-03-15".into(),
            ..driver_form()
        };
        assert!(form.into_profile().is_err());
    }
}
