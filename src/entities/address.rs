use serde::{Deserialize, Serialize};

/// Address resolved from a CEP.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub cep: String,
    pub street: String,
    pub district: String,
    pub city: String,
    pub state: String,
}
