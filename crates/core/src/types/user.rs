//! Account profile as returned by the users endpoint.

use serde::{Deserialize, Serialize};

/// Id of the profile shown to a signed-in user. The login endpoint returns
/// only a token, so there is no way to look up the caller's own id.
pub const DEFAULT_PROFILE_ID: i64 = 1;

/// First and last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub firstname: String,
    pub lastname: String,
}

impl PersonName {
    #[must_use]
    pub fn full(&self) -> String {
        format!("{} {}", self.firstname, self.lastname).trim().to_string()
    }

    /// Upper-cased first letters of the first and last name.
    #[must_use]
    pub fn initials(&self) -> String {
        [&self.firstname, &self.lastname]
            .iter()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

impl Address {
    /// One-line rendering, skipping empty parts.
    #[must_use]
    pub fn single_line(&self) -> String {
        let street = match self.number {
            Some(number) => format!("{number} {}", self.street),
            None => self.street.clone(),
        };
        [street.trim(), self.city.trim(), self.zipcode.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A user profile.
///
/// Only the displayed fields are decoded; anything else the endpoint sends
/// (including the stored password) is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: PersonName,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Option<Address>,
}
