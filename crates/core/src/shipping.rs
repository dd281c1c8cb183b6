//! Shipping details entered during checkout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Email;

/// A shipping field that must be filled in before an order can be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShippingField {
    FirstName,
    LastName,
    Email,
    Address,
    City,
    PostalCode,
    Country,
}

impl ShippingField {
    /// Required fields in form order. Validation reports the first one missing.
    pub const REQUIRED: [Self; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Address,
        Self::City,
        Self::PostalCode,
        Self::Country,
    ];

    /// Human label, as used in "Please enter ...".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Email => "email",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postal code",
            Self::Country => "country",
        }
    }

    /// Payload key of the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postalCode",
            Self::Country => "country",
        }
    }
}

/// Why shipping details were rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShippingError {
    /// A required field is empty or whitespace.
    #[error("Please enter {}", .0.label())]
    Missing(ShippingField),
    /// The email does not look deliverable.
    #[error("Please enter a valid email")]
    InvalidEmail,
}

impl ShippingError {
    /// The field the error is attached to.
    #[must_use]
    pub const fn field(&self) -> ShippingField {
        match self {
            Self::Missing(field) => *field,
            Self::InvalidEmail => ShippingField::Email,
        }
    }
}

/// Where an order should be shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ShippingDetails {
    /// Raw value of a required field.
    #[must_use]
    pub fn get(&self, field: ShippingField) -> &str {
        match field {
            ShippingField::FirstName => &self.first_name,
            ShippingField::LastName => &self.last_name,
            ShippingField::Email => &self.email,
            ShippingField::Address => &self.address,
            ShippingField::City => &self.city,
            ShippingField::PostalCode => &self.postal_code,
            ShippingField::Country => &self.country,
        }
    }

    /// Required fields that are empty or whitespace-only, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<ShippingField> {
        ShippingField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Check the details are complete enough to place an order.
    ///
    /// Reports only the first problem, so the caller surfaces exactly one
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Missing`] for the first blank required field,
    /// or [`ShippingError::InvalidEmail`] when the email is malformed.
    pub fn validate(&self) -> Result<(), ShippingError> {
        if let Some(field) = self.missing_fields().into_iter().next() {
            return Err(ShippingError::Missing(field));
        }
        Email::parse(&self.email).map_err(|_| ShippingError::InvalidEmail)?;
        Ok(())
    }

    /// A copy with every field trimmed. Blank optional fields become `None`.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        let trim_opt = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            address: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: trim_opt(&self.state),
            postal_code: self.postal_code.trim().to_owned(),
            country: self.country.trim().to_owned(),
            phone: trim_opt(&self.phone),
        }
    }

    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}
