//! Customer and address types for the checkout form.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// A US shipping address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Address {
    /// Address line 1.
    pub address: String,
    /// Address line 2 (apt, suite, etc.).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    /// State code (e.g., "FL").
    pub state: String,
    pub zip: String,
}

impl Address {
    /// Create a new address.
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            address2: None,
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
        }
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address.clone()];
        if let Some(ref addr2) = self.address2 {
            parts.push(addr2.clone());
        }
        parts.push(self.city.clone());
        parts.push(format!("{} {}", self.state, self.zip));
        parts.join(", ")
    }

    /// Format as multi-line, the layout used on receipts.
    pub fn multi_line(&self) -> String {
        let mut lines = vec![self.address.clone()];
        if let Some(ref addr2) = self.address2 {
            lines.push(addr2.clone());
        }
        lines.push(format!("{}, {} {}", self.city, self.state, self.zip));
        lines.join("\n")
    }

    /// Name of the first required field that is blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// Check if address is complete.
    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }
}

/// The person placing an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub address: Address,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            address,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Check the fields a payment provider needs are present.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::CheckoutIncomplete("name".to_string()));
        }
        if !is_plausible_email(&self.email) {
            return Err(CommerceError::CheckoutIncomplete("email".to_string()));
        }
        if let Some(field) = self.address.missing_field() {
            return Err(CommerceError::CheckoutIncomplete(field.to_string()));
        }
        Ok(())
    }
}

/// `local@domain` with both sides non-empty and a dot in the domain.
pub(crate) fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
