//! Made-to-measure order requests.

use crate::cart::Measurements;
use crate::checkout::is_plausible_email;
use crate::error::CommerceError;
use crate::ids::{OrderNumber, CUSTOM_ORDER_PREFIX};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a custom order, from request to delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomOrderStatus {
    #[default]
    Pending,
    Quoted,
    Approved,
    InProgress,
    Completed,
    Cancelled,
}

impl CustomOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomOrderStatus::Pending => "pending",
            CustomOrderStatus::Quoted => "quoted",
            CustomOrderStatus::Approved => "approved",
            CustomOrderStatus::InProgress => "in_progress",
            CustomOrderStatus::Completed => "completed",
            CustomOrderStatus::Cancelled => "cancelled",
        }
    }

    /// No further transitions happen from here.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CustomOrderStatus::Completed | CustomOrderStatus::Cancelled)
    }
}

/// What the customer fills in on the custom-order form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub measurements: Measurements,
    /// Free-form budget range, e.g. `"$100-150"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

impl CustomOrderRequest {
    pub fn new(
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        measurements: Measurements,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            customer_phone: None,
            style: None,
            primary_color: None,
            secondary_color: None,
            pattern: None,
            special_requests: None,
            measurements,
            budget: None,
        }
    }

    /// Contact details must be usable and all four measurements present.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.customer_name.trim().is_empty() {
            return Err(CommerceError::CheckoutIncomplete("name".to_string()));
        }
        if !is_plausible_email(&self.customer_email) {
            return Err(CommerceError::CheckoutIncomplete("email".to_string()));
        }
        self.measurements.validate_complete()
    }

    /// Validate and assign a `CO-` order number.
    pub fn submit(self) -> Result<CustomOrder, CommerceError> {
        self.validate()?;
        let order = CustomOrder {
            order_number: OrderNumber::generate(CUSTOM_ORDER_PREFIX),
            status: CustomOrderStatus::Pending,
            quoted_price: None,
            created_at: Utc::now(),
            request: self,
        };
        tracing::info!(order = %order.order_number, "custom order submitted");
        Ok(order)
    }
}

/// A submitted custom order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOrder {
    pub order_number: OrderNumber,
    pub status: CustomOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_price: Option<crate::money::Money>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub request: CustomOrderRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements() -> Measurements {
        Measurements::new(34.0, 28.0, 38.0).with_under_bust(30.0)
    }

    #[test]
    fn test_submit_assigns_custom_prefix() {
        let order = CustomOrderRequest::new("Telly", "telly@example.com", measurements())
            .submit()
            .unwrap();
        assert_eq!(order.order_number.prefix(), "CO");
        assert_eq!(order.status, CustomOrderStatus::Pending);
        assert!(order.quoted_price.is_none());
    }

    #[test]
    fn test_under_bust_required() {
        let measurements = Measurements::new(34.0, 28.0, 38.0);
        let request = CustomOrderRequest::new("Telly", "telly@example.com", measurements);
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "Please provide a valid under bust measurement");
    }

    #[test]
    fn test_non_positive_measurement_rejected() {
        let request = CustomOrderRequest::new(
            "Telly",
            "telly@example.com",
            Measurements::new(34.0, 0.0, 38.0).with_under_bust(30.0),
        );
        assert!(matches!(
            request.validate(),
            Err(CommerceError::InvalidMeasurement(field)) if field == "waist"
        ));
    }

    #[test]
    fn test_contact_required() {
        let request = CustomOrderRequest::new("", "telly@example.com", measurements());
        assert!(matches!(request.validate(), Err(CommerceError::CheckoutIncomplete(_))));

        let request = CustomOrderRequest::new("Telly", "nope", measurements());
        assert!(matches!(request.validate(), Err(CommerceError::CheckoutIncomplete(_))));
    }

    #[test]
    fn test_status_terminal() {
        assert!(!CustomOrderStatus::Quoted.is_terminal());
        assert!(CustomOrderStatus::Cancelled.is_terminal());
        assert_eq!(CustomOrderStatus::InProgress.as_str(), "in_progress");
        assert_eq!(
            serde_json::to_string(&CustomOrderStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
    }
}
