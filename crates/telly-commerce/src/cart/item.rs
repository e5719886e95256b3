//! Line items, their merge key, and custom-fit measurements.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Size label that marks a made-to-measure item.
pub const CUSTOM_SIZE: &str = "custom";

/// Size used when an addition does not name one.
pub const DEFAULT_SIZE: &str = "M";

/// Identity of a line item: two additions merge iff product and size match.
///
/// Color and measurements are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: String,
}

impl LineKey {
    pub fn new(product_id: impl Into<ProductId>, size: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.into(),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product_id, self.size)
    }
}

/// Custom-fit body measurements, in inches.
///
/// The product page stores raw form values, so each field also reads from a
/// numeric string such as `"34"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    #[serde(deserialize_with = "number")]
    pub bust: f64,
    #[serde(
        default,
        deserialize_with = "optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub under_bust: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub waist: f64,
    #[serde(deserialize_with = "number")]
    pub hips: f64,
}

impl Measurements {
    /// Measurements without an under-bust value.
    pub fn new(bust: f64, waist: f64, hips: f64) -> Self {
        Self {
            bust,
            under_bust: None,
            waist,
            hips,
        }
    }

    pub fn with_under_bust(mut self, under_bust: f64) -> Self {
        self.under_bust = Some(under_bust);
        self
    }

    /// Check every present value is a positive, finite number.
    pub fn validate(&self) -> Result<(), CommerceError> {
        check_measurement("bust", self.bust)?;
        if let Some(under_bust) = self.under_bust {
            check_measurement("under bust", under_bust)?;
        }
        check_measurement("waist", self.waist)?;
        check_measurement("hips", self.hips)
    }

    /// Like [`validate`](Self::validate), but also requires the under-bust value.
    pub fn validate_complete(&self) -> Result<(), CommerceError> {
        if self.under_bust.is_none() {
            return Err(CommerceError::InvalidMeasurement("under bust".to_string()));
        }
        self.validate()
    }
}

fn check_measurement(field: &str, value: f64) -> Result<(), CommerceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CommerceError::InvalidMeasurement(field.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("not a number: {:?}", text))),
        }
    }
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    NumberOrText::deserialize(deserializer)?.into_f64()
}

/// An absent, null, or blank value reads as `None`.
fn optional_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => value.into_f64().map(Some),
    }
}

/// A line item in the cart.
///
/// Persisted in the browser-compatible camelCase layout with `price` as
/// decimal currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredLineItem", into = "StoredLineItem")]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub size: String,
    pub color: Option<String>,
    pub measurements: Option<Measurements>,
    /// Always at least 1 while the item is in a cart.
    pub quantity: i64,
    pub image: Option<String>,
}

impl LineItem {
    /// The merge key of this item.
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.size.clone())
    }

    pub fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.size == key.size
    }

    /// `price * quantity`, clamped rather than overflowing.
    pub fn line_total(&self) -> Money {
        self.price.saturating_multiply(self.quantity)
    }

    pub fn is_custom(&self) -> bool {
        self.size == CUSTOM_SIZE
    }
}

/// On-disk form of a [`LineItem`].
///
/// Accepts the legacy `id` field name for the product identifier and a
/// missing `currency` (read as USD).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLineItem {
    #[serde(alias = "id")]
    product_id: String,
    name: String,
    price: f64,
    #[serde(default)]
    currency: Currency,
    #[serde(default = "default_size")]
    size: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    measurements: Option<Measurements>,
    quantity: i64,
    #[serde(default)]
    image: Option<String>,
}

fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

impl TryFrom<StoredLineItem> for LineItem {
    type Error = String;

    fn try_from(stored: StoredLineItem) -> Result<Self, Self::Error> {
        let price = Money::from_decimal(stored.price, stored.currency)
            .filter(Money::is_positive)
            .ok_or_else(|| format!("invalid price {} for {}", stored.price, stored.product_id))?;
        if stored.quantity < 1 {
            return Err(format!(
                "invalid quantity {} for {}",
                stored.quantity, stored.product_id
            ));
        }
        Ok(Self {
            product_id: ProductId::new(stored.product_id),
            name: stored.name,
            price,
            size: stored.size,
            color: stored.color,
            measurements: stored.measurements,
            quantity: stored.quantity,
            image: stored.image,
        })
    }
}

impl From<LineItem> for StoredLineItem {
    fn from(item: LineItem) -> Self {
        Self {
            product_id: item.product_id.into_inner(),
            name: item.name,
            price: item.price.to_decimal(),
            currency: item.price.currency,
            size: item.size,
            color: item.color,
            measurements: item.measurements,
            quantity: item.quantity,
            image: item.image,
        }
    }
}

/// Structured product data handed to [`CartStore::add`](crate::cart::CartStore::add).
///
/// `size` and `quantity` fall back to the store's default size and 1.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemInput {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub size: Option<String>,
    pub quantity: Option<i64>,
    pub color: Option<String>,
    pub measurements: Option<Measurements>,
    pub image: Option<String>,
}

impl LineItemInput {
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            size: None,
            quantity: None,
            color: None,
            measurements: None,
            image: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_measurements(mut self, measurements: Measurements) -> Self {
        self.measurements = Some(measurements);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Apply defaults and validate, producing the item that would be appended.
    pub(crate) fn into_line_item(
        self,
        default_size: &str,
        currency: Currency,
    ) -> Result<LineItem, CommerceError> {
        let quantity = self.quantity.unwrap_or(1);
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if self.product_id.as_str().trim().is_empty() {
            return Err(CommerceError::InvalidItem("product id is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(CommerceError::InvalidItem(format!(
                "{} has no name",
                self.product_id
            )));
        }
        if self.price.currency != currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: self.price.currency.code().to_string(),
            });
        }
        if !self.price.is_positive() {
            return Err(CommerceError::InvalidItem(format!(
                "{} has non-positive price {}",
                self.product_id, self.price
            )));
        }

        let size = non_blank(self.size).unwrap_or_else(|| default_size.to_string());
        match (size == CUSTOM_SIZE, &self.measurements) {
            (true, Some(measurements)) => measurements.validate()?,
            (true, None) => {
                return Err(CommerceError::InvalidItem(format!(
                    "{} in custom size needs measurements",
                    self.product_id
                )))
            }
            (false, Some(_)) => {
                return Err(CommerceError::InvalidItem(format!(
                    "{} in size {} cannot carry custom measurements",
                    self.product_id, size
                )))
            }
            (false, None) => {}
        }

        Ok(LineItem {
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            size,
            color: non_blank(self.color),
            measurements: self.measurements,
            quantity,
            image: non_blank(self.image),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
