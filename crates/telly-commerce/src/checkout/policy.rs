//! Shipping and tax rules applied to a cart subtotal.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Flat shipping fee, in cents.
pub const DEFAULT_FLAT_SHIPPING_CENTS: i64 = 1000;

/// Subtotal at or above which shipping is free, in cents.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS: i64 = 10_000;

/// Sales tax applied to the subtotal.
pub const DEFAULT_TAX_RATE_PERCENT: f64 = 8.0;

/// Pricing rules for turning a subtotal into an amount due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutPolicy {
    #[serde(default = "default_flat_shipping")]
    pub flat_shipping_cents: i64,
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold_cents: i64,
    #[serde(default = "default_tax_rate")]
    pub tax_rate_percent: f64,
}

fn default_flat_shipping() -> i64 {
    DEFAULT_FLAT_SHIPPING_CENTS
}

fn default_free_shipping_threshold() -> i64 {
    DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE_PERCENT
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            flat_shipping_cents: DEFAULT_FLAT_SHIPPING_CENTS,
            free_shipping_threshold_cents: DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS,
            tax_rate_percent: DEFAULT_TAX_RATE_PERCENT,
        }
    }
}

impl CheckoutPolicy {
    /// Shipping charge for a subtotal: flat fee, waived at the threshold.
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal.amount_cents >= self.free_shipping_threshold_cents {
            Money::zero(subtotal.currency)
        } else {
            Money::new(self.flat_shipping_cents, subtotal.currency)
        }
    }

    /// Tax on a subtotal, rounded to the nearest cent.
    pub fn tax_for(&self, subtotal: Money) -> Money {
        subtotal.percentage(self.tax_rate_percent)
    }

    /// Full breakdown for a subtotal.
    ///
    /// Fails with [`CommerceError::InvalidConfig`] when the policy itself is
    /// out of range.
    pub fn totals(&self, subtotal: Money) -> Result<CheckoutTotals, CommerceError> {
        self.validate()?;
        let shipping = self.shipping_for(subtotal);
        let tax = self.tax_for(subtotal);
        let total = subtotal
            .try_add(&shipping)
            .and_then(|m| m.try_add(&tax))
            .ok_or(CommerceError::Overflow)?;

        Ok(CheckoutTotals {
            subtotal,
            shipping,
            tax,
            total,
        })
    }

    /// Reject settings that would produce nonsense totals.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.flat_shipping_cents < 0 || self.free_shipping_threshold_cents < 0 {
            return Err(CommerceError::InvalidConfig(
                "shipping amounts must not be negative".to_string(),
            ));
        }
        if !self.tax_rate_percent.is_finite() || !(0.0..=100.0).contains(&self.tax_rate_percent) {
            return Err(CommerceError::InvalidConfig(format!(
                "tax rate {} is outside 0-100%",
                self.tax_rate_percent
            )));
        }
        Ok(())
    }
}

/// Order summary figures, as shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl CheckoutTotals {
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// `FREE` or the shipping amount.
    pub fn shipping_label(&self) -> String {
        if self.is_free_shipping() {
            "FREE".to_string()
        } else {
            self.shipping.display()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    #[test]
    fn test_flat_shipping_below_threshold() {
        let totals = CheckoutPolicy::default().totals(usd(4999)).unwrap();
        assert_eq!(totals.shipping, usd(1000));
        assert_eq!(totals.tax, usd(400));
        assert_eq!(totals.total, usd(6399));
        assert_eq!(totals.shipping_label(), "$10.00");
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let totals = CheckoutPolicy::default().totals(usd(10_000)).unwrap();
        assert!(totals.is_free_shipping());
        assert_eq!(totals.shipping_label(), "FREE");
        assert_eq!(totals.total, usd(10_800));
    }

    #[test]
    fn test_tax_rounding() {
        let totals = CheckoutPolicy::default().totals(usd(14_997)).unwrap();
        assert_eq!(totals.tax, usd(1200));
        assert_eq!(totals.total, usd(16_197));
    }

    #[test]
    fn test_empty_subtotal_still_charges_shipping() {
        let totals = CheckoutPolicy::default().totals(usd(0)).unwrap();
        assert_eq!(totals.total, usd(1000));
    }

    #[test]
    fn test_policy_validation() {
        assert!(CheckoutPolicy::default().validate().is_ok());

        let bad = CheckoutPolicy {
            tax_rate_percent: 120.0,
            ..CheckoutPolicy::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_totals_refuse_invalid_policy() {
        let negative_tax = CheckoutPolicy {
            tax_rate_percent: -8.0,
            ..CheckoutPolicy::default()
        };
        let err = negative_tax.totals(usd(4999)).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidConfig(_)));

        let negative_shipping = CheckoutPolicy {
            flat_shipping_cents: -1000,
            ..CheckoutPolicy::default()
        };
        assert!(negative_shipping.totals(usd(4999)).is_err());
    }

    #[test]
    fn test_policy_defaults_from_partial_config() {
        let policy: CheckoutPolicy = serde_json::from_str(r#"{"tax_rate_percent": 6.5}"#).unwrap();
        assert_eq!(policy.flat_shipping_cents, DEFAULT_FLAT_SHIPPING_CENTS);
        assert_eq!(policy.tax_rate_percent, 6.5);
    }
}
