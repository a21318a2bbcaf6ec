//! # Discount Calculator
//!
//! A single cart-wide discount ("remise") applied to the gross TTC total.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gross TTC ──► compute() ──► discount amount                           │
//! │                   │             percent: min(G, G × p / 100)            │
//! │                   │             amount:  min(G, d)                      │
//! │                   ▼                                                     │
//! │  net TTC = max(0, G − discount)                                         │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  net HT  = gross HT × net / gross      (ratio 1 when gross is 0)        │
//! │  net TVA = net TTC − net HT            (split always adds up)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{parse_discount_value, validate_discount_value, ValidationResult};

/// Which form of discount the cashier picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    None,
    Percent,
    Amount,
}

impl DiscountKind {
    /// Code sent to the backend in `remise.type`.
    pub fn code(&self) -> &'static str {
        match self {
            DiscountKind::None => "none",
            DiscountKind::Percent => "percent",
            DiscountKind::Amount => "amount",
        }
    }
}

/// A cart-wide discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discount {
    #[default]
    None,
    /// Percentage in basis points (1000 = 10 %).
    Percent { bps: u32 },
    /// Fixed amount off the gross total.
    Amount { value: Money },
}

impl Discount {
    /// Builds a percent discount from a percentage (`12.5` = 12.5 %).
    ///
    /// Values above 100 are accepted; the computed amount is capped at the
    /// gross total.
    pub fn percent(value: f64) -> ValidationResult<Self> {
        validate_discount_value(value)?;
        let bps = (value * 100.0).round();
        if bps < 1.0 {
            return Err(ValidationError::MustBePositive {
                field: "discount".to_string(),
            });
        }
        Ok(Discount::Percent {
            bps: bps.min(u32::MAX as f64) as u32,
        })
    }

    /// Builds a fixed-amount discount from a decimal amount.
    pub fn amount(value: f64) -> ValidationResult<Self> {
        validate_discount_value(value)?;
        let value = Money::from_major_f64(value);
        if !value.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "discount".to_string(),
            });
        }
        Ok(Discount::Amount { value })
    }

    /// Parses the discount form: a kind plus the raw text the cashier typed.
    ///
    /// `DiscountKind::None` ignores the input and removes the discount.
    ///
    /// ```rust
    /// use caisse_core::{Discount, DiscountKind};
    ///
    /// assert_eq!(
    ///     Discount::parse(DiscountKind::Percent, "10").unwrap(),
    ///     Discount::Percent { bps: 1000 }
    /// );
    /// assert!(Discount::parse(DiscountKind::Amount, "").is_err());
    /// ```
    pub fn parse(kind: DiscountKind, input: &str) -> ValidationResult<Self> {
        match kind {
            DiscountKind::None => Ok(Discount::None),
            DiscountKind::Percent => Discount::percent(parse_discount_value(input)?),
            DiscountKind::Amount => Discount::amount(parse_discount_value(input)?),
        }
    }

    pub fn kind(&self) -> DiscountKind {
        match self {
            Discount::None => DiscountKind::None,
            Discount::Percent { .. } => DiscountKind::Percent,
            Discount::Amount { .. } => DiscountKind::Amount,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Discount::None)
    }

    /// The value as the cashier entered it: percentage for percent, decimal
    /// amount for amount, 0 for none.
    pub fn value(&self) -> f64 {
        match self {
            Discount::None => 0.0,
            Discount::Percent { bps } => *bps as f64 / 100.0,
            Discount::Amount { value } => value.to_major_f64(),
        }
    }

    /// Discount amount for a gross TTC total.
    ///
    /// Never negative, never more than `gross`.
    pub fn compute(&self, gross: Money) -> Money {
        if !gross.is_positive() {
            return Money::zero();
        }
        match self {
            Discount::None => Money::zero(),
            Discount::Percent { bps } => gross.percentage(*bps).min(gross),
            Discount::Amount { value } => (*value).clamp_non_negative().min(gross),
        }
    }

    /// Applies the discount to gross totals and redistributes HT/TVA.
    pub fn apply(&self, gross_excl_tax: Money, gross_total: Money) -> NetTotals {
        let discount = self.compute(gross_total);
        split_net(gross_excl_tax, gross_total, discount)
    }
}

/// Totals after discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NetTotals {
    pub discount: Money,
    pub net_excl_tax: Money,
    pub net_tax: Money,
    pub net_total: Money,
}

/// Scales the HT part of a gross total by `net / gross`.
///
/// The tax part is the remainder, so `net_excl_tax + net_tax == net_total`
/// holds exactly.
pub fn split_net(gross_excl_tax: Money, gross_total: Money, discount: Money) -> NetTotals {
    let net_total = (gross_total - discount).clamp_non_negative();
    let net_excl_tax = gross_excl_tax.scale(net_total, gross_total);
    NetTotals {
        discount,
        net_excl_tax,
        net_tax: net_total - net_excl_tax,
        net_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_no_discount_is_zero() {
        assert_eq!(Discount::None.compute(cents(720)), Money::zero());
    }

    #[test]
    fn test_ten_percent_of_7_20() {
        let discount = Discount::percent(10.0).unwrap();
        assert_eq!(discount.compute(cents(720)), cents(72));

        let net = discount.apply(cents(682), cents(720));
        assert_eq!(net.net_total, cents(648));
    }

    #[test]
    fn test_percent_discount_capped_at_gross() {
        let discount = Discount::percent(150.0).unwrap();
        assert_eq!(discount.compute(cents(720)), cents(720));
        assert_eq!(discount.apply(cents(682), cents(720)).net_total, Money::zero());
    }

    #[test]
    fn test_amount_discount_capped_at_gross() {
        let discount = Discount::amount(5.0).unwrap();
        assert_eq!(discount.compute(cents(720)), cents(500));

        let discount = Discount::amount(50.0).unwrap();
        assert_eq!(discount.compute(cents(720)), cents(720));
    }

    #[test]
    fn test_discount_on_empty_cart() {
        let discount = Discount::amount(5.0).unwrap();
        let net = discount.apply(Money::zero(), Money::zero());
        assert_eq!(net.discount, Money::zero());
        assert_eq!(net.net_total, Money::zero());
        assert_eq!(net.net_excl_tax, Money::zero());
    }

    #[test]
    fn test_non_positive_values_rejected() {
        assert!(Discount::percent(0.0).is_err());
        assert!(Discount::percent(-10.0).is_err());
        assert!(Discount::amount(0.0).is_err());
        // Rounds to zero hundredths
        assert!(Discount::amount(0.001).is_err());
        assert!(Discount::parse(DiscountKind::Percent, "  ").is_err());
    }

    #[test]
    fn test_parse_none_clears() {
        assert_eq!(Discount::parse(DiscountKind::None, "").unwrap(), Discount::None);
    }

    #[test]
    fn test_tax_split_adds_up_for_any_ratio() {
        let gross_total = cents(12_345);
        let gross_excl = cents(10_462);
        for pct in [1.0, 3.3, 10.0, 33.33, 50.0, 99.99, 100.0] {
            let net = Discount::percent(pct).unwrap().apply(gross_excl, gross_total);
            assert_eq!(net.net_excl_tax + net.net_tax, net.net_total, "pct {}", pct);
            assert!(!net.net_tax.is_negative());
        }
        for amount in [0.01, 1.0, 17.77, 123.45, 500.0] {
            let net = Discount::amount(amount).unwrap().apply(gross_excl, gross_total);
            assert_eq!(net.net_excl_tax + net.net_tax, net.net_total, "amount {}", amount);
        }
    }

    #[test]
    fn test_value_and_kind() {
        let d = Discount::percent(12.5).unwrap();
        assert_eq!(d.kind(), DiscountKind::Percent);
        assert!((d.value() - 12.5).abs() < 1e-9);

        let d = Discount::amount(2.5).unwrap();
        assert_eq!(d.kind().code(), "amount");
        assert!((d.value() - 2.5).abs() < 1e-9);

        assert_eq!(Discount::None.kind().code(), "none");
    }
}
