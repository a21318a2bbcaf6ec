//! # Domain Types
//!
//! Catalog and sale types shared by the cart, the views and the HTTP client.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Article      │   │ PaymentMethod   │   │ InvoiceSummary  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (backend)   │   │  Especes        │   │  number         │       │
//! │  │  barcode        │   │  Carte          │   │  date           │       │
//! │  │  price TTC/HT   │   │  Cheque ...     │   │  total TTC      │       │
//! │  │  tax_rate       │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Articles are owned by the backend; the checkout only ever holds copies
//! returned by the search endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01 %, so 1800 bps = 18 % TVA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage, as the search endpoint reports it.
    /// Negative or non-finite input yields zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate::zero();
        }
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// Shows `18%`, `5.5%`, `0%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Article
// =============================================================================

/// A catalog article as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Article {
    /// Backend identifier.
    pub id: i64,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Barcode (EAN-13 etc.).
    pub barcode: String,

    /// Unit price including tax (TTC).
    pub price_incl_tax: Money,

    /// Unit price excluding tax (HT).
    pub price_excl_tax: Money,

    /// Stock reported by the backend at search time. Informational only;
    /// the backend enforces stock when the invoice is created.
    pub stock: i64,

    pub tax_rate: TaxRate,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays. Serialized with the backend's codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    #[default]
    Especes,
    /// Card on an external terminal.
    Carte,
    Cheque,
    /// Bank transfer.
    Virement,
    /// Meal voucher.
    TicketResto,
    /// Split across several methods.
    Mixte,
}

impl PaymentMethod {
    /// Every method the backend accepts, in menu order.
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Especes,
        PaymentMethod::Carte,
        PaymentMethod::Cheque,
        PaymentMethod::Virement,
        PaymentMethod::TicketResto,
        PaymentMethod::Mixte,
    ];

    /// Backend code (`mode_paiement`).
    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::Especes => "especes",
            PaymentMethod::Carte => "carte",
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::Virement => "virement",
            PaymentMethod::TicketResto => "ticket_resto",
            PaymentMethod::Mixte => "mixte",
        }
    }

    /// Label shown to the cashier.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Especes => "Espèces",
            PaymentMethod::Carte => "Carte",
            PaymentMethod::Cheque => "Chèque",
            PaymentMethod::Virement => "Virement",
            PaymentMethod::TicketResto => "Ticket resto",
            PaymentMethod::Mixte => "Mixte",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "especes" | "espèces" | "cash" => Ok(PaymentMethod::Especes),
            "carte" | "card" => Ok(PaymentMethod::Carte),
            "cheque" | "chèque" => Ok(PaymentMethod::Cheque),
            "virement" => Ok(PaymentMethod::Virement),
            "ticket_resto" | "ticket" => Ok(PaymentMethod::TicketResto),
            "mixte" => Ok(PaymentMethod::Mixte),
            _ => Err(ValidationError::NotAllowed {
                field: "mode_paiement".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.code().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Invoice Summary
// =============================================================================

/// A recently created invoice, as listed by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceSummary {
    /// Server-assigned number, e.g. `FAC-00000042`.
    pub number: String,
    /// Date as formatted by the backend.
    pub date: String,
    pub client: String,
    /// Raw `mode_paiement` code; older invoices may carry codes this client
    /// does not know, so it is not parsed.
    pub payment_method: String,
    pub total_incl_tax: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(18.0).bps(), 1800);
        assert_eq!(TaxRate::from_percentage(5.5).bps(), 550);
        assert_eq!(TaxRate::from_percentage(-3.0).bps(), 0);
        assert_eq!(TaxRate::from_percentage(f64::NAN).bps(), 0);
    }

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_bps(1800).to_string(), "18%");
        assert_eq!(TaxRate::from_bps(550).to_string(), "5.5%");
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
        assert_eq!(TaxRate::zero().to_string(), "0%");
    }

    #[test]
    fn test_payment_method_codes() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Especes);
        assert_eq!(PaymentMethod::TicketResto.code(), "ticket_resto");
        assert_eq!(
            serde_json::to_string(&PaymentMethod::TicketResto).unwrap(),
            "\"ticket_resto\""
        );
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("carte".parse::<PaymentMethod>().unwrap(), PaymentMethod::Carte);
        assert_eq!("Espèces".parse::<PaymentMethod>().unwrap(), PaymentMethod::Especes);
        assert_eq!(" cash ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Especes);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }
}
