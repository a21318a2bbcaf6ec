//! # Receipt Builder
//!
//! The draft receipt shown in the payment modal.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Facture N° FAC-04817263                     │
//! │  17/10/2026 14:03:11                         │
//! │  ──────────────────────────────────────────  │
//! │  Pain x2                          6.00       │
//! │  Lait x1                          1.20       │
//! │  ──────────────────────────────────────────  │
//! │  Total HT                         6.81       │
//! │  TVA                              0.39       │
//! │  Total TTC                        7.20       │
//! │  Remise                          -0.72       │
//! │  Net à payer                      6.48       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The number is random and only meant for display. Once the sale is
//! accepted, the backend's `numero_facture` is the real invoice number.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartTotals};
use crate::discount::Discount;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::INVOICE_NUMBER_PREFIX;

/// Date format used on receipts.
pub const RECEIPT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// One printed receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Draft of the sale shown in the payment modal. Number and timestamp are
/// fixed when the modal opens; lines and totals follow the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    pub number: String,
    #[ts(as = "String")]
    pub issued_at: NaiveDateTime,
    pub lines: Vec<ReceiptLine>,
    pub totals: CartTotals,
    pub discount: Discount,
}

impl Receipt {
    /// Builds a draft receipt from the cart.
    ///
    /// ## Errors
    /// `CoreError::EmptyCart` when there is nothing to pay for.
    pub fn draft(cart: &Cart, number: String, issued_at: NaiveDateTime) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let lines = cart
            .lines()
            .iter()
            .map(|item| ReceiptLine {
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total,
            })
            .collect();

        Ok(Receipt {
            number,
            issued_at,
            lines,
            totals: cart.totals(),
            discount: cart.discount(),
        })
    }

    /// `dd/mm/yyyy HH:MM:SS`
    pub fn formatted_date(&self) -> String {
        self.issued_at.format(RECEIPT_DATE_FORMAT).to_string()
    }

    pub fn has_discount(&self) -> bool {
        self.totals.discount.is_positive()
    }
}

/// Random provisional number, `FAC-` followed by eight digits.
///
/// Not guaranteed unique.
pub fn provisional_number() -> String {
    let random = Uuid::new_v4().as_u128() % 100_000_000;
    format!("{}{:08}", INVOICE_NUMBER_PREFIX, random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Article, TaxRate};
    use chrono::NaiveDate;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        let bread = Article {
            id: 1,
            name: "Pain".to_string(),
            barcode: "3760000000001".to_string(),
            price_incl_tax: Money::from_cents(300),
            price_excl_tax: Money::from_cents(284),
            stock: 12,
            tax_rate: TaxRate::from_bps(550),
        };
        cart.add(&bread).unwrap();
        cart.add(&bread).unwrap();
        cart
    }

    fn issued_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 2)
            .unwrap()
    }

    #[test]
    fn test_draft_copies_lines_and_totals() {
        let mut cart = sample_cart();
        cart.set_discount(Discount::percent(10.0).unwrap());

        let receipt = Receipt::draft(&cart, "FAC-00000001".to_string(), issued_at()).unwrap();

        assert_eq!(receipt.lines.len(), 1);
        assert_eq!(receipt.lines[0].quantity, 2);
        assert_eq!(receipt.lines[0].line_total, Money::from_cents(600));
        assert_eq!(receipt.totals, cart.totals());
        assert!(receipt.has_discount());
        assert_eq!(receipt.formatted_date(), "07/03/2026 09:05:02");
    }

    #[test]
    fn test_draft_rejects_empty_cart() {
        let result = Receipt::draft(&Cart::new(), provisional_number(), issued_at());
        assert_eq!(result.unwrap_err(), CoreError::EmptyCart);
    }

    #[test]
    fn test_provisional_number_format() {
        let number = provisional_number();
        assert!(number.starts_with("FAC-"));
        assert_eq!(number.len(), 12);
        assert!(number[4..].chars().all(|c| c.is_ascii_digit()));
    }
}
