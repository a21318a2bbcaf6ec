//! # Screen State Machine
//!
//! Which modal is open on the checkout screen, and how the function keys
//! move between them.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │              F1                              F5 (cart not empty)        │
//! │   ┌──────────────────┐   ┌────────┐   ┌──────────────────────────┐     │
//! │   │   SearchOpen     │◄──│  Idle  │──►│ PaymentOpen(draft receipt)│     │
//! │   └──────────────────┘   └────────┘   └──────────────────────────┘     │
//! │          │ Esc             │  ▲ │              │ Esc / sale done       │
//! │          └────────────────►│  │ │◄─────────────┘                       │
//! │                            │  │ │                                       │
//! │              F2 (cart not  ▼  │ │ Esc with no modal, cart not empty     │
//! │              empty)  ┌──────────────┐  ──► ConfirmClearCart            │
//! │                      │ DiscountOpen │                                   │
//! │                      └──────────────┘                                   │
//! │                                                                         │
//! │  Escape closes ONE modal per press: search, then discount, then payment │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::receipt::{provisional_number, Receipt};
use crate::types::PaymentMethod;

/// Keys the checkout screen reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Key {
    /// Open the search modal.
    F1,
    /// Open the discount modal.
    F2,
    /// Open the payment modal.
    F5,
    Escape,
}

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum KeyOutcome {
    OpenedSearch,
    OpenedDiscount,
    OpenedPayment,
    ClosedSearch,
    ClosedDiscount,
    ClosedPayment,
    /// No modal was open and the cart has lines: the front end must ask
    /// before calling `CheckoutState::confirm_clear`.
    ConfirmClearCart,
    Ignored,
}

/// Modal flags plus the payment form fields.
///
/// Modals are independent flags rather than a single enum so that Escape can
/// close them in a fixed order whatever order they were opened in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    search_open: bool,
    discount_open: bool,
    payment: Option<Receipt>,
    client_name: String,
    payment_method: PaymentMethod,
}

impl Screen {
    pub fn new(payment_method: PaymentMethod) -> Self {
        Screen {
            payment_method,
            ..Default::default()
        }
    }

    /// Routes a key press.
    ///
    /// `issued_at` stamps the draft receipt when F5 opens the payment modal.
    pub fn handle_key(&mut self, key: Key, cart: &Cart, issued_at: NaiveDateTime) -> KeyOutcome {
        match key {
            Key::F1 => {
                self.open_search();
                KeyOutcome::OpenedSearch
            }
            Key::F2 => {
                if cart.is_empty() {
                    return KeyOutcome::Ignored;
                }
                self.discount_open = true;
                KeyOutcome::OpenedDiscount
            }
            Key::F5 => match Receipt::draft(cart, provisional_number(), issued_at) {
                Ok(receipt) => {
                    self.open_payment(receipt);
                    KeyOutcome::OpenedPayment
                }
                Err(_) => KeyOutcome::Ignored,
            },
            Key::Escape => self.escape(cart.is_empty()),
        }
    }

    fn escape(&mut self, cart_empty: bool) -> KeyOutcome {
        if self.search_open {
            self.close_search();
            KeyOutcome::ClosedSearch
        } else if self.discount_open {
            self.close_discount();
            KeyOutcome::ClosedDiscount
        } else if self.payment.is_some() {
            self.close_payment();
            KeyOutcome::ClosedPayment
        } else if !cart_empty {
            KeyOutcome::ConfirmClearCart
        } else {
            KeyOutcome::Ignored
        }
    }

    pub fn open_search(&mut self) {
        self.search_open = true;
    }

    pub fn close_search(&mut self) {
        self.search_open = false;
    }

    pub fn close_discount(&mut self) {
        self.discount_open = false;
    }

    pub fn open_payment(&mut self, receipt: Receipt) {
        self.payment = Some(receipt);
    }

    /// Rebuilds the draft receipt from the current cart, keeping its number
    /// and timestamp. Closes the payment modal if the cart is now empty.
    pub fn refresh_payment(&mut self, cart: &Cart) {
        let Some(current) = &self.payment else {
            return;
        };
        match Receipt::draft(cart, current.number.clone(), current.issued_at) {
            Ok(receipt) => self.payment = Some(receipt),
            Err(_) => self.close_payment(),
        }
    }

    /// Closes the payment modal and empties the client name field.
    pub fn close_payment(&mut self) {
        self.payment = None;
        self.client_name.clear();
    }

    pub fn is_search_open(&self) -> bool {
        self.search_open
    }

    pub fn is_discount_open(&self) -> bool {
        self.discount_open
    }

    pub fn is_payment_open(&self) -> bool {
        self.payment.is_some()
    }

    /// True when no modal is open.
    pub fn is_idle(&self) -> bool {
        !self.search_open && !self.discount_open && self.payment.is_none()
    }

    /// Draft receipt of the open payment modal.
    pub fn receipt(&self) -> Option<&Receipt> {
        self.payment.as_ref()
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn set_client_name(&mut self, name: String) {
        self.client_name = name;
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Article, TaxRate};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn filled_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&Article {
            id: 7,
            name: "Savon".to_string(),
            barcode: "6001234000007".to_string(),
            price_incl_tax: Money::from_cents(500),
            price_excl_tax: Money::from_cents(424),
            stock: 3,
            tax_rate: TaxRate::from_bps(1800),
        })
        .unwrap();
        cart
    }

    #[test]
    fn test_f1_opens_search_even_with_empty_cart() {
        let mut screen = Screen::default();
        assert_eq!(screen.handle_key(Key::F1, &Cart::new(), now()), KeyOutcome::OpenedSearch);
        assert!(screen.is_search_open());
    }

    #[test]
    fn test_f2_and_f5_need_items() {
        let mut screen = Screen::default();
        let empty = Cart::new();
        assert_eq!(screen.handle_key(Key::F2, &empty, now()), KeyOutcome::Ignored);
        assert_eq!(screen.handle_key(Key::F5, &empty, now()), KeyOutcome::Ignored);
        assert!(screen.is_idle());

        let cart = filled_cart();
        assert_eq!(screen.handle_key(Key::F5, &cart, now()), KeyOutcome::OpenedPayment);
        let receipt = screen.receipt().unwrap();
        assert!(receipt.number.starts_with("FAC-"));
        assert_eq!(receipt.totals.gross_total, Money::from_cents(500));
    }

    #[test]
    fn test_escape_priority() {
        let cart = filled_cart();
        let mut screen = Screen::default();
        screen.handle_key(Key::F5, &cart, now());
        screen.handle_key(Key::F2, &cart, now());
        screen.handle_key(Key::F1, &cart, now());

        assert_eq!(screen.handle_key(Key::Escape, &cart, now()), KeyOutcome::ClosedSearch);
        assert_eq!(screen.handle_key(Key::Escape, &cart, now()), KeyOutcome::ClosedDiscount);
        assert_eq!(screen.handle_key(Key::Escape, &cart, now()), KeyOutcome::ClosedPayment);
        assert_eq!(
            screen.handle_key(Key::Escape, &cart, now()),
            KeyOutcome::ConfirmClearCart
        );
        assert_eq!(
            screen.handle_key(Key::Escape, &Cart::new(), now()),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn test_closing_payment_clears_client_name() {
        let cart = filled_cart();
        let mut screen = Screen::new(PaymentMethod::Carte);
        screen.handle_key(Key::F5, &cart, now());
        screen.set_client_name("Awa Diop".to_string());

        screen.handle_key(Key::Escape, &cart, now());

        assert!(!screen.is_payment_open());
        assert_eq!(screen.client_name(), "");
        assert_eq!(screen.payment_method(), PaymentMethod::Carte);
    }
}
