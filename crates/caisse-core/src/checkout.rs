//! # Checkout State
//!
//! Everything the checkout screen holds, owned in one place: the cart (with
//! its discount), the modal state and the last search results.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CheckoutState                                    │
//! │                                                                         │
//! │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────────────┐   │
//! │   │     Cart     │   │    Screen    │   │  Search results          │   │
//! │   │  lines       │   │  modal flags │   │  query + Vec<Article>    │   │
//! │   │  discount    │   │  client name │   │  (last response wins)    │   │
//! │   └──────────────┘   │  payment     │   └──────────────────────────┘   │
//! │                      └──────────────┘                                   │
//! │                                                                         │
//! │   Every method is synchronous. Network calls live in caisse-client,    │
//! │   which feeds their results back through these methods and then        │
//! │   publishes snapshot() to the views.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, CartItem, CartTotals, ItemId};
use crate::discount::{Discount, DiscountKind};
use crate::error::{CoreError, CoreResult};
use crate::receipt::Receipt;
use crate::screen::{Key, KeyOutcome, Screen};
use crate::types::{Article, PaymentMethod};
use crate::validation::validate_client_name;

/// Owned state of one checkout screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutState {
    cart: Cart,
    screen: Screen,
    search_query: String,
    search_results: Vec<Article>,
    last_invoice: Option<String>,
}

impl CheckoutState {
    pub fn new(default_method: PaymentMethod) -> Self {
        CheckoutState {
            screen: Screen::new(default_method),
            ..Default::default()
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    // =========================================================================
    // Cart
    // =========================================================================

    // A draft receipt on screen always matches the cart: every cart or
    // discount change below goes through refresh_payment.

    pub fn add_article(&mut self, article: &Article) -> CoreResult<ItemId> {
        let id = self.cart.add(article)?;
        self.screen.refresh_payment(&self.cart);
        Ok(id)
    }

    pub fn update_quantity(&mut self, item_id: ItemId, delta: i64) -> CoreResult<()> {
        self.cart.update_quantity(item_id, delta)?;
        self.screen.refresh_payment(&self.cart);
        Ok(())
    }

    pub fn remove(&mut self, item_id: ItemId) -> bool {
        let removed = self.cart.remove(item_id);
        self.screen.refresh_payment(&self.cart);
        removed
    }

    /// Empties the cart after the cashier confirmed. Also drops the discount.
    pub fn confirm_clear(&mut self) {
        self.cart.clear();
        self.screen.refresh_payment(&self.cart);
    }

    /// Validates the discount form, applies it and closes the discount modal.
    ///
    /// On invalid input nothing changes and the modal stays open.
    pub fn apply_discount(&mut self, kind: DiscountKind, input: &str) -> CoreResult<Discount> {
        let discount = Discount::parse(kind, input)?;
        self.cart.set_discount(discount);
        self.screen.close_discount();
        self.screen.refresh_payment(&self.cart);
        Ok(discount)
    }

    // =========================================================================
    // Keys & modals
    // =========================================================================

    /// Routes a key press, stamping any draft receipt with the local time.
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        self.handle_key_at(key, Local::now().naive_local())
    }

    pub fn handle_key_at(&mut self, key: Key, issued_at: NaiveDateTime) -> KeyOutcome {
        let outcome = self.screen.handle_key(key, &self.cart, issued_at);
        if outcome == KeyOutcome::ClosedSearch {
            self.clear_search();
        }
        outcome
    }

    pub fn set_client_name(&mut self, name: &str) -> CoreResult<()> {
        let name = validate_client_name(name)?;
        self.screen.set_client_name(name);
        Ok(())
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.screen.set_payment_method(method);
    }

    // =========================================================================
    // Search results
    // =========================================================================

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    /// Replaces the result list with a response.
    ///
    /// Responses are not ordered: whichever arrives last is shown.
    pub fn set_search_results(&mut self, query: &str, results: Vec<Article>) {
        self.search_query = query.to_string();
        self.search_results = results;
    }

    pub fn search_results(&self) -> &[Article] {
        &self.search_results
    }

    /// Adds the result at `index` to the cart and closes the search modal.
    pub fn add_from_results(&mut self, index: usize) -> CoreResult<ItemId> {
        let article = self
            .search_results
            .get(index)
            .cloned()
            .ok_or(CoreError::NoSuchResult(index))?;
        let id = self.cart.add(&article)?;
        self.screen.close_search();
        self.screen.refresh_payment(&self.cart);
        self.clear_search();
        Ok(id)
    }

    /// Closing the search modal forgets the query and its results.
    fn clear_search(&mut self) {
        self.search_query.clear();
        self.search_results.clear();
    }

    // =========================================================================
    // Sale completion
    // =========================================================================

    /// Records an accepted sale: empties the cart, resets the discount and
    /// closes the payment modal.
    pub fn complete_sale(&mut self, invoice_number: String) {
        self.cart.clear();
        self.screen.close_payment();
        self.last_invoice = Some(invoice_number);
    }

    /// Number of the last invoice the backend accepted.
    pub fn last_invoice(&self) -> Option<&str> {
        self.last_invoice.as_deref()
    }

    pub fn snapshot(&self) -> CheckoutSnapshot {
        CheckoutSnapshot {
            lines: self.cart.lines().to_vec(),
            totals: self.cart.totals(),
            discount: self.cart.discount(),
            search_open: self.screen.is_search_open(),
            discount_open: self.screen.is_discount_open(),
            receipt: self.screen.receipt().cloned(),
            search_query: self.search_query.clone(),
            search_results: self.search_results.clone(),
            client_name: self.screen.client_name().to_string(),
            payment_method: self.screen.payment_method(),
            last_invoice: self.last_invoice.clone(),
        }
    }
}

/// Read-only copy of the checkout state handed to views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutSnapshot {
    pub lines: Vec<CartItem>,
    pub totals: CartTotals,
    pub discount: Discount,
    pub search_open: bool,
    pub discount_open: bool,
    /// Draft receipt while the payment modal is open.
    pub receipt: Option<Receipt>,
    pub search_query: String,
    pub search_results: Vec<Article>,
    pub client_name: String,
    pub payment_method: PaymentMethod,
    pub last_invoice: Option<String>,
}

impl CheckoutSnapshot {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::TaxRate;

    fn article(id: i64, name: &str, ttc: i64, ht: i64) -> Article {
        Article {
            id,
            name: name.to_string(),
            barcode: format!("37600000000{:02}", id),
            price_incl_tax: Money::from_cents(ttc),
            price_excl_tax: Money::from_cents(ht),
            stock: 20,
            tax_rate: TaxRate::from_bps(550),
        }
    }

    #[test]
    fn test_add_from_results_closes_search() {
        let mut state = CheckoutState::default();
        state.handle_key(Key::F1);
        state.set_search_results("", vec![article(1, "Pain", 300, 284), article(2, "Lait", 120, 113)]);

        state.add_from_results(1).unwrap();

        assert!(!state.screen().is_search_open());
        assert!(state.search_results().is_empty());
        assert_eq!(state.cart().lines()[0].article_id, 2);
        assert_eq!(state.add_from_results(0), Err(CoreError::NoSuchResult(0)));
    }

    #[test]
    fn test_invalid_discount_keeps_modal_open() {
        let mut state = CheckoutState::default();
        state.add_article(&article(1, "Pain", 300, 284)).unwrap();
        state.handle_key(Key::F2);

        assert!(state.apply_discount(DiscountKind::Percent, "0").is_err());
        assert!(state.screen().is_discount_open());
        assert_eq!(state.cart().discount(), Discount::None);

        state.apply_discount(DiscountKind::Percent, "10").unwrap();
        assert!(!state.screen().is_discount_open());
        assert_eq!(state.cart().totals().discount, Money::from_cents(30));
    }

    #[test]
    fn test_complete_sale_resets_screen() {
        let mut state = CheckoutState::new(PaymentMethod::Carte);
        state.add_article(&article(1, "Pain", 300, 284)).unwrap();
        state.apply_discount(DiscountKind::Amount, "1").unwrap();
        assert_eq!(state.handle_key(Key::F5), KeyOutcome::OpenedPayment);
        state.set_client_name("Client comptoir").unwrap();

        state.complete_sale("FAC-00000042".to_string());

        let snapshot = state.snapshot();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.discount, Discount::None);
        assert!(snapshot.receipt.is_none());
        assert_eq!(snapshot.client_name, "");
        assert_eq!(snapshot.payment_method, PaymentMethod::Carte);
        assert_eq!(state.last_invoice(), Some("FAC-00000042"));
    }

    #[test]
    fn test_escape_then_confirm_clear() {
        let mut state = CheckoutState::default();
        state.add_article(&article(1, "Pain", 300, 284)).unwrap();
        state.apply_discount(DiscountKind::Percent, "5").unwrap();

        assert_eq!(state.handle_key(Key::Escape), KeyOutcome::ConfirmClearCart);
        assert_eq!(state.cart().line_count(), 1);

        state.confirm_clear();
        assert!(state.cart().is_empty());
        assert_eq!(state.cart().discount(), Discount::None);
    }

    #[test]
    fn test_receipt_follows_cart_while_paying() {
        let mut state = CheckoutState::default();
        let bread = article(1, "Pain", 300, 284);
        let milk_id = state.add_article(&article(2, "Lait", 120, 113)).unwrap();
        state.add_article(&bread).unwrap();
        assert_eq!(state.handle_key(Key::F5), KeyOutcome::OpenedPayment);
        let opened = state.screen().receipt().unwrap().clone();

        state.handle_key(Key::F1);
        state.set_search_results("pain", vec![bread.clone()]);
        state.add_from_results(0).unwrap();
        state.handle_key(Key::F2);
        state.apply_discount(DiscountKind::Percent, "10").unwrap();
        state.remove(milk_id);

        let receipt = state.screen().receipt().unwrap();
        assert_eq!(receipt.number, opened.number);
        assert_eq!(receipt.issued_at, opened.issued_at);
        assert_eq!(receipt.lines.len(), 1);
        assert_eq!(receipt.lines[0].quantity, 2);
        assert_eq!(receipt.totals, state.cart().totals());
        assert_eq!(receipt.totals.discount, Money::from_cents(60));
    }

    #[test]
    fn test_emptying_cart_closes_payment() {
        let mut state = CheckoutState::default();
        let id = state.add_article(&article(1, "Pain", 300, 284)).unwrap();
        state.handle_key(Key::F5);
        state.set_client_name("Awa").unwrap();

        state.update_quantity(id, -1).unwrap();

        assert!(!state.screen().is_payment_open());
        assert_eq!(state.screen().client_name(), "");
    }

    #[test]
    fn test_snapshot_reflects_totals() {
        let mut state = CheckoutState::default();
        let bread = article(1, "Pain", 300, 284);
        state.add_article(&bread).unwrap();
        state.add_article(&bread).unwrap();
        state.add_article(&article(2, "Lait", 120, 113)).unwrap();

        let snapshot = state.snapshot();
        assert_eq!(snapshot.lines.len(), 2);
        assert_eq!(snapshot.totals.item_count, 3);
        assert_eq!(snapshot.totals.gross_total, Money::from_cents(720));
    }
}
