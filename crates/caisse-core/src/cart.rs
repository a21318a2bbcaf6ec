//! # Cart Engine
//!
//! The in-memory shopping cart of the checkout screen.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Operation               Cart Change           │
//! │  ──────────────           ─────────               ───────────           │
//! │                                                                         │
//! │  Scan / pick article ────► add() ─────────────────► merge or push line │
//! │                                                                         │
//! │  + / − on a line ────────► update_quantity() ─────► qty += delta,      │
//! │                                                     removed at ≤ 0     │
//! │                                                                         │
//! │  Trash icon ─────────────► remove() ──────────────► line dropped       │
//! │                                                                         │
//! │  Escape + confirm ───────► clear() ───────────────► lines + discount   │
//! │                                                     reset              │
//! │                                                                         │
//! │  Every change ───────────► totals() recomputed from scratch            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::discount::{Discount, NetTotals};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Article, TaxRate};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Local line identifier. Allocated from a per-cart sequence starting at 1
/// and never reused, not even after `clear()`.
pub type ItemId = u64;

/// A line in the cart.
///
/// Article data is copied when the line is created, so the line keeps the
/// price the cashier saw even if the catalog changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    pub id: ItemId,
    pub article_id: i64,
    pub name: String,
    pub barcode: String,
    /// Unit price TTC.
    pub unit_price: Money,
    /// Unit price HT.
    pub unit_price_excl_tax: Money,
    /// Always ≥ 1 while the line is in the cart.
    pub quantity: i64,
    /// `quantity × unit_price`, kept in sync on every change.
    pub line_total: Money,
    pub tax_rate: TaxRate,
}

impl CartItem {
    fn from_article(id: ItemId, article: &Article) -> Self {
        CartItem {
            id,
            article_id: article.id,
            name: article.name.clone(),
            barcode: article.barcode.clone(),
            unit_price: article.price_incl_tax,
            unit_price_excl_tax: article.price_excl_tax,
            quantity: 1,
            line_total: article.price_incl_tax,
            tax_rate: article.tax_rate,
        }
    }

    fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.line_total = self.unit_price.multiply_quantity(quantity);
    }

    /// HT total of the line.
    pub fn line_total_excl_tax(&self) -> Money {
        self.unit_price_excl_tax.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines keep insertion order
/// - Lines are unique by `article_id`
/// - Every line has `quantity >= 1` and `line_total == quantity × unit_price`
/// - At most [`MAX_CART_ITEMS`] lines, at most [`MAX_ITEM_QUANTITY`] per line
/// - Clearing the cart also removes the discount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    discount: Discount,
    next_item_id: ItemId,
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            discount: Discount::None,
            next_item_id: 1,
        }
    }

    /// Adds one unit of an article.
    ///
    /// ## Behavior
    /// - Article already in cart: quantity + 1
    /// - Otherwise: new line with quantity 1
    ///
    /// ## Returns
    /// The id of the line that now holds the article.
    pub fn add(&mut self, article: &Article) -> CoreResult<ItemId> {
        if let Some(item) = self.items.iter_mut().find(|i| i.article_id == article.id) {
            let new_qty = item.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.set_quantity(new_qty);
            return Ok(item.id);
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        let id = self.next_item_id;
        self.next_item_id += 1;
        self.items.push(CartItem::from_article(id, article));
        Ok(id)
    }

    /// Changes a line's quantity by `delta`.
    ///
    /// ## Behavior
    /// - Resulting quantity ≤ 0: the line is removed
    /// - Unknown line: nothing happens
    /// - Resulting quantity above the cap: error, line unchanged
    pub fn update_quantity(&mut self, item_id: ItemId, delta: i64) -> CoreResult<()> {
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else {
            return Ok(());
        };

        let new_qty = item.quantity.saturating_add(delta);
        if new_qty <= 0 {
            self.remove(item_id);
            return Ok(());
        }
        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }

        item.set_quantity(new_qty);
        Ok(())
    }

    /// Removes a line. Returns false when the line was not in the cart.
    pub fn remove(&mut self, item_id: ItemId) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != item_id);
        self.items.len() != initial_len
    }

    /// Empties the cart and resets the discount.
    pub fn clear(&mut self) {
        self.items.clear();
        self.discount = Discount::None;
    }

    pub fn set_discount(&mut self, discount: Discount) {
        self.discount = discount;
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn lines(&self) -> &[CartItem] {
        &self.items
    }

    pub fn line(&self, item_id: ItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity of all lines (the "N articles" figure).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gross TTC total.
    pub fn gross_total(&self) -> Money {
        self.items.iter().map(|i| i.line_total).sum()
    }

    /// Gross HT total.
    pub fn gross_excl_tax(&self) -> Money {
        self.items.iter().map(|i| i.line_total_excl_tax()).sum()
    }

    /// Recomputes every displayed total.
    pub fn totals(&self) -> CartTotals {
        let gross_total = self.gross_total();
        let gross_excl_tax = self.gross_excl_tax();
        let NetTotals {
            discount,
            net_excl_tax,
            net_tax,
            net_total,
        } = self.discount.apply(gross_excl_tax, gross_total);

        CartTotals {
            line_count: self.line_count(),
            item_count: self.item_count(),
            gross_excl_tax,
            gross_tax: gross_total - gross_excl_tax,
            gross_total,
            discount,
            net_excl_tax,
            net_tax,
            net_total,
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Every figure the cart panel and the receipt display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub gross_excl_tax: Money,
    pub gross_tax: Money,
    pub gross_total: Money,
    pub discount: Money,
    pub net_excl_tax: Money,
    pub net_tax: Money,
    pub net_total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        cart.totals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64, ttc: i64, ht: i64) -> Article {
        Article {
            id,
            name: format!("Article {}", id),
            barcode: format!("37601234500{:02}", id),
            price_incl_tax: Money::from_cents(ttc),
            price_excl_tax: Money::from_cents(ht),
            stock: 10,
            tax_rate: TaxRate::from_bps(550),
        }
    }

    #[test]
    fn test_add_same_article_twice_merges() {
        let mut cart = Cart::new();
        let bread = article(1, 300, 284);

        let first = cart.add(&bread).unwrap();
        let second = cart.add(&bread).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.line_count(), 1);
        let line = cart.line(first).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_total, Money::from_cents(600));
    }

    #[test]
    fn test_absurd_server_price_does_not_overflow() {
        let mut cart = Cart::new();
        let mut gold = article(9, 0, 0);
        gold.price_incl_tax = Money::from_major_f64(1e17);
        gold.price_excl_tax = Money::from_major_f64(1e17);

        let id = cart.add(&gold).unwrap();
        cart.add(&gold).unwrap();
        cart.add(&article(1, 300, 284)).unwrap();

        assert_eq!(cart.line(id).unwrap().line_total.cents(), i64::MAX);
        let totals = cart.totals();
        assert_eq!(totals.gross_total.cents(), i64::MAX);
        assert_eq!(totals.net_total.cents(), i64::MAX);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&article(3, 100, 90)).unwrap();
        cart.add(&article(1, 100, 90)).unwrap();
        cart.add(&article(3, 100, 90)).unwrap();
        cart.add(&article(2, 100, 90)).unwrap();

        let ids: Vec<i64> = cart.lines().iter().map(|l| l.article_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_update_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        let id = cart.add(&article(1, 300, 284)).unwrap();

        cart.update_quantity(id, -1).unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.totals().gross_total, Money::zero());
    }

    #[test]
    fn test_update_quantity_recomputes_line_total() {
        let mut cart = Cart::new();
        let id = cart.add(&article(1, 120, 113)).unwrap();

        cart.update_quantity(id, 4).unwrap();
        assert_eq!(cart.line(id).unwrap().quantity, 5);
        assert_eq!(cart.line(id).unwrap().line_total, Money::from_cents(600));

        cart.update_quantity(id, -10).unwrap();
        assert!(cart.line(id).is_none());
    }

    #[test]
    fn test_update_unknown_line_is_noop() {
        let mut cart = Cart::new();
        cart.add(&article(1, 300, 284)).unwrap();
        let before = cart.clone();

        cart.update_quantity(42, 1).unwrap();
        assert_eq!(cart, before);
        assert!(!cart.remove(42));
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        let id = cart.add(&article(1, 100, 90)).unwrap();
        cart.update_quantity(id, MAX_ITEM_QUANTITY - 1).unwrap();

        let err = cart.add(&article(1, 100, 90)).unwrap_err();
        assert_eq!(
            err,
            CoreError::QuantityTooLarge {
                requested: MAX_ITEM_QUANTITY + 1,
                max: MAX_ITEM_QUANTITY
            }
        );
        assert!(cart.update_quantity(id, 1).is_err());
        assert_eq!(cart.line(id).unwrap().quantity, MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_line_cap() {
        let mut cart = Cart::new();
        for id in 0..MAX_CART_ITEMS as i64 {
            cart.add(&article(id, 100, 90)).unwrap();
        }
        let err = cart.add(&article(10_000, 100, 90)).unwrap_err();
        assert_eq!(err, CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        assert_eq!(cart.line_count(), MAX_CART_ITEMS);
    }

    #[test]
    fn test_totals_with_ten_percent_discount() {
        let mut cart = Cart::new();
        let bread = article(1, 300, 284);
        let milk = article(2, 120, 113);
        cart.add(&bread).unwrap();
        cart.add(&bread).unwrap();
        cart.add(&milk).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.gross_total, Money::from_cents(720));
        assert_eq!(totals.gross_excl_tax, Money::from_cents(681));
        assert_eq!(totals.gross_tax, Money::from_cents(39));

        cart.set_discount(Discount::percent(10.0).unwrap());
        let totals = cart.totals();
        assert_eq!(totals.discount, Money::from_cents(72));
        assert_eq!(totals.net_total, Money::from_cents(648));
        assert_eq!(totals.net_excl_tax + totals.net_tax, totals.net_total);
    }

    #[test]
    fn test_clear_resets_discount_and_keeps_id_sequence() {
        let mut cart = Cart::new();
        let first = cart.add(&article(1, 300, 284)).unwrap();
        cart.set_discount(Discount::amount(1.0).unwrap());

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.discount(), Discount::None);
        let next = cart.add(&article(1, 300, 284)).unwrap();
        assert!(next > first);
    }
}
