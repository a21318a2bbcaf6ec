//! # caisse-core: Pure Checkout Logic
//!
//! Everything the checkout screen decides without talking to the network:
//! the cart, discounts, the TTC/HT split, the provisional receipt and the
//! modal/keyboard state machine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caisse Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/caisse-terminal (front end)                │   │
//! │  │       keys ──► session ──► watch snapshots ──► views            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        caisse-client (HTTP search / invoice, debounce)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caisse-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   money   cart   discount   receipt   screen   checkout   view  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE STATE TRANSITIONS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer money (hundredths of the currency unit)
//! - [`types`] - Articles, tax rates, payment methods, invoice summaries
//! - [`cart`] - Cart engine
//! - [`discount`] - Discount calculator and TTC/HT redistribution
//! - [`receipt`] - Provisional receipt snapshot
//! - [`screen`] - Modal and keyboard state machine
//! - [`checkout`] - Owned checkout state tying the above together
//! - [`view`] - Plain-text renderers
//! - [`validation`] - Input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use caisse_core::{Article, Cart, Discount, Money, TaxRate};
//!
//! let bread = Article {
//!     id: 1,
//!     name: "Pain de campagne".to_string(),
//!     barcode: "3760123450001".to_string(),
//!     price_incl_tax: Money::from_cents(300),
//!     price_excl_tax: Money::from_cents(284),
//!     stock: 49,
//!     tax_rate: TaxRate::from_bps(550),
//! };
//!
//! let mut cart = Cart::new();
//! cart.add(&bread).unwrap();
//! cart.add(&bread).unwrap();
//! cart.set_discount(Discount::percent(10.0).unwrap());
//!
//! let totals = cart.totals();
//! assert_eq!(totals.gross_total.cents(), 600);
//! assert_eq!(totals.discount.cents(), 60);
//! assert_eq!(totals.net_total.cents(), 540);
//! ```

pub mod cart;
pub mod checkout;
pub mod discount;
pub mod error;
pub mod money;
pub mod receipt;
pub mod screen;
pub mod types;
pub mod validation;
pub mod view;

pub use cart::{Cart, CartItem, CartTotals, ItemId};
pub use checkout::{CheckoutSnapshot, CheckoutState};
pub use discount::{Discount, DiscountKind};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use receipt::{Receipt, ReceiptLine};
pub use screen::{Key, KeyOutcome, Screen};
pub use types::*;

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Stops a stuck scanner or a typo from ringing up a thousand units.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Prefix of every invoice number, provisional or server-assigned.
pub const INVOICE_NUMBER_PREFIX: &str = "FAC-";
