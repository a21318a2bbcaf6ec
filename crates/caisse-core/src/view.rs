//! # Text Views
//!
//! Plain-text renderings of a [`CheckoutSnapshot`]. Views never mutate
//! state; they are fed snapshots and return strings.
//!
//! ```text
//! Panier (3 articles)
//! ──────────────────────────────────────────────────────
//! [1] Pain                   3.00 FCFA  TVA 5.5%   x2      6.00 FCFA
//! [2] Lait                   1.20 FCFA  TVA 5.5%   x1      1.20 FCFA
//! ──────────────────────────────────────────────────────
//! Total HT                                     6.81 FCFA
//! TVA                                          0.39 FCFA
//! Total TTC                                    7.20 FCFA
//! ```

use std::fmt::Write;

use crate::checkout::CheckoutSnapshot;
use crate::money::Money;
use crate::receipt::Receipt;
use crate::types::{Article, InvoiceSummary, PaymentMethod};

const RULE: &str = "──────────────────────────────────────────────────────";

/// Text shown when the cart has no lines.
pub const EMPTY_CART: &str = "Panier vide";

/// Text shown when a search returns nothing.
pub const NO_RESULTS: &str = "Aucun article trouvé";

/// Currency suffix appended to every amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub suffix: String,
}

impl CurrencyFormat {
    pub fn new(suffix: impl Into<String>) -> Self {
        CurrencyFormat {
            suffix: suffix.into(),
        }
    }

    /// `7.20 FCFA`
    pub fn format(&self, amount: Money) -> String {
        if self.suffix.is_empty() {
            amount.to_string()
        } else {
            format!("{} {}", amount, self.suffix)
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat::new("FCFA")
    }
}

/// `Panier (1 article)` / `Panier (3 articles)`
pub fn cart_title(item_count: i64) -> String {
    let plural = if item_count > 1 { "s" } else { "" };
    format!("Panier ({} article{})", item_count, plural)
}

// =============================================================================
// Cart Panel
// =============================================================================

pub fn render_cart(snapshot: &CheckoutSnapshot, currency: &CurrencyFormat) -> String {
    let mut out = String::new();
    let totals = &snapshot.totals;

    let _ = writeln!(out, "{}", cart_title(totals.item_count));
    let _ = writeln!(out, "{}", RULE);

    if snapshot.is_empty() {
        let _ = writeln!(out, "{}", EMPTY_CART);
    } else {
        for line in &snapshot.lines {
            let _ = writeln!(
                out,
                "[{}] {:<22} {:>14}  TVA {:<6} x{:<4} {:>14}",
                line.id,
                line.name,
                currency.format(line.unit_price),
                line.tax_rate.to_string(),
                line.quantity,
                currency.format(line.line_total),
            );
        }
    }

    let _ = writeln!(out, "{}", RULE);
    write_amount(&mut out, "Total HT", currency.format(totals.gross_excl_tax));
    write_amount(&mut out, "TVA", currency.format(totals.gross_tax));
    write_amount(&mut out, "Total TTC", currency.format(totals.gross_total));

    if !snapshot.discount.is_none() {
        write_discount(&mut out, totals.discount, totals.net_total, currency);
    }

    if let Some(number) = &snapshot.last_invoice {
        let _ = writeln!(out, "Dernière facture : {}", number);
    }

    out
}

// =============================================================================
// Receipt
// =============================================================================

pub fn render_receipt(receipt: &Receipt, currency: &CurrencyFormat) -> String {
    let mut out = String::new();
    let totals = &receipt.totals;

    let _ = writeln!(out, "Facture N° {}", receipt.number);
    let _ = writeln!(out, "{}", receipt.formatted_date());
    let _ = writeln!(out, "{}", RULE);
    for line in &receipt.lines {
        write_amount(
            &mut out,
            &format!("{} x{}", line.name, line.quantity),
            currency.format(line.line_total),
        );
    }
    let _ = writeln!(out, "{}", RULE);
    write_amount(&mut out, "Total HT", currency.format(totals.gross_excl_tax));
    write_amount(&mut out, "TVA", currency.format(totals.gross_tax));
    write_amount(&mut out, "Total TTC", currency.format(totals.gross_total));

    if receipt.has_discount() {
        write_discount(&mut out, totals.discount, totals.net_total, currency);
    }

    out
}

/// Payment form under the receipt: client name and method menu.
pub fn render_payment_form(client_name: &str, selected: PaymentMethod) -> String {
    let mut out = String::new();
    let client = if client_name.is_empty() {
        "(anonyme)"
    } else {
        client_name
    };
    let _ = writeln!(out, "Client : {}", client);
    for method in PaymentMethod::ALL {
        let marker = if method == selected { '*' } else { ' ' };
        let _ = writeln!(out, " {} {:<14} {}", marker, method.code(), method.label());
    }
    out
}

// =============================================================================
// Search Results
// =============================================================================

pub fn render_search_results(results: &[Article], currency: &CurrencyFormat) -> String {
    if results.is_empty() {
        return format!("{}\n", NO_RESULTS);
    }

    let mut out = String::new();
    for (index, article) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<28} {:<15} {:>14}  Stock: {}",
            index + 1,
            article.name,
            article.barcode,
            currency.format(article.price_incl_tax),
            article.stock,
        );
    }
    out
}

// =============================================================================
// History
// =============================================================================

pub fn render_history(invoices: &[InvoiceSummary], currency: &CurrencyFormat) -> String {
    if invoices.is_empty() {
        return "Aucune facture récente\n".to_string();
    }

    let mut out = String::new();
    for invoice in invoices {
        let _ = writeln!(
            out,
            "{:<14} {:<20} {:<20} {:<13} {:>14}",
            invoice.number,
            invoice.date,
            invoice.client,
            invoice.payment_method,
            currency.format(invoice.total_incl_tax),
        );
    }
    out
}

fn write_amount(out: &mut String, label: &str, amount: String) {
    let _ = writeln!(out, "{:<38} {:>15}", label, amount);
}

fn write_discount(out: &mut String, discount: Money, net: Money, currency: &CurrencyFormat) {
    write_amount(out, "Remise", format!("-{}", currency.format(discount)));
    write_amount(out, "Net à payer", currency.format(net));
}
