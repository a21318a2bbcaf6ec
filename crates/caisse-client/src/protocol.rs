//! # Wire Protocol
//!
//! JSON bodies exchanged with the checkout backend, and their conversion
//! to and from caisse-core types.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /caisse/                      checkout page (CSRF token)         │
//! │  GET  /caisse/api/search/?q=…       ──► SearchResponse                 │
//! │  GET  /caisse/api/factures/recent/  ──► RecentInvoicesResponse         │
//! │  POST /caisse/api/facture/create/   InvoiceRequest ──► InvoiceResponse │
//! │                                      (header X-CSRFToken)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names are the backend's (French) ones. Amounts travel as decimal
//! numbers and become [`Money`] here, once.

use caisse_core::{Article, Cart, InvoiceSummary, Money, PaymentMethod, TaxRate};
use serde::{Deserialize, Serialize};

// =============================================================================
// Paths
// =============================================================================

pub const CHECKOUT_PAGE_PATH: &str = "/caisse/";
pub const SEARCH_PATH: &str = "/caisse/api/search/";
pub const RECENT_INVOICES_PATH: &str = "/caisse/api/factures/recent/";
pub const CREATE_INVOICE_PATH: &str = "/caisse/api/facture/create/";

/// Header carrying the CSRF token on POST requests.
pub const CSRF_HEADER: &str = "X-CSRFToken";

// =============================================================================
// Search
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub articles: Vec<ArticleDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDto {
    pub id: i64,
    pub nom: String,
    #[serde(default)]
    pub code_barres: String,
    pub prix_ttc: f64,
    pub prix_ht: f64,
    #[serde(default)]
    pub stock: i64,
    /// Percentage (18.0 = 18 %). Older backends omit it.
    #[serde(default)]
    pub tva_rate: Option<f64>,
}

impl From<ArticleDto> for Article {
    fn from(dto: ArticleDto) -> Self {
        Article {
            id: dto.id,
            name: dto.nom,
            barcode: dto.code_barres,
            price_incl_tax: Money::from_major_f64(dto.prix_ttc),
            price_excl_tax: Money::from_major_f64(dto.prix_ht),
            stock: dto.stock,
            tax_rate: dto.tva_rate.map(TaxRate::from_percentage).unwrap_or_default(),
        }
    }
}

// =============================================================================
// Recent invoices
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentInvoicesResponse {
    #[serde(default)]
    pub factures: Vec<InvoiceSummaryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSummaryDto {
    pub numero: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub mode_paiement: String,
    pub total_ttc: f64,
}

impl From<InvoiceSummaryDto> for InvoiceSummary {
    fn from(dto: InvoiceSummaryDto) -> Self {
        InvoiceSummary {
            number: dto.numero,
            date: dto.date,
            client: dto.client,
            payment_method: dto.mode_paiement,
            total_incl_tax: Money::from_major_f64(dto.total_ttc),
        }
    }
}

// =============================================================================
// Invoice creation
// =============================================================================

/// Body of `POST /caisse/api/facture/create/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub items: Vec<InvoiceItemDto>,
    /// Empty for an anonymous customer.
    pub client_name: String,
    pub mode_paiement: PaymentMethod,
    pub remise: RemiseDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItemDto {
    pub article_id: i64,
    pub quantite: i64,
    pub prix_unitaire: f64,
    pub total: f64,
}

/// Discount block: `type` is `none`, `percent` or `amount`; `value` is what
/// the cashier typed; `amount` is the computed reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemiseDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
    pub amount: f64,
}

impl InvoiceRequest {
    /// Packages the cart and the payment form.
    pub fn from_cart(cart: &Cart, client_name: &str, method: PaymentMethod) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| InvoiceItemDto {
                article_id: line.article_id,
                quantite: line.quantity,
                prix_unitaire: line.unit_price.to_major_f64(),
                total: line.line_total.to_major_f64(),
            })
            .collect();

        let discount = cart.discount();
        let totals = cart.totals();

        InvoiceRequest {
            items,
            client_name: client_name.to_string(),
            mode_paiement: method,
            remise: RemiseDto {
                kind: discount.kind().code().to_string(),
                value: discount.value(),
                amount: totals.discount.to_major_f64(),
            },
        }
    }
}

/// Answer of the invoice endpoint, for every status code.
///
/// A 4xx/5xx answer is usually `{ "error": "…" }` with no `success` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub numero_facture: Option<String>,
    #[serde(default)]
    pub facture_id: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of an accepted invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceReceipt {
    /// Server-assigned number, e.g. `FAC-00000042`.
    pub number: String,
    pub id: Option<i64>,
}
