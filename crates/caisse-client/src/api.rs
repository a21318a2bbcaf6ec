//! # Backend API Client
//!
//! Thin async wrapper over the checkout backend's HTTP endpoints.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  search("pain") ─────► GET /caisse/api/search/?q=pain                   │
//! │                          ◄── { articles: [...] } ──► Vec<Article>       │
//! │                                                                         │
//! │  create_invoice(req) ─► csrf_token() ─┬─ cached / configured ──┐        │
//! │                                       └─ GET /caisse/ (scrape) ─┤        │
//! │                                                                 ▼        │
//! │                        POST /caisse/api/facture/create/  X-CSRFToken    │
//! │                          ◄── { success, numero_facture } ──► Ok         │
//! │                          ◄── { error } (any status)      ──► Rejected   │
//! │                                                                         │
//! │  Cookies (session id, csrftoken) are kept by the client's cookie store. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use caisse_core::validation::{validate_barcode, validate_search_query};
use caisse_core::{Article, InvoiceSummary};
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::config::CaisseConfig;
use crate::csrf::extract_csrf_token;
use crate::error::{ClientError, ClientResult};
use crate::protocol::{
    InvoiceReceipt, InvoiceRequest, InvoiceResponse, RecentInvoicesResponse, SearchResponse,
    CHECKOUT_PAGE_PATH, CREATE_INVOICE_PATH, CSRF_HEADER, RECENT_INVOICES_PATH, SEARCH_PATH,
};

/// Handle on the checkout backend. Cheap to clone; clones share the
/// connection pool, the cookie store and the CSRF token.
#[derive(Debug, Clone)]
pub struct CaisseApi {
    client: Client,
    base: Url,
    csrf_token: Arc<RwLock<Option<String>>>,
}

impl CaisseApi {
    pub fn new(config: &CaisseConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base: Url::parse(&config.server.base_url)?,
            csrf_token: Arc::new(RwLock::new(config.server.csrf_token.clone())),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path)?)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Searches the catalog by name or barcode. An empty query asks for the
    /// whole catalog.
    pub async fn search(&self, query: &str) -> ClientResult<Vec<Article>> {
        let query = validate_search_query(query)?;
        let mut url = self.endpoint(SEARCH_PATH)?;
        url.query_pairs_mut().append_pair("q", &query);

        debug!(query = %query, "Searching articles");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "Search request failed: {}",
                response.status()
            )));
        }

        let result: SearchResponse = response.json().await?;
        debug!(query = %query, count = result.articles.len(), "Search results received");
        Ok(result.articles.into_iter().map(Article::from).collect())
    }

    /// Looks up a scanned barcode. The first match wins.
    pub async fn find_by_barcode(&self, barcode: &str) -> ClientResult<Article> {
        let barcode = validate_barcode(barcode)?;
        self.search(&barcode)
            .await?
            .into_iter()
            .next()
            .ok_or(ClientError::ArticleNotFound { barcode })
    }

    // =========================================================================
    // History
    // =========================================================================

    pub async fn recent_invoices(&self) -> ClientResult<Vec<InvoiceSummary>> {
        let url = self.endpoint(RECENT_INVOICES_PATH)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "Recent invoices request failed: {}",
                response.status()
            )));
        }

        let result: RecentInvoicesResponse = response.json().await?;
        Ok(result.factures.into_iter().map(InvoiceSummary::from).collect())
    }

    // =========================================================================
    // CSRF
    // =========================================================================

    /// Fetches the checkout page and stores the token found in it.
    pub async fn refresh_csrf_token(&self) -> ClientResult<String> {
        let url = self.endpoint(CHECKOUT_PAGE_PATH)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "Checkout page request failed: {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        let token = extract_csrf_token(&html).ok_or(ClientError::MissingCsrfToken)?;
        debug!("CSRF token refreshed from checkout page");

        *self.csrf_token.write().await = Some(token.clone());
        Ok(token)
    }

    async fn csrf_token(&self) -> ClientResult<String> {
        if let Some(token) = self.csrf_token.read().await.clone() {
            return Ok(token);
        }
        self.refresh_csrf_token().await
    }

    // =========================================================================
    // Invoice
    // =========================================================================

    /// Creates the invoice. No retry on any failure.
    ///
    /// ## Errors
    /// - `Rejected`: the backend answered with `success: false` or an
    ///   `error` field, whatever the status code
    /// - `Transport` / `InvalidResponse`: the answer never came or was not
    ///   the expected JSON
    pub async fn create_invoice(&self, request: &InvoiceRequest) -> ClientResult<InvoiceReceipt> {
        let token = self.csrf_token().await?;
        let url = self.endpoint(CREATE_INVOICE_PATH)?;

        debug!(items = request.items.len(), mode = %request.mode_paiement, "Posting invoice");
        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER, token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let result: InvoiceResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(%status, error = %e, "Invoice endpoint returned a non-JSON body");
            ClientError::InvalidResponse(format!("HTTP {}: {}", status, e))
        })?;

        match result {
            InvoiceResponse {
                success: true,
                numero_facture: Some(number),
                facture_id,
                ..
            } => Ok(InvoiceReceipt {
                number,
                id: facture_id,
            }),
            InvoiceResponse {
                success: true,
                numero_facture: None,
                ..
            } => Err(ClientError::InvalidResponse(
                "Invoice accepted without a number".to_string(),
            )),
            InvoiceResponse { error, .. } => {
                let message = error.unwrap_or_else(|| format!("HTTP {}", status));
                warn!(%status, error = %message, "Invoice rejected by server");
                Err(ClientError::Rejected(message))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
