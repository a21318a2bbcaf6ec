//! # Checkout Session
//!
//! Owns the [`CheckoutState`], runs the network calls it needs and publishes
//! a fresh [`CheckoutSnapshot`] after every change.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  front end ──► CheckoutSession ──► CheckoutState (caisse-core)          │
//! │     ▲             │   │                    │                            │
//! │     │             │   │ scan / submit      │ snapshot()                 │
//! │     │             │   ▼ (awaited)          ▼                            │
//! │     │             │  CaisseApi ──► backend   watch::Sender ──► views    │
//! │     │             │                                                     │
//! │     │             │ type_query                                          │
//! │     │             ▼                                                     │
//! │     │          Debouncer ──(300 ms)──► search task ──► mpsc ──┐         │
//! │     │                                                         │         │
//! │     └────────── next_search_result() ◄────────────────────────┘         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutations take `&mut self`, so there is a single writer. The only
//! suspension points are the awaited HTTP calls. Debounced searches run on
//! their own task and hand their result back over a channel; the session
//! applies it when the front end polls [`CheckoutSession::next_search_result`].

use caisse_core::{
    Article, CheckoutSnapshot, CheckoutState, DiscountKind, InvoiceSummary, ItemId, Key,
    KeyOutcome, PaymentMethod,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::api::CaisseApi;
use crate::config::CaisseConfig;
use crate::debounce::Debouncer;
use crate::error::{ClientError, ClientResult};
use crate::protocol::{InvoiceReceipt, InvoiceRequest};

/// Result of one search request, tagged with its query.
#[derive(Debug)]
pub struct SearchOutcome {
    pub query: String,
    pub result: ClientResult<Vec<Article>>,
}

pub struct CheckoutSession {
    api: CaisseApi,
    state: CheckoutState,
    snapshots: watch::Sender<CheckoutSnapshot>,
    debouncer: Debouncer,
    results_tx: mpsc::UnboundedSender<SearchOutcome>,
    results_rx: mpsc::UnboundedReceiver<SearchOutcome>,
}

impl CheckoutSession {
    pub fn new(api: CaisseApi, config: &CaisseConfig) -> Self {
        let state = CheckoutState::new(config.payment.default_method);
        let (snapshots, _) = watch::channel(state.snapshot());
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        CheckoutSession {
            api,
            state,
            snapshots,
            debouncer: Debouncer::new(config.debounce()),
            results_tx,
            results_rx,
        }
    }

    /// Builds the API client from the configuration, then the session.
    pub fn from_config(config: &CaisseConfig) -> ClientResult<Self> {
        let api = CaisseApi::new(config)?;
        Ok(Self::new(api, config))
    }

    /// Receiver of state snapshots. Starts with the current state.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn snapshot(&self) -> CheckoutSnapshot {
        self.state.snapshot()
    }

    pub fn api(&self) -> &CaisseApi {
        &self.api
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }

    // =========================================================================
    // Scanning & search
    // =========================================================================

    /// Looks up a scanned barcode and adds the first match to the cart.
    ///
    /// Blank input is ignored and returns `Ok(None)` without any request.
    pub async fn scan(&mut self, barcode: &str) -> ClientResult<Option<ItemId>> {
        if barcode.trim().is_empty() {
            return Ok(None);
        }

        let article = match self.api.find_by_barcode(barcode).await {
            Ok(article) => article,
            Err(e) => {
                warn!(barcode = %barcode.trim(), error = %e, "Scan failed");
                return Err(e);
            }
        };

        let id = self.state.add_article(&article)?;
        debug!(article_id = %article.id, item_id = id, "Scanned article added");
        self.publish();
        Ok(Some(id))
    }

    /// Adds an article already in hand (e.g. from a previous search).
    pub fn add_article(&mut self, article: &Article) -> ClientResult<ItemId> {
        let id = self.state.add_article(article)?;
        debug!(article_id = %article.id, item_id = id, "Article added");
        self.publish();
        Ok(id)
    }

    /// Runs a search now and shows its results.
    pub async fn search(&mut self, query: &str) -> ClientResult<usize> {
        self.debouncer.cancel();
        let result = self.api.search(query).await;
        self.apply_search_outcome(SearchOutcome {
            query: query.to_string(),
            result,
        })
    }

    /// Records a keystroke in the search box. The request fires once the
    /// quiet period has elapsed without another keystroke.
    pub fn type_query(&mut self, query: &str) {
        self.state.set_search_query(query);
        self.publish();

        let api = self.api.clone();
        let tx = self.results_tx.clone();
        let query = query.to_string();
        self.debouncer.call(async move {
            let result = api.search(&query).await;
            let _ = tx.send(SearchOutcome { query, result });
        });
    }

    /// Waits for the next debounced search response and applies it.
    ///
    /// Returns the number of results shown. Never resolves while nothing is
    /// in flight, so it is meant for a `select!` loop.
    pub async fn next_search_result(&mut self) -> ClientResult<usize> {
        match self.results_rx.recv().await {
            Some(outcome) => self.apply_search_outcome(outcome),
            // The session holds a sender, so the channel never closes.
            None => Ok(0),
        }
    }

    /// Applies every search response already received.
    pub fn drain_search_results(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.results_rx.try_recv() {
            if self.apply_search_outcome(outcome).is_ok() {
                applied += 1;
            }
        }
        applied
    }

    fn apply_search_outcome(&mut self, outcome: SearchOutcome) -> ClientResult<usize> {
        if !self.state.screen().is_search_open() {
            debug!(query = %outcome.query, "Search response arrived after modal closed, dropped");
            return Ok(0);
        }

        match outcome.result {
            Ok(articles) => {
                let count = articles.len();
                debug!(query = %outcome.query, count, "Search results shown");
                self.state.set_search_results(&outcome.query, articles);
                self.publish();
                Ok(count)
            }
            Err(e) => {
                warn!(query = %outcome.query, error = %e, "Search failed");
                Err(e)
            }
        }
    }

    /// Adds the search result at `index` and closes the search modal.
    pub fn add_from_results(&mut self, index: usize) -> ClientResult<ItemId> {
        let id = self.state.add_from_results(index)?;
        self.debouncer.cancel();
        self.publish();
        Ok(id)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn update_quantity(&mut self, item_id: ItemId, delta: i64) -> ClientResult<()> {
        self.state.update_quantity(item_id, delta)?;
        debug!(item_id, delta, "Quantity updated");
        self.publish();
        Ok(())
    }

    pub fn remove(&mut self, item_id: ItemId) -> bool {
        let removed = self.state.remove(item_id);
        if removed {
            debug!(item_id, "Line removed");
            self.publish();
        }
        removed
    }

    /// Empties the cart once the cashier confirmed.
    pub fn confirm_clear(&mut self) {
        self.state.confirm_clear();
        debug!("Cart cleared");
        self.publish();
    }

    pub fn apply_discount(&mut self, kind: DiscountKind, input: &str) -> ClientResult<()> {
        let discount = self.state.apply_discount(kind, input)?;
        let totals = self.state.cart().totals();
        debug!(kind = kind.code(), discount = %totals.discount, net = %totals.net_total, ?discount, "Discount applied");
        self.publish();
        Ok(())
    }

    // =========================================================================
    // Keys & payment form
    // =========================================================================

    /// Routes a key press. Opening the search modal loads the whole catalog.
    pub async fn handle_key(&mut self, key: Key) -> ClientResult<KeyOutcome> {
        let outcome = self.state.handle_key(key);
        debug!(?key, ?outcome, "Key handled");

        match outcome {
            KeyOutcome::OpenedSearch => {
                self.publish();
                self.search("").await?;
            }
            KeyOutcome::ClosedSearch => {
                self.debouncer.cancel();
                self.publish();
            }
            KeyOutcome::Ignored | KeyOutcome::ConfirmClearCart => {}
            _ => self.publish(),
        }

        Ok(outcome)
    }

    pub fn set_client_name(&mut self, name: &str) -> ClientResult<()> {
        self.state.set_client_name(name)?;
        self.publish();
        Ok(())
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.state.set_payment_method(method);
        self.publish();
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Sends the sale to the backend.
    ///
    /// ## Behavior
    /// - Empty cart: `EmptyCart`, no request, nothing changes
    /// - Accepted: cart emptied, discount reset, payment modal closed
    /// - Rejected or unreachable: error returned, cart left as it was
    pub async fn submit(&mut self) -> ClientResult<InvoiceReceipt> {
        if self.state.cart().is_empty() {
            return Err(ClientError::EmptyCart);
        }

        let screen = self.state.screen();
        let request =
            InvoiceRequest::from_cart(self.state.cart(), screen.client_name(), screen.payment_method());
        let total = self.state.cart().totals().net_total;

        match self.api.create_invoice(&request).await {
            Ok(receipt) => {
                info!(invoice = %receipt.number, total = %total, items = request.items.len(), "Sale completed");
                self.state.complete_sale(receipt.number.clone());
                self.publish();
                Ok(receipt)
            }
            Err(e) => {
                if e.is_rejection() {
                    warn!(error = %e, "Sale rejected by server");
                } else {
                    error!(error = %e, "Sale submission failed");
                }
                Err(e)
            }
        }
    }

    pub async fn recent_invoices(&self) -> ClientResult<Vec<InvoiceSummary>> {
        self.api.recent_invoices().await
    }
}
