//! # caisse-client: Backend Client & Checkout Session
//!
//! The I/O half of the checkout: talks to the backend over HTTP, debounces
//! the search box and drives a [`caisse_core::CheckoutState`].
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Session                                 │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 CheckoutSession (session.rs)                     │  │
//! │  │                                                                  │  │
//! │  │  Owns CheckoutState, publishes snapshots on a watch channel      │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │   Debouncer    │  │   CaisseApi    │  │     Protocol           │    │
//! │  │                │  │                │  │                        │    │
//! │  │ 300 ms quiet   │  │ reqwest client │  │ Backend JSON bodies    │    │
//! │  │ period before  │  │ with cookies   │  │ ⇄ caisse-core types    │    │
//! │  │ a search fires │  │ + CSRF token   │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  CaisseConfig: defaults → caisse.toml → CAISSE_* environment           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`api`] - HTTP calls to the backend
//! - [`config`] - Configuration loading
//! - [`csrf`] - CSRF token extraction from the checkout page
//! - [`debounce`] - Single-slot trailing-edge debouncer
//! - [`error`] - Client error types
//! - [`protocol`] - Wire DTOs
//! - [`session`] - Checkout session

pub mod api;
pub mod config;
pub mod csrf;
pub mod debounce;
pub mod error;
pub mod protocol;
pub mod session;

pub use api::CaisseApi;
pub use config::CaisseConfig;
pub use debounce::Debouncer;
pub use error::{ClientError, ClientResult};
pub use protocol::InvoiceReceipt;
pub use session::{CheckoutSession, SearchOutcome};
