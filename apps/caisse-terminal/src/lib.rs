//! # Caisse Terminal Library
//!
//! Main library for the cashier terminal.
//!
//! ## Module Organization
//! ```text
//! caisse_terminal/
//! ├── lib.rs          ← You are here (app setup, command loop)
//! ├── main.rs         ← Entry point (calls run())
//! └── input.rs        ← Cashier command parser
//! ```
//!
//! ## Event Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   stdin lines ─────────┐                                                │
//! │                        ▼                                                │
//! │                 tokio::select! ──► CheckoutSession ──watch──► render    │
//! │                        ▲                                       task     │
//! │   debounced search ────┘                                       │        │
//! │   responses (mpsc)                                             ▼        │
//! │                                                              stdout     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so they never interleave with the screen on stdout.

pub mod input;

use std::path::PathBuf;

use caisse_client::{CaisseConfig, CheckoutSession, ClientError};
use caisse_core::view::{
    render_cart, render_history, render_payment_form, render_receipt, render_search_results,
    CurrencyFormat,
};
use caisse_core::{CheckoutSnapshot, Key, KeyOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::input::{is_yes, parse_command, Command, HELP};

/// Prompt shown before emptying the cart.
pub const CLEAR_PROMPT: &str = "Vider le panier ? (o/n)";

/// Whether the command loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    AwaitClearConfirmation,
    Quit,
}

/// Runs the terminal until `quit` or end of input.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = std::env::var_os("CAISSE_CONFIG").map(PathBuf::from);
    let config = CaisseConfig::load(config_path)?;
    info!(base_url = %config.server.base_url, "Caisse terminal starting");

    let currency = CurrencyFormat::new(config.display.currency.clone());
    let mut session = CheckoutSession::from_config(&config)?;

    let render_task = tokio::spawn(render_loop(session.subscribe(), currency.clone()));

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut awaiting_clear = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                if awaiting_clear {
                    awaiting_clear = false;
                    if is_yes(&line) {
                        session.confirm_clear();
                    }
                    continue;
                }

                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };

                match execute(&mut session, command, &currency).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::AwaitClearConfirmation) => {
                        println!("{}", CLEAR_PROMPT);
                        awaiting_clear = true;
                    }
                    Ok(Flow::Quit) => break,
                    Err(e) => eprintln!("{}", e.user_message()),
                }
            }
            result = session.next_search_result() => {
                if let Err(e) = result {
                    eprintln!("{}", e.user_message());
                }
            }
        }
    }

    render_task.abort();
    info!("Caisse terminal stopped");
    Ok(())
}

/// Initializes tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Verbose output
/// - `RUST_LOG=info` - Normal output (default)
/// - `RUST_LOG=caisse=trace` - Trace caisse crates only
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caisse=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn execute(
    session: &mut CheckoutSession,
    command: Command,
    currency: &CurrencyFormat,
) -> Result<Flow, ClientError> {
    debug!(?command, "Command");

    match command {
        Command::Key(key) => {
            if session.handle_key(key).await? == KeyOutcome::ConfirmClearCart {
                return Ok(Flow::AwaitClearConfirmation);
            }
        }
        Command::Scan(barcode) => {
            session.scan(&barcode).await?;
        }
        Command::Query(query) => {
            if !session.state().screen().is_search_open() {
                session.handle_key(Key::F1).await?;
            }
            session.type_query(&query);
        }
        Command::Pick(index) => {
            session.add_from_results(index)?;
        }
        Command::Increment(id) => session.update_quantity(id, 1)?,
        Command::Decrement(id) => session.update_quantity(id, -1)?,
        Command::Remove(id) => {
            if !session.remove(id) {
                warn!(item_id = id, "No such cart line");
            }
        }
        Command::Clear => {
            if !session.state().cart().is_empty() {
                return Ok(Flow::AwaitClearConfirmation);
            }
        }
        Command::Discount(kind, value) => session.apply_discount(kind, &value)?,
        Command::Client(name) => session.set_client_name(&name)?,
        Command::Pay(method) => session.set_payment_method(method),
        Command::Submit => {
            let receipt = session.submit().await?;
            println!("Vente enregistrée : facture {}", receipt.number);
        }
        Command::History => {
            let invoices = session.recent_invoices().await?;
            print!("{}", render_history(&invoices, currency));
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

// =============================================================================
// Rendering
// =============================================================================

async fn render_loop(mut snapshots: watch::Receiver<CheckoutSnapshot>, currency: CurrencyFormat) {
    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        print!("{}", render_screen(&snapshot, &currency));
    }
}

/// Everything visible for one snapshot: the cart, then whichever modals are
/// open.
pub fn render_screen(snapshot: &CheckoutSnapshot, currency: &CurrencyFormat) -> String {
    let mut out = render_cart(snapshot, currency);

    if snapshot.search_open {
        out.push_str(&format!("\nRecherche : {}\n", snapshot.search_query));
        out.push_str(&render_search_results(&snapshot.search_results, currency));
    }

    if snapshot.discount_open {
        out.push_str("\nRemise : % <valeur> | = <montant> | none\n");
    }

    if let Some(receipt) = &snapshot.receipt {
        out.push('\n');
        out.push_str(&render_receipt(receipt, currency));
        out.push_str(&render_payment_form(
            &snapshot.client_name,
            snapshot.payment_method,
        ));
    }

    out
}
