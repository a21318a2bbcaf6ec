//! # Caisse Terminal Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging to stderr)
//! 2. Load configuration (`CAISSE_CONFIG` or the platform config file)
//! 3. Build the checkout session and its HTTP client
//! 4. Spawn the render task on the snapshot channel
//! 5. Read cashier commands from stdin until `quit` or end of input

#[tokio::main]
async fn main() {
    // The actual setup is in lib.rs for better testability
    if let Err(e) = caisse_terminal::run().await {
        eprintln!("caisse-terminal: {e}");
        std::process::exit(1);
    }
}
