//! # Cashier Commands
//!
//! One command per stdin line. Function keys are typed by name.
//!
//! ```text
//!  f1 | f2 | f5 | esc        screen keys
//!  3017620422003             scan (a bare barcode)
//!  scan <code>               scan
//!  q <text>                  type in the search box (debounced)
//!  pick <n>                  add the n-th search result
//!  + <id> | - <id> | rm <id> change or drop a cart line
//!  clear                     ask to empty the cart
//!  remise % 10 | remise = 500 | remise none
//!  client <name>             customer name on the invoice
//!  pay <method>              especes, carte, cheque, virement, ticket_resto, mixte
//!  valider                   submit the sale
//!  historique                recent invoices
//!  aide | help               list commands
//!  quit                      leave
//! ```

use caisse_core::{DiscountKind, ItemId, Key, PaymentMethod};
use thiserror::Error;

/// A parsed cashier command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Key(Key),
    Scan(String),
    Query(String),
    /// Zero-based index into the search results.
    Pick(usize),
    Increment(ItemId),
    Decrement(ItemId),
    Remove(ItemId),
    Clear,
    Discount(DiscountKind, String),
    Client(String),
    Pay(PaymentMethod),
    Submit,
    History,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Commande inconnue : {0} (tapez « aide »)")]
    Unknown(String),

    #[error("Argument manquant pour « {0} »")]
    MissingArgument(&'static str),

    #[error("Numéro invalide : {0}")]
    InvalidNumber(String),

    #[error("Mode de paiement inconnu : {0}")]
    InvalidPaymentMethod(String),

    #[error("Type de remise inconnu : {0} (%, = ou none)")]
    InvalidDiscountKind(String),
}

pub const HELP: &str = "\
Commandes :
  f1 / f2 / f5 / esc      recherche / remise / paiement / fermer
  <code-barres>           scanner un article
  q <texte>               rechercher dans le catalogue
  pick <n>                ajouter le n-ième résultat
  + <id> / - <id>         modifier la quantité d'une ligne
  rm <id>                 supprimer une ligne
  clear                   vider le panier
  remise % <v> | = <v> | none
  client <nom>            nom du client
  pay <mode>              mode de paiement
  valider                 enregistrer la vente
  historique              dernières factures
  quit                    quitter";

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_lowercase().as_str() {
        "f1" => Command::Key(Key::F1),
        "f2" => Command::Key(Key::F2),
        "f5" => Command::Key(Key::F5),
        "esc" | "escape" => Command::Key(Key::Escape),
        "scan" => Command::Scan(required(rest, "scan")?.to_string()),
        // An empty query is allowed: it lists the whole catalog.
        "q" => Command::Query(rest.to_string()),
        "pick" => {
            let n: usize = number(required(rest, "pick")?)?;
            if n == 0 {
                return Err(ParseError::InvalidNumber(rest.to_string()));
            }
            Command::Pick(n - 1)
        }
        "+" => Command::Increment(number(required(rest, "+")?)?),
        "-" => Command::Decrement(number(required(rest, "-")?)?),
        "rm" => Command::Remove(number(required(rest, "rm")?)?),
        "clear" => Command::Clear,
        "remise" => parse_discount(rest)?,
        "client" => Command::Client(rest.to_string()),
        "pay" => {
            let method = required(rest, "pay")?;
            Command::Pay(
                method
                    .parse()
                    .map_err(|_| ParseError::InvalidPaymentMethod(method.to_string()))?,
            )
        }
        "valider" => Command::Submit,
        "historique" => Command::History,
        "aide" | "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ if rest.is_empty() && line.chars().all(|c| c.is_ascii_digit()) => {
            Command::Scan(line.to_string())
        }
        _ => return Err(ParseError::Unknown(head.to_string())),
    };

    Ok(Some(command))
}

fn parse_discount(rest: &str) -> Result<Command, ParseError> {
    let (kind, value) = match rest.split_once(char::is_whitespace) {
        Some((kind, value)) => (kind, value.trim()),
        None => (rest, ""),
    };

    let kind = match kind.to_lowercase().as_str() {
        "%" | "percent" => DiscountKind::Percent,
        "=" | "amount" | "montant" => DiscountKind::Amount,
        "none" | "aucune" => DiscountKind::None,
        "" => return Err(ParseError::MissingArgument("remise")),
        other => return Err(ParseError::InvalidDiscountKind(other.to_string())),
    };

    Ok(Command::Discount(kind, value.to_string()))
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn number<T: std::str::FromStr>(text: &str) -> Result<T, ParseError> {
    text.parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}

/// Answer to "Vider le panier ?".
pub fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "o" | "oui" | "y" | "yes")
}
