//! # arca-cart
//!
//! Headless driver for a file-backed cart store. Handy for checking what a
//! persisted cart contains and for scripting cart states during frontend
//! development.
//!
//! ## Usage
//! ```bash
//! # Show the persisted cart
//! cargo run -p arca-store --bin arca-cart -- show
//!
//! # Add two units of a variant (price in minor units)
//! cargo run -p arca-store --bin arca-cart -- add p1 v1 "IPA 355ml" 2100 2
//!
//! # Use a scratch directory instead of the platform data dir
//! cargo run -p arca-store --bin arca-cart -- --dir ./tmp-cart set p1 v1 5
//! ```

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arca_core::validation::validate_line_identity;
use arca_core::{line_total, CartState, CoreError, CurrencyCode, Money, ValidationError, Variant};
use arca_store::{CartStore, StorageBackend, StoreConfig, StoreResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
El Arca cart driver

Usage: arca-cart [OPTIONS] <COMMAND>

Commands:
  show                                          Print the cart
  add <product> <variant> <name> <price> [qty]  Add units (price in minor units)
  remove <product> <variant>                    Remove a line
  set <product> <variant> <qty>                 Set a line quantity (<= 0 removes)
  clear                                         Empty the cart
  currency <CODE>                               Switch the cart currency

Options:
  -d, --dir <PATH>       Storage directory (overrides config)
  -c, --config <PATH>    Config file (default: platform config dir)
  -h, --help             Show this help message";

/// Parsed command line.
#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    dir: Option<PathBuf>,
    command: Vec<String>,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{USAGE}");
            return Err(e.into());
        }
    };
    if cli.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut config = StoreConfig::load_or_default(cli.config_path);
    if let Some(dir) = cli.dir {
        config.storage.backend = StorageBackend::File;
        config.storage.dir = Some(dir);
    }

    let store = CartStore::from_config(&config)?;
    let changes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changes);
    let _subscription = store.subscribe(move || {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let words: Vec<&str> = cli.command.iter().map(String::as_str).collect();
    if !apply(&store, &words)? {
        eprintln!("{USAGE}");
        return Err("unknown command".into());
    }

    info!(changes = changes.load(Ordering::Relaxed), "Command applied");
    print_cart(&store.snapshot());
    Ok(())
}

/// Splits options from command words. An option missing its value is an
/// error rather than a silent fallback to the default location.
fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dir" | "-d" => {
                let value = iter.next().ok_or_else(|| format!("{arg} needs a path"))?;
                cli.dir = Some(PathBuf::from(value));
            }
            "--config" | "-c" => {
                let value = iter.next().ok_or_else(|| format!("{arg} needs a path"))?;
                cli.config_path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => cli.help = true,
            other => cli.command.push(other.to_string()),
        }
    }

    Ok(cli)
}

/// Runs one command against the store.
///
/// Returns `Ok(false)` when the words do not form a known command.
fn apply(store: &CartStore, words: &[&str]) -> StoreResult<bool> {
    match words {
        [] | ["show"] => {}
        ["add", product, variant, name, price, rest @ ..] => {
            validate_line_identity(product, variant)?;
            let price: i64 = parse_field("price", price)?;
            let quantity: u32 = match rest {
                [] => 1,
                [qty] => parse_field("quantity", qty)?,
                _ => return Ok(false),
            };
            let variant = Variant::new(*variant, *name, Money::from_minor(price));
            store.add_item_with_quantity(product, variant, quantity);
        }
        ["remove", product, variant] => {
            validate_line_identity(product, variant)?;
            store.remove_item(product, variant);
        }
        ["set", product, variant, qty] => {
            validate_line_identity(product, variant)?;
            store.update_quantity(product, variant, parse_field("quantity", qty)?);
        }
        ["clear"] => store.clear(),
        ["currency", code] => store.set_currency(CurrencyCode::parse(code)?),
        _ => return Ok(false),
    }
    Ok(true)
}

/// Parses a numeric argument, reporting failures as validation errors.
fn parse_field<T: FromStr>(field: &str, raw: &str) -> StoreResult<T> {
    raw.parse().map_err(|_| {
        CoreError::from(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{raw}' is not a whole number"),
        })
        .into()
    })
}

/// Prints lines and totals as a small table.
fn print_cart(cart: &CartState) {
    if cart.is_empty() {
        println!("Cart is empty ({})", cart.currency);
        return;
    }

    println!("{:<16} {:<16} {:<24} {:>5} {:>12}", "PRODUCT", "VARIANT", "NAME", "QTY", "LINE");
    for item in &cart.items {
        println!(
            "{:<16} {:<16} {:<24} {:>5} {:>12}",
            item.product_id,
            item.variant.id,
            item.variant.name,
            item.quantity,
            line_total(item)
        );
    }

    let totals = arca_core::CartTotals::from(cart);
    println!("{}", "─".repeat(77));
    println!(
        "{} units in {} lines, total {} {}",
        totals.item_count, totals.line_count, totals.total, totals.currency
    );
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every cart operation
/// - Default: INFO, with debug for the arca crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,arca_store=debug,arca_core=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use arca_store::{MemoryStorage, StoreError};

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn store() -> CartStore {
        CartStore::new(Arc::new(MemoryStorage::new()), CurrencyCode::default())
    }

    #[test]
    fn test_parse_args_options_and_command() {
        let cli = parse_args(&args(&["-d", "/tmp/cart", "set", "p1", "v1", "3"])).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/cart")));
        assert_eq!(cli.command, vec!["set", "p1", "v1", "3"]);
        assert!(!cli.help);
    }

    #[test]
    fn test_parse_args_rejects_missing_option_value() {
        assert!(parse_args(&args(&["show", "--dir"])).is_err());
        assert!(parse_args(&args(&["-c"])).is_err());
    }

    #[test]
    fn test_apply_commands() {
        let store = store();
        assert!(apply(&store, &["add", "p1", "v1", "IPA", "2100", "2"]).unwrap());
        assert!(apply(&store, &["set", "p1", "v1", "5"]).unwrap());
        assert_eq!(store.cart_total().minor(), 10500);

        assert!(apply(&store, &["currency", "usd"]).unwrap());
        assert!(apply(&store, &["remove", "p1", "v1"]).unwrap());
        assert!(store.snapshot().is_empty());
        assert_eq!(store.snapshot().currency.as_str(), "USD");

        assert!(!apply(&store, &["checkout"]).unwrap());
    }

    #[test]
    fn test_apply_reports_core_errors() {
        let store = store();

        assert!(matches!(
            apply(&store, &["currency", "pesos"]),
            Err(StoreError::Core(CoreError::InvalidCurrency(_)))
        ));
        assert!(matches!(
            apply(&store, &["add", " ", "v1", "IPA", "2100"]),
            Err(StoreError::Core(CoreError::Validation(ValidationError::Required { .. })))
        ));
        assert!(matches!(
            apply(&store, &["add", "p1", "v1", "IPA", "21.00"]),
            Err(StoreError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. })))
        ));
        assert!(store.snapshot().is_empty());
    }
}
