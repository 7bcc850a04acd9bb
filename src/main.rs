//! SplitEase CLI
//!
//! Reports on the sample receipt store and splits imported item lists,
//! writing CSV to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- history 1
//! cargo run -- summary rec-1
//! cargo run -- detail rec-1 user-2
//! cargo run -- split items.csv > shares.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `SPLITEASE_LATENCY_MS`: Simulated store round-trip delay
//! - `SPLITEASE_STRICT_REFS`: Set to `1` to reject dangling allocation references

use splitease::import::read_items;
use splitease::report::{write_history, write_member_items, write_shares};
use splitease::{ReceiptStore, Result, SplitError, StoreConfig, HISTORY_PAGE_SIZE};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut store = ReceiptStore::seeded(StoreConfig::from_env());

    let stdout = io::stdout();
    let handle = stdout.lock();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["history"] => write_history(handle, &store.page(1, HISTORY_PAGE_SIZE)),
        ["history", page] => {
            let page: usize = page
                .parse()
                .map_err(|_| SplitError::Usage(format!("Invalid page {:?}", page)))?;
            let pages = store.page_count(HISTORY_PAGE_SIZE);
            if page == 0 || page > pages {
                return Err(SplitError::Usage(format!(
                    "Page {} out of range 1..={}",
                    page, pages
                )));
            }
            write_history(handle, &store.page(page, HISTORY_PAGE_SIZE))
        }
        ["summary", receipt_id] => write_shares(handle, &store.shares(receipt_id)?),
        ["detail", receipt_id, member_id] => {
            if !store.roster().contains(member_id) {
                return Err(SplitError::Usage(format!("Unknown member {:?}", member_id)));
            }
            write_member_items(handle, &store.member_items(receipt_id, member_id)?)
        }
        ["split", path] => {
            let id = import_receipt(&mut store, Path::new(path))?;
            write_shares(handle, &store.shares(&id)?)
        }
        [] => Err(SplitError::Usage("Missing command".to_string())),
        [command, ..] => Err(SplitError::Usage(format!(
            "Unknown command or arguments for {:?}",
            command
        ))),
    }
}

/// Imports a CSV of items as a new receipt dated today and returns its id.
fn import_receipt(store: &mut ReceiptStore, path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let import = read_items(BufReader::new(file))?;

    let vendor = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let today = chrono::Local::now().date_naive();

    let receipt = store.import(&vendor, today, import)?;
    Ok(receipt.id)
}
