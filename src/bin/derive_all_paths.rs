/// Print a few addresses under each commonly used Ethereum base path
///
/// Useful when a wallet was created by software with a non-standard layout.

use anyhow::Context;
use eth_seed_scanner::config::phrase_from_args;
use eth_seed_scanner::keys::{BASE_PATHS, EXPLORE_COUNT};
use eth_seed_scanner::{checksum_address, HdWallet};
use std::env;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(phrase) = phrase_from_args(env::args()) else {
        println!("Usage: derive-all-paths \"seed phrase\"");
        std::process::exit(1);
    };

    let wallet = HdWallet::from_phrase(&phrase).context("Invalid seed phrase")?;

    let groups = wallet
        .derive_base_paths(&BASE_PATHS, EXPLORE_COUNT)
        .context("Failed to derive addresses")?;

    for (base, records) in groups {
        println!("\nPATH: {}/i", base);

        for record in records {
            println!("Index {}: {}", record.index, checksum_address(&record.address));
        }
    }

    Ok(())
}
