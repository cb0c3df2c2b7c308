use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ListArgs;
use crate::ledger;
use crate::settings::Settings;

pub fn run(args: ListArgs) -> Result<()> {
    let settings = Settings::load(&args.data_root)?;
    let ledger_path = args
        .ledger_path
        .unwrap_or_else(|| settings.active_ledger_path.clone());

    let items = ledger::load(&ledger_path, &settings)?;

    if args.json {
        let json = serde_json::to_string_pretty(&items).context("failed to serialize ledger")?;
        println!("{json}");
        return Ok(());
    }

    if items.is_empty() {
        info!(path = %ledger_path.display(), "ledger is empty");
        return Ok(());
    }

    for item in &items {
        info!(
            name = %item.name,
            title = %item.title,
            quantity = item.quantity,
            price = %item.price,
            default_description = item.is_description_default,
            "item"
        );
    }

    let total_quantity: u64 = items.iter().map(|item| item.quantity).sum();
    info!(
        path = %ledger_path.display(),
        items = items.len(),
        total_quantity,
        "ledger listed"
    );

    Ok(())
}
