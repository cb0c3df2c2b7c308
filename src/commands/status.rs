use std::fs;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::ledger;
use crate::model::Price;
use crate::settings::Settings;

pub fn run(args: StatusArgs) -> Result<()> {
    let config_path = Settings::config_path(&args.data_root);
    if !config_path.exists() {
        warn!(path = %config_path.display(), "config file missing, writing defaults");
    }

    let settings = Settings::load(&args.data_root)?;
    info!(
        config = %config_path.display(),
        ledger = %settings.active_ledger_path.display(),
        log_directory = %settings.log_directory.display(),
        image_directory = %settings.image_directory.display(),
        initial_setup_done = settings.initial_setup_done,
        "settings loaded"
    );

    if settings.active_ledger_path.exists() {
        let items = ledger::load(&settings.active_ledger_path, &settings)?;
        let total_quantity: u64 = items.iter().map(|item| item.quantity).sum();
        let total_value = Price::from_cents(
            items
                .iter()
                .map(|item| item.price.cents() * item.quantity as i64)
                .sum(),
        );

        info!(
            items = items.len(),
            total_quantity,
            total_value = %total_value,
            "active ledger"
        );
    } else {
        warn!(path = %settings.active_ledger_path.display(), "active ledger missing");
    }

    match fs::read_dir(&settings.log_directory) {
        Ok(entries) => {
            let snapshots = entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    name.starts_with("snapshot_") && name.ends_with(".csv")
                })
                .count();
            info!(path = %settings.log_directory.display(), snapshots, "snapshot directory");
        }
        Err(_) => {
            warn!(path = %settings.log_directory.display(), "snapshot directory missing");
        }
    }

    Ok(())
}
