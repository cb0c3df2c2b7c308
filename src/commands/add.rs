use anyhow::Result;
use tracing::info;

use crate::cli::AddArgs;
use crate::ledger;
use crate::model::{ItemRecord, Price};
use crate::settings::Settings;

pub fn run(args: AddArgs) -> Result<()> {
    let settings = Settings::load(&args.data_root)?;
    let ledger_path = args
        .ledger_path
        .unwrap_or_else(|| settings.active_ledger_path.clone());

    // blank title means "same as name", blank description means "use the
    // configured default", matching how operators fill the entry form
    let title = args
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(args.name.trim())
        .to_string();

    let (description, is_description_default) = match args
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        Some(text) => (text.to_string(), false),
        None => (settings.default_description.clone(), true),
    };

    let item = ItemRecord {
        name: args.name.trim().to_string(),
        title,
        image_ref: args.image.trim().to_string(),
        description,
        quantity: args.quantity,
        price: Price::parse_or_zero(&args.price),
        is_description_default,
    };

    let result = ledger::add_or_increment(&ledger_path, &settings, item)?;

    info!(
        name = %result.name,
        title = %result.title,
        quantity = result.quantity,
        price = %result.price,
        default_description = result.is_description_default,
        path = %ledger_path.display(),
        "item recorded"
    );

    Ok(())
}
