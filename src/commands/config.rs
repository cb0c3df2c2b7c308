use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{ConfigArgs, ConfigCommands, ConfigSetArgs};
use crate::settings::Settings;

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show(&args.data_root),
        ConfigCommands::Set(set_args) => set(&args.data_root, set_args),
        ConfigCommands::Reset => reset(&args.data_root),
    }
}

fn show(data_root: &Path) -> Result<()> {
    let settings = Settings::load(data_root)?;
    let json =
        serde_json::to_string_pretty(&settings).context("failed to serialize settings")?;
    println!("{json}");
    Ok(())
}

fn set(data_root: &Path, args: ConfigSetArgs) -> Result<()> {
    let mut settings = Settings::load(data_root)?;

    if let Some(path) = args.ledger_path {
        settings.active_ledger_path = path;
    }
    if let Some(path) = args.log_directory {
        settings.log_directory = path;
    }
    if let Some(path) = args.image_directory {
        settings.image_directory = path;
    }
    if args.clear_browser_profile {
        settings.browser_profile_path = None;
    } else if let Some(path) = args.browser_profile {
        settings.browser_profile_path = Some(path);
    }
    if let Some(text) = args.default_description {
        settings.default_description = text;
    }

    // the operator has been through configuration at least once
    settings.initial_setup_done = true;
    settings.save(data_root)?;

    info!(
        path = %Settings::config_path(data_root).display(),
        ledger = %settings.active_ledger_path.display(),
        "settings saved"
    );

    Ok(())
}

fn reset(data_root: &Path) -> Result<()> {
    let settings = Settings::defaults(data_root);
    settings.save(data_root)?;

    info!(
        path = %Settings::config_path(data_root).display(),
        "settings reset to defaults"
    );

    Ok(())
}
