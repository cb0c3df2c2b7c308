use anyhow::Result;
use tracing::info;

use crate::cli::NewArgs;
use crate::ledger;
use crate::settings::Settings;

pub fn run(args: NewArgs) -> Result<()> {
    let settings = Settings::load(&args.data_root)?;
    let path = ledger::new_ledger(&settings)?;

    info!(path = %path.display(), "ledger reset to header only");

    Ok(())
}
