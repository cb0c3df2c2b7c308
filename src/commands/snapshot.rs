use anyhow::Result;
use tracing::info;

use crate::cli::SnapshotArgs;
use crate::settings::Settings;
use crate::snapshot;

pub fn run(args: SnapshotArgs) -> Result<()> {
    let settings = Settings::load(&args.data_root)?;
    let ledger_path = args
        .ledger_path
        .unwrap_or_else(|| settings.active_ledger_path.clone());

    let out_path = snapshot::record_snapshot(&ledger_path, &settings)?;

    info!(
        source = %ledger_path.display(),
        path = %out_path.display(),
        "snapshot written"
    );

    Ok(())
}
