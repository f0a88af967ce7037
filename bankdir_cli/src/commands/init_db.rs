//! The `init-db` subcommand: create or upgrade the SQLite schema.

use std::path::Path;

use anyhow::{Context, Result};
use bankdir_lib::Db;

pub fn run(path: &Path) -> Result<()> {
    let db = Db::open(path).with_context(|| format!("cannot open database {}", path.display()))?;
    db.init()?;
    tracing::info!(
        path = %path.display(),
        version = db.schema_version()?,
        "schema ready"
    );
    Ok(())
}
