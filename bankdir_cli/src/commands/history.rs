use anyhow::{bail, Result};
use bankdir_lib::validation::institution_key;
use bankdir_lib::Directory;
use clap::Args;

use crate::output::{print_history, OutputFormat};

#[derive(Args)]
pub struct HistoryArgs {
    /// Publication state code (e.g. KS)
    #[arg(long)]
    pub state: String,

    /// Bank number within the state
    #[arg(long)]
    pub id: String,
}

pub fn run(args: &HistoryArgs, directory: &Directory, format: &OutputFormat) -> Result<()> {
    let Some(key) = institution_key(Some(&args.state), Some(&args.id)) else {
        bail!("Missing parameters: --state must be two letters and --id one to five letters or digits");
    };

    let history = directory.financial_history(&key)?;
    eprintln!("{} publications for {}/{}", history.len(), key.state, key.bank_no);
    print_history(&history, format)
}
