use anyhow::{bail, Result};
use bankdir_lib::validation::{institution_key, sanitize_publication};
use bankdir_lib::Directory;
use clap::Args;

use crate::output::{print_figures, OutputFormat};

#[derive(Args)]
pub struct FiguresArgs {
    /// Publication state code (e.g. KS)
    #[arg(long)]
    pub state: String,

    /// Bank number within the state
    #[arg(long)]
    pub id: String,

    /// Publication year (1900-2100)
    #[arg(long)]
    pub year: String,

    /// Publication season: spring or fall
    #[arg(long)]
    pub season: String,
}

pub fn run(args: &FiguresArgs, directory: &Directory, format: &OutputFormat) -> Result<()> {
    let key = institution_key(Some(&args.state), Some(&args.id));
    let publication = sanitize_publication(Some(&args.year), Some(&args.season));
    let (Some(key), Some(publication)) = (key, publication) else {
        bail!("Missing parameters: --state, --id, --year and --season are all required");
    };

    let report = directory.figures_for_publication(&key, publication)?;
    if !report.is_current {
        eprintln!("Latest publication is {}", report.current_display);
    }
    print_figures(&report, format)
}
