use anyhow::{bail, Result};
use bankdir_lib::validation::{institution_key, sanitize_publication};
use bankdir_lib::Directory;
use clap::Args;

use crate::output::{print_detail, OutputFormat};

#[derive(Args)]
pub struct InstitutionArgs {
    /// Publication state code (e.g. KS)
    #[arg(long)]
    pub state: String,

    /// Bank number within the state
    #[arg(long)]
    pub id: String,

    /// Show figures from this year instead of the latest publication
    #[arg(long)]
    pub fig_year: Option<String>,

    /// Season for --fig-year: spring or fall
    #[arg(long)]
    pub fig_season: Option<String>,
}

pub fn run(args: &InstitutionArgs, directory: &Directory, format: &OutputFormat) -> Result<()> {
    let Some(key) = institution_key(Some(&args.state), Some(&args.id)) else {
        bail!("Missing parameters: --state must be two letters and --id one to five letters or digits");
    };
    // An incomplete or invalid figures publication is the same as none.
    let figures = sanitize_publication(args.fig_year.as_deref(), args.fig_season.as_deref());

    let detail = directory.institution_detail(&key, figures)?;
    print_detail(&detail, format)
}
