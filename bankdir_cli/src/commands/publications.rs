use anyhow::Result;
use bankdir_lib::validation::{sanitize_state, sanitize_year};
use bankdir_lib::Directory;
use clap::Args;

use crate::output::{print_publications, OutputFormat};

#[derive(Args)]
pub struct PublicationsArgs {
    /// State code to list years and seasons for
    #[arg(long)]
    pub state: Option<String>,

    /// Year to list seasons for; defaults to the state's newest year
    #[arg(long)]
    pub year: Option<String>,
}

pub fn run(args: &PublicationsArgs, directory: &Directory, format: &OutputFormat) -> Result<()> {
    let state = args.state.as_deref().and_then(sanitize_state);
    let year = args.year.as_deref().and_then(sanitize_year);

    let choice = directory.publications(state.as_deref(), year)?;
    print_publications(&choice, format)
}
