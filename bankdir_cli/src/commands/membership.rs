use anyhow::Result;
use bankdir_lib::validation::{sanitize_season, sanitize_state, sanitize_year};
use bankdir_lib::Directory;
use clap::Args;

use crate::output::{print_roster, OutputFormat};

#[derive(Args)]
pub struct MembershipArgs {
    /// Organization code (e.g. kba)
    #[arg(long)]
    pub code: String,

    /// State code; defaults to the first state with data
    #[arg(long)]
    pub state: Option<String>,

    /// Publication year; defaults to the state's latest
    #[arg(long)]
    pub year: Option<String>,

    /// Publication season; defaults to the state's latest
    #[arg(long)]
    pub season: Option<String>,
}

pub fn run(args: &MembershipArgs, directory: &Directory, format: &OutputFormat) -> Result<()> {
    let state = args.state.as_deref().and_then(sanitize_state);
    let year = args.year.as_deref().and_then(sanitize_year);
    let season = args.season.as_deref().and_then(sanitize_season);

    let roster = directory.membership_roster(&args.code, state.as_deref(), year, season)?;

    match (&roster.state, roster.year, roster.season) {
        (Some(state), Some(year), Some(season)) => eprintln!(
            "{}: {} members in {} {} {}",
            roster.org.name,
            roster.members.len(),
            state,
            season.label(),
            year
        ),
        _ => eprintln!("{}: no publications available", roster.org.name),
    }
    print_roster(&roster, format)
}
