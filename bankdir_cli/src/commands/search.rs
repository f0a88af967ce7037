//! The `search` subcommand: faceted search over each state's latest publication.

use anyhow::{Context, Result};
use bankdir_lib::validation::search_query_from_pairs;
use bankdir_lib::{Directory, SearchQuery};
use clap::Args;
use url::Url;

use crate::output::{print_search, OutputFormat};

#[derive(Args)]
pub struct SearchArgs {
    /// State code(s), e.g. KS (comma-separated or repeated)
    #[arg(long, value_delimiter = ',')]
    pub state: Vec<String>,

    /// Institution type(s): bank, credit_union, savings_loan
    #[arg(long = "type", value_delimiter = ',')]
    pub institution_type: Vec<String>,

    /// County name(s)
    #[arg(long, value_delimiter = ',')]
    pub county: Vec<String>,

    /// Membership organization code(s), e.g. kba
    #[arg(long, value_delimiter = ',')]
    pub membership: Vec<String>,

    /// Asset range(s): under50, 50-100, 100-500, 500-1000, over1000
    #[arg(long, value_delimiter = ',')]
    pub assets: Vec<String>,

    /// Text matched against institution name or city
    #[arg(long)]
    pub q: Option<String>,

    /// Print a link for the search and a removal link per active filter,
    /// relative to this base URL
    #[arg(long)]
    pub link_base: Option<String>,
}

impl SearchArgs {
    /// Flatten the arguments into the same key/value pairs a query string carries.
    fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        pairs.extend(self.state.iter().map(|v| ("state", v.as_str())));
        pairs.extend(self.institution_type.iter().map(|v| ("type", v.as_str())));
        pairs.extend(self.county.iter().map(|v| ("county", v.as_str())));
        pairs.extend(self.membership.iter().map(|v| ("membership", v.as_str())));
        pairs.extend(self.assets.iter().map(|v| ("assets", v.as_str())));
        if let Some(ref q) = self.q {
            pairs.push(("q", q.as_str()));
        }
        pairs
    }

    fn query(&self) -> SearchQuery {
        search_query_from_pairs(self.pairs())
    }
}

pub fn run(args: &SearchArgs, directory: &Directory, format: &OutputFormat) -> Result<()> {
    let query = args.query();
    let results = directory.search(&query)?;

    if results.enabled {
        eprintln!("{} institutions", results.total);
    } else {
        eprintln!("Select at least one --state to list institutions");
    }

    if let Some(ref base) = args.link_base {
        let base = Url::parse(base).with_context(|| format!("invalid --link-base '{}'", base))?;
        eprintln!("Link: {}", query.add_to_url(&base));
        for pill in &results.active_filters {
            let remaining = query.without(pill.key, pill.value.as_deref());
            eprintln!("  remove {}: {}", pill.label, remaining.add_to_url(&base));
        }
    }

    print_search(&results, format)
}
