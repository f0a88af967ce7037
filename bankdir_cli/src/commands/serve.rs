use anyhow::Result;
use bankdir_lib::Directory;
use clap::Args;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file and BANKDIR_BIND)
    #[arg(long)]
    pub bind: Option<String>,
}

pub async fn run(args: &ServeArgs, directory: Directory, default_bind: &str) -> Result<()> {
    let addr = args.bind.as_deref().unwrap_or(default_bind);
    crate::server::serve(directory, addr).await
}
