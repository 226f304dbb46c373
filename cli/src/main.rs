use clap::Parser as _;
use roster_cli::cli::Cli;
use roster_cli::timing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.timing);
    roster_cli::run(cli).await
}
