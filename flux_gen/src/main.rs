use clap::Parser;
use color_eyre::Result;
use flux_gen::{Cli, Settings, config::API_KEY_ENV};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    flux_gen::init_logging();

    let cli = Cli::parse();
    let settings = Settings::resolve(cli, std::env::var(API_KEY_ENV).ok())?;
    flux_gen::run(settings).await
}
