use bfl::BflClient;
use color_eyre::Result;
use log::{LevelFilter, debug, info};

pub mod cli;
pub use cli::Cli;

pub mod config;
pub use config::Settings;

/// Logs at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();
}

/// Submits the request, waits for the job and saves the image.
pub async fn run(settings: Settings) -> Result<()> {
    let Settings {
        request,
        output,
        api_key,
        base_url,
    } = settings;
    let client = BflClient::new(api_key).with_base_url(&base_url)?;

    info!("Using model: {}", request.model);
    info!("Initiating image generation request...");
    let submitted = client.submit(&request).await?;
    println!("Request Details:\n{}", submitted.details_pretty()?);

    let job = submitted.job_handle()?;
    let artifact = client.poll(&job).await?;
    info!("Image is ready. Downloading from: {artifact}");

    let size = client.download(&artifact, &output).await?;
    debug!("Wrote {size} bytes");
    println!("Image successfully saved to '{}'.", output.display());

    Ok(())
}
