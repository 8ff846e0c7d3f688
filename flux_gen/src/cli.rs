use std::path::PathBuf;

use bfl::{Model, api::DEFAULT_BASE_URL};
use indoc::indoc;

pub const DEFAULT_PROMPT: &str = "A cat on its back legs running like a human is holding a big silver fish with its arms. The cat is running away from the shop owner and has a panicked look on his face. The scene is situated in a crowded market.";

const AFTER_HELP: &str = indoc! {"
    Without --api-key the BFL_API_KEY environment variable is used.
    Set RUST_LOG=debug to see the raw requests and responses.
"};

/// Generate an image using the Black Forest Labs API.
#[derive(Debug, clap::Parser)]
#[command(version, after_help = AFTER_HELP)]
pub struct Cli {
    /// Prompt for image generation
    #[arg(long, default_value = DEFAULT_PROMPT, hide_default_value = true)]
    pub prompt: String,

    /// Width of the image in pixels. Must be between 256 and 1440 and divisible by 32
    #[arg(long, default_value_t = 1024, allow_negative_numbers = true)]
    pub width: i64,

    /// Height of the image in pixels. Must be between 256 and 1440 and divisible by 32
    #[arg(long, default_value_t = 768, allow_negative_numbers = true)]
    pub height: i64,

    /// File to save the resulting image to
    #[arg(long, default_value = "sample_out.jpg")]
    pub output: PathBuf,

    /// Black Forest Labs API key
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long, value_enum, default_value_t = Model::default())]
    pub model: Model,

    /// Let the service rewrite the prompt for more creative generation
    #[arg(long)]
    pub prompt_upsampling: bool,

    /// Seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Moderation of input and output, 0 being most strict, 6 least strict
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=6))]
    pub safety_tolerance: Option<u8>,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}
