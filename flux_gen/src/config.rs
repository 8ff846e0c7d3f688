use std::path::PathBuf;

use bfl::{BflError, FittedDimensions, GenerationRequest};

use crate::cli::Cli;

pub const API_KEY_ENV: &str = "BFL_API_KEY";

/// Everything a run needs, resolved from the command line and environment.
pub struct Settings {
    pub request: GenerationRequest,
    pub output: PathBuf,
    pub api_key: String,
    pub base_url: String,
}

impl Settings {
    /// `env_api_key` is the value of [`API_KEY_ENV`], if set.
    pub fn resolve(cli: Cli, env_api_key: Option<String>) -> Result<Self, BflError> {
        let dimensions = FittedDimensions::fit(cli.width, cli.height);
        let api_key = resolve_api_key(cli.api_key, env_api_key)?;

        Ok(Self {
            request: GenerationRequest {
                model: cli.model,
                prompt: cli.prompt,
                width: dimensions.width,
                height: dimensions.height,
                prompt_upsampling: cli.prompt_upsampling,
                seed: cli.seed,
                safety_tolerance: cli.safety_tolerance,
            },
            output: cli.output,
            api_key,
            base_url: cli.base_url,
        })
    }
}

/// The argument wins over the environment. Empty strings count as unset.
pub fn resolve_api_key(arg: Option<String>, env: Option<String>) -> Result<String, BflError> {
    arg.filter(|key| !key.is_empty())
        .or_else(|| env.filter(|key| !key.is_empty()))
        .ok_or(BflError::MissingApiKey)
}
