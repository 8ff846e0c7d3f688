use strum::{Display, EnumIter, EnumString};

/// The generation models the `/v1/{model}` endpoint accepts.
#[derive(
    Debug, Clone, Copy, Display, EnumString, EnumIter, clap::ValueEnum, Hash, PartialEq, Eq, Default,
)]
pub enum Model {
    #[default]
    #[strum(serialize = "flux-pro-1.1")]
    #[value(name = "flux-pro-1.1")]
    FluxPro11,
    #[strum(serialize = "flux-pro")]
    #[value(name = "flux-pro")]
    FluxPro,
    #[strum(serialize = "flux-dev")]
    #[value(name = "flux-dev")]
    FluxDev,
}

impl Model {
    /// Path segment of the generation endpoint, e.g. `v1/flux-pro-1.1`.
    pub fn endpoint_path(&self) -> String {
        format!("v1/{self}")
    }
}
