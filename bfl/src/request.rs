use log::warn;
use serde::Serialize;

use crate::model::Model;

pub const MIN_DIMENSION: u32 = 256;
pub const MAX_DIMENSION: u32 = 1440;
pub const DIMENSION_STEP: u32 = 32;

/// Body of a generation request. The model is not part of the JSON, it selects
/// the endpoint the body is posted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    #[serde(skip)]
    pub model: Model,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub prompt_upsampling: bool,
    pub seed: Option<u64>,
    /// 0 is the strictest moderation, 6 the most permissive.
    pub safety_tolerance: Option<u8>,
}

/// Width and height after fitting them to what the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FittedDimensions {
    pub width: u32,
    pub height: u32,
    /// Whether either value differs from what was asked for.
    pub adjusted: bool,
}

impl FittedDimensions {
    /// Fits both values and logs a warning when that changed anything.
    pub fn fit(width: i64, height: i64) -> Self {
        let fitted = Self {
            width: fit_dimension(width),
            height: fit_dimension(height),
            adjusted: false,
        };
        let adjusted = i64::from(fitted.width) != width || i64::from(fitted.height) != height;

        if adjusted {
            warn!(
                "Dimensions have been adjusted to fit within bounds and rounded to the nearest multiple of {DIMENSION_STEP}."
            );
            warn!("Original dimensions: {width}x{height}");
            warn!("Adjusted dimensions: {}x{}", fitted.width, fitted.height);
        }

        Self { adjusted, ..fitted }
    }
}

/// Clamps to `[MIN_DIMENSION, MAX_DIMENSION]`, then rounds to the nearest
/// multiple of `DIMENSION_STEP`. A value exactly between two multiples goes to
/// the even one.
pub fn fit_dimension(value: i64) -> u32 {
    let clamped = value.clamp(MIN_DIMENSION.into(), MAX_DIMENSION.into()) as u32;
    let steps = clamped / DIMENSION_STEP;
    let rest = clamped % DIMENSION_STEP;
    let half = DIMENSION_STEP / 2;

    let steps = if rest > half || (rest == half && steps % 2 == 1) {
        steps + 1
    } else {
        steps
    };

    steps * DIMENSION_STEP
}
