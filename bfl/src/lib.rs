//! Client for the Black Forest Labs text-to-image API.
//!
//! A generation is three calls: [`BflClient::submit`] starts a job,
//! [`BflClient::poll`] waits until it is ready and [`BflClient::download`]
//! stores the resulting image.

pub mod api;
pub mod model;
pub mod request;

pub use api::{Artifact, BflClient, BflError, ErrorKind, JobHandle, JobStatus, Stage};
pub use model::Model;
pub use request::{FittedDimensions, GenerationRequest};
