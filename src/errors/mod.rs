//! Error types for the dubbing pipeline.
//!
//! Two layers are kept apart: [`ProviderError`] describes what went wrong on
//! the wire to the upstream API, and [`DubbingError`] is the caller-facing
//! classification that the orchestrator surfaces.

mod dubbing;
mod mapping;
mod provider;

pub use dubbing::{DubbingError, DubbingResult, ErrorDetails, ErrorKind, ErrorResponse};
pub use mapping::{ApiErrorDetail, ApiErrorResponse, ErrorMapper};
pub use provider::{ProviderError, ProviderResult};
