//! Test fixtures and sample data
//!
//! Sample upstream responses shaped like the real endpoints, shared by the
//! unit tests of each module.

mod audio_fixtures;
mod chat_fixtures;

pub use audio_fixtures::*;
pub use chat_fixtures::*;
