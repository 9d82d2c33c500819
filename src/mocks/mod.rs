//! Mock implementations for testing
//!
//! Test doubles for the transport, auth and transcoder seams so the
//! pipeline can be exercised without network access or an `ffmpeg` binary.

mod mock_auth;
mod mock_transcoder;
mod mock_transport;

pub use mock_auth::MockAuth;
pub use mock_transcoder::MockTranscoder;
pub use mock_transport::{MockResponse, MockTransport, RecordedFile, RecordedRequest};

use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
