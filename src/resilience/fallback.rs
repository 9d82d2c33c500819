//! Non-fatal stage handling.

use std::fmt::Display;

/// Substitutes a default value when an optional stage fails.
///
/// The failure is logged at `warn` and never reaches the caller.
pub trait FallbackExt<T> {
    /// Returns the success value, or `fallback()` after logging the error.
    fn or_fallback<F>(self, stage: &'static str, fallback: F) -> T
    where
        F: FnOnce() -> T;
}

impl<T, E: Display> FallbackExt<T> for Result<T, E> {
    fn or_fallback<F>(self, stage: &'static str, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(stage, error = %err, "Optional stage failed, using fallback");
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_passes_through() {
        let value: Result<&str, String> = Ok("refined");
        assert_eq!(value.or_fallback("refine", || "original"), "refined");
    }

    #[test]
    fn test_err_uses_fallback() {
        let value: Result<&str, String> = Err("upstream 500".to_string());
        assert_eq!(value.or_fallback("refine", || "original"), "original");
    }
}
