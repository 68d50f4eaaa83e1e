//! Conversion of panics raised by user code into creation errors.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::{DiError, DiResult, PanicCause};

/// Runs `f`, converting a panic into [`DiError::Creation`] for `type_name`.
pub(crate) fn catch_creation<R>(type_name: &'static str, f: impl FnOnce() -> DiResult<R>) -> DiResult<R> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let cause = PanicCause::from_payload(payload.as_ref());
            tracing::error!(service = type_name, %cause, "panic during instance creation");
            Err(DiError::creation(type_name, cause))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_becomes_creation_error() {
        let result: DiResult<()> = catch_creation("Widget", || panic!("boom"));
        match result {
            Err(DiError::Creation { type_name, source }) => {
                assert_eq!(type_name, "Widget");
                assert_eq!(source.to_string(), "panicked: boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn errors_pass_through() {
        let result: DiResult<()> = catch_creation("Widget", || Err(DiError::NotFound("Dep")));
        assert!(matches!(result, Err(DiError::NotFound("Dep"))));
    }
}
