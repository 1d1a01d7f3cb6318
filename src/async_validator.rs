//! Concurrent execution of externally registered checks.
//!
//! Some constraints can't be decided from the value alone (a username must
//! not be taken, an id must exist upstream). [`AsyncValidator`] collects such
//! checks as `(predicate, params)` pairs and runs them all at once on a
//! rayon pool sized to the batch, folding the outcomes into the result of
//! the synchronous pass. Blocking lookups never wait for a free worker and
//! never occupy the global pool.
//!
//! A predicate returns `Ok(result)` to report conformance and `Err(..)` for
//! a hard failure (the lookup itself broke). Hard failures abort the merge.
//!
//! # Example
//!
//! ```rust
//! use lxvalid::{AsyncValidator, JsonPath, ValidationError, ValidationResult};
//!
//! let mut checks = AsyncValidator::new();
//! checks.register(
//!     |name: String| {
//!         if name == "admin" {
//!             Ok(ValidationResult::single(
//!                 ValidationError::new("unique", JsonPath::from_field("name"))
//!                     .with_message("is already taken"),
//!             ))
//!         } else {
//!             Ok(ValidationResult::ok())
//!         }
//!     },
//!     "admin".to_string(),
//! );
//!
//! let result = checks.exec(ValidationResult::ok()).unwrap();
//! assert!(!result.valid);
//! assert_eq!(result.errors[0].message, "is already taken");
//! assert!(checks.is_empty());
//! ```

use std::fmt;

use rayon::prelude::*;

use crate::error::ValidationResult;

/// Boxed error returned by a predicate that could not run.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

type Thunk = Box<dyn FnOnce() -> Result<ValidationResult, BoxError> + Send>;

/// Errors that abort [`AsyncValidator::exec`].
#[derive(Debug, thiserror::Error)]
pub enum AsyncValidationError {
    /// A registered check failed to run.
    #[error("async check #{index} failed: {source}")]
    Check {
        /// Registration position of the failing check.
        index: usize,
        #[source]
        source: BoxError,
    },

    #[error("cannot start async check workers: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Registry of checks run together by [`exec`](AsyncValidator::exec).
#[derive(Default)]
pub struct AsyncValidator {
    thunks: Vec<Thunk>,
}

impl AsyncValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `predicate(params)` for the next [`exec`](Self::exec).
    pub fn register<P, F>(&mut self, predicate: F, params: P) -> &mut Self
    where
        P: Send + 'static,
        F: FnOnce(P) -> Result<ValidationResult, BoxError> + Send + 'static,
    {
        self.thunks.push(Box::new(move || predicate(params)));
        self
    }

    /// Number of checks waiting to run.
    pub fn len(&self) -> usize {
        self.thunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thunks.is_empty()
    }

    /// Runs every queued check concurrently and folds the outcomes into
    /// `initial`.
    ///
    /// Each batch gets its own pool with one worker per check, so no check
    /// waits for another to finish.
    ///
    /// Results are merged in registration order. A failing check marks the
    /// result invalid and contributes only its first error. The queue is
    /// empty afterwards whether or not a check failed hard; the first hard
    /// failure in registration order is returned instead of a result.
    pub fn exec(
        &mut self,
        initial: ValidationResult,
    ) -> Result<ValidationResult, AsyncValidationError> {
        let thunks = std::mem::take(&mut self.thunks);
        if thunks.is_empty() {
            return Ok(initial);
        }
        tracing::debug!(checks = thunks.len(), "running async checks");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thunks.len())
            .thread_name(|i| format!("lxvalid-check-{i}"))
            .build()?;
        let outcomes: Vec<Result<ValidationResult, BoxError>> = pool.install(|| {
            thunks
                .into_par_iter()
                .with_max_len(1)
                .map(|thunk| thunk())
                .collect()
        });

        let mut merged = initial;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            let result = outcome.map_err(|source| {
                tracing::warn!(index, error = %source, "async check failed");
                AsyncValidationError::Check { index, source }
            })?;
            if !result.valid {
                merged.valid = false;
                merged.errors.extend(result.errors.into_iter().take(1));
            }
        }

        Ok(merged)
    }
}

impl fmt::Debug for AsyncValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncValidator")
            .field("pending", &self.thunks.len())
            .finish()
    }
}
