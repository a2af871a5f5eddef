//! Instrumented Operation Module
//!
//! Wraps an operation so that every call is counted and its input and output
//! are recorded in the store.

use std::fmt::Display;
use std::sync::Mutex;

use tracing::debug;

use crate::cache::history::{inputs_key, outputs_key};
use crate::error::{CacheError, Result};
use crate::store::SharedStore;

// == Instrumented Operation ==
/// An operation decorated with call counting and call history.
///
/// The counter lives under `name`, the history under `name:inputs` and
/// `name:outputs`.
pub struct InstrumentedOperation<F> {
    name: String,
    store: SharedStore,
    inner: F,
    /// Keeps each input/output pair adjacent in the two sequences.
    record_lock: Mutex<()>,
}

impl<F> InstrumentedOperation<F> {
    // == Constructor ==
    /// Wraps `inner`, recording its calls in `store` under `name`.
    pub fn new(name: impl Into<String>, store: SharedStore, inner: F) -> Self {
        Self {
            name: name.into(),
            store,
            inner,
            record_lock: Mutex::new(()),
        }
    }

    /// Returns the name the calls are recorded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Call ==
    /// Invokes the wrapped operation.
    ///
    /// The counter is incremented before the call. Input and output are
    /// appended together after a successful call, so a failed call is counted
    /// but leaves the two history sequences the same length. Pairs recorded
    /// through one wrapper never interleave; wrappers in other processes
    /// sharing the store are not coordinated with.
    pub fn call<I, O>(&self, input: I) -> Result<O>
    where
        F: Fn(I) -> Result<O>,
        I: Display,
        O: Display,
    {
        let input_repr = input.to_string();
        let calls = self.store.increment(&self.name)?;

        let output = (self.inner)(input)?;

        let _guard = self
            .record_lock
            .lock()
            .map_err(|_| CacheError::Internal("history lock poisoned".to_string()))?;
        self.store
            .append_to_list(&inputs_key(&self.name), input_repr.into_bytes())?;
        self.store
            .append_to_list(&outputs_key(&self.name), output.to_string().into_bytes())?;

        debug!(operation = %self.name, calls, "recorded call");
        Ok(output)
    }
}
