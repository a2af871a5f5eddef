//! Call History Module
//!
//! Key naming for recorded calls and the replay of a recorded history.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::store::KeyValueStore;

/// Key of the list holding the recorded inputs of `operation`.
pub fn inputs_key(operation: &str) -> String {
    format!("{operation}:inputs")
}

/// Key of the list holding the recorded outputs of `operation`.
pub fn outputs_key(operation: &str) -> String {
    format!("{operation}:outputs")
}

// == Call Record ==
/// One recorded call: the input and output representations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

// == Replay ==
/// A recorded call history, oldest call first.
#[derive(Debug, Clone, Serialize)]
pub struct Replay {
    /// Operation the history belongs to
    pub operation: String,
    /// Number of recorded inputs
    pub calls: usize,
    /// Paired calls, up to the shorter of the two sequences
    pub history: Vec<CallRecord>,
    /// Number of recorded outputs
    pub outputs: usize,
}

impl Replay {
    /// False when the input and output sequences differ in length.
    pub fn is_consistent(&self) -> bool {
        self.calls == self.outputs
    }
}

/// Renders the human-readable transcript.
impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.operation, self.calls)?;
        for record in &self.history {
            write!(f, "\n{}({}) -> {}", self.operation, record.input, record.output)?;
        }
        Ok(())
    }
}

// == Replay ==
/// Reads the recorded history of `operation` from `store`.
///
/// A length mismatch between inputs and outputs is logged and reported
/// through [`Replay::is_consistent`]; only the common prefix is paired.
pub fn replay(store: &dyn KeyValueStore, operation: &str) -> Result<Replay> {
    let inputs = store.list_range(&inputs_key(operation), 0, -1)?;
    let outputs = store.list_range(&outputs_key(operation), 0, -1)?;

    if inputs.len() != outputs.len() {
        warn!(
            operation,
            inputs = inputs.len(),
            outputs = outputs.len(),
            "call history is inconsistent, replaying common prefix"
        );
    }

    let calls = inputs.len();
    let recorded_outputs = outputs.len();
    let history = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| CallRecord {
            input: String::from_utf8_lossy(&input).into_owned(),
            output: String::from_utf8_lossy(&output).into_owned(),
        })
        .collect();

    Ok(Replay {
        operation: operation.to_string(),
        calls,
        history,
        outputs: recorded_outputs,
    })
}
