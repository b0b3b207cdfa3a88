//! UDF registry and the functions served by this process.
//!
//! The registry is the function table the query engine invokes into: each
//! function is registered under a stable name at startup and looked up per
//! request. Functions are pure with respect to their arguments, so the
//! registry is shared immutably across request tasks.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};
use thiserror::Error;

use paxcount_types::{ParseError, PaxReading};

/// Errors surfaced by UDF invocation.
#[derive(Debug, Error)]
pub enum UdfError {
    /// Wrong number of arguments.
    #[error("expected {expected} argument(s), got {actual}")]
    Arity { expected: usize, actual: usize },

    /// An argument had the wrong type.
    #[error("argument {index} must be a {expected}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
    },

    /// Payload decoding failed.
    #[error(transparent)]
    Decode(#[from] ParseError),
}

/// A scalar function callable by the query engine.
///
/// Implementations take one row's arguments and return one result value.
/// They must be `Send + Sync` and stateless: the server invokes them
/// concurrently from many request tasks without coordination.
pub trait ScalarUdf: Send + Sync {
    /// Name the function is registered under.
    fn name(&self) -> &'static str;

    /// Invoke the function on one row's arguments.
    ///
    /// # Errors
    ///
    /// Fails on arity or argument-type mismatches, or when the function's
    /// own domain logic rejects the input. There are no partial results.
    fn invoke(&self, args: &[Value]) -> Result<Value, UdfError>;
}

/// Name → function table for the serving process.
///
/// Built once at startup; immutable afterwards.
#[derive(Default)]
pub struct UdfRegistry {
    funcs: HashMap<&'static str, Arc<dyn ScalarUdf>>,
}

impl UdfRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under its own name.
    ///
    /// Registering a second function with the same name replaces the first.
    pub fn register(&mut self, udf: Arc<dyn ScalarUdf>) {
        self.funcs.insert(udf.name(), udf);
    }

    /// Look up a function by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ScalarUdf>> {
        self.funcs.get(name)
    }

    /// Names of all registered functions, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.funcs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    /// Whether the registry has no functions.
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

/// Decodes a base64 PAX counter payload into its two counters.
///
/// Declared input: a single variable-length string (base64 text).
/// Declared result: a record of two 32-bit integers,
/// `{"wifi_count": ..., "ble_count": ...}`, widened from the unsigned
/// 16-bit source fields.
pub struct PayloadDecoder;

impl ScalarUdf for PayloadDecoder {
    fn name(&self) -> &'static str {
        "ttn_payload_decoder"
    }

    fn invoke(&self, args: &[Value]) -> Result<Value, UdfError> {
        if args.len() != 1 {
            return Err(UdfError::Arity {
                expected: 1,
                actual: args.len(),
            });
        }

        let payload = args[0].as_str().ok_or(UdfError::ArgumentType {
            index: 0,
            expected: "string",
        })?;

        let reading = PaxReading::from_base64(payload)?;

        Ok(json!({
            "wifi_count": i32::from(reading.wifi_count),
            "ble_count": i32::from(reading.ble_count),
        }))
    }
}
