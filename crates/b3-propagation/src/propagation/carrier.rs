//! Carrier capabilities for trace context propagation.
//!
//! Carriers are the transport-level key/value structures (HTTP headers,
//! message metadata, plain maps) that ferry trace context across process
//! boundaries. The codec consumes them only through two capabilities:
//! `get(key)` and `set(key, value)`. Any carrier qualifies by implementing
//! the pair; no subclassing, no iteration of carrier structure.
//!
//! # Provided carriers
//!
//! - **`HashMap<String, String>`**: for testing and in-memory operations
//! - **`serde_json::Value`**: for JSON-based message formats
//!
//! # Case insensitivity
//!
//! Both implementations normalize keys to lowercase on write and read, so
//! HTTP header casing differences (`X-B3-TraceId` vs `x-b3-traceid`)
//! never matter.

use std::collections::HashMap;

use serde_json::Value;

/// Write capability: puts a key/value pair into a carrier.
///
/// Injection calls this once per written field and nothing else. Keys are
/// expected to be stored case-insensitively (the provided implementations
/// lowercase them).
pub trait Setter {
    /// Sets a key-value pair in the carrier.
    fn set(&mut self, key: &str, value: String);
}

/// Read capability: gets a value from a carrier by key, or reports it
/// absent.
///
/// Extraction calls this once per bound key and nothing else; the codec
/// never iterates a carrier.
pub trait Getter {
    /// Gets a value from the carrier by key (case-insensitive), `None`
    /// when absent.
    fn get(&self, key: &str) -> Option<&str>;
}

/// `Setter` for `HashMap`, storing keys in lowercase.
impl<S: std::hash::BuildHasher> Setter for HashMap<String, String, S> {
    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_lowercase(), value);
    }
}

/// `Getter` for `HashMap`, matching keys case-insensitively.
impl<S: std::hash::BuildHasher> Getter for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        self.get(&key.to_lowercase()).map(String::as_str)
    }
}

/// `Setter` for `serde_json::Value`.
///
/// Only operates on `Value::Object`; anything else is silently ignored.
impl Setter for Value {
    fn set(&mut self, key: &str, value: String) {
        if let Value::Object(map) = self {
            map.insert(key.to_lowercase(), Value::String(value));
        }
    }
}

/// `Getter` for `serde_json::Value`.
///
/// Only operates on `Value::Object`; non-object values and non-string
/// members read as absent.
impl Getter for Value {
    fn get(&self, key: &str) -> Option<&str> {
        if let Value::Object(map) = self {
            map.get(&key.to_lowercase()).and_then(|v| v.as_str())
        } else {
            None
        }
    }
}
