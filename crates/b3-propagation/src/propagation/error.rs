//! Conditions met while leniently reading B3 fields from a carrier.
//!
//! Carriers originate from untrusted transport input, so none of these
//! conditions is ever surfaced to the extraction caller: by design, every
//! malformed or absent field degrades into the flags-only or empty result
//! variant. The taxonomy exists so the lenient pipeline can name what it
//! dropped when logging.
//!
//! # Degradation
//!
//! - Missing or malformed trace ID: the whole context is unusable, the
//!   sampling decision still stands
//! - Missing or malformed span ID: same, and any parsed trace ID is
//!   dropped silently
//! - Malformed parent span ID: only this field is ignored; the context
//!   stays valid as a rootless one
//! - Malformed sampled value: collapses to unknown
//! - Conflicting debug and explicit sampled: debug wins

use thiserror::Error;

/// A field-level condition observed during lenient extraction.
///
/// Logged via `tracing` and then collapsed; never returned.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExtractionIssue {
    #[error("no trace id in carrier")]
    MissingTraceId,
    #[error("trace id is not 16 or 32 lowercase hex characters")]
    MalformedTraceId,
    #[error("span id missing or not 16 lowercase hex characters")]
    MissingOrMalformedSpanId,
    #[error("parent span id is not 16 lowercase hex characters")]
    MalformedParentSpanId,
    #[error("sampled value is not one of 1, 0, true, false")]
    MalformedSampledFlag,
    #[error("carrier sets debug and an explicit unsampled value; debug wins")]
    ConflictingDebugAndSampled,
}
