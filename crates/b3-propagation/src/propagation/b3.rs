//! Multi-key B3 codec: the `x-b3-*` header family.
//!
//! # Header Format
//!
//! ```text
//! x-b3-traceid: 67891233abcdef012345678912345678
//! x-b3-spanid: 463ac35c9f6413ad
//! x-b3-parentspanid: 2345678912345678
//! x-b3-sampled: 1
//! x-b3-flags: 1
//! ```
//!
//! The trace ID is 16 lowercase hex characters for 64-bit trace IDs and
//! 32 for 128-bit ones. `x-b3-flags: 1` marks a debug trace and subsumes
//! the sampled key. The sampled key is written only for an explicit
//! decision; an unknown decision omits it.
//!
//! # Lenient extraction
//!
//! Extraction reads carriers that arrive from untrusted transport input
//! and must never break the request it observes. Every field is validated
//! independently and malformed input degrades per the fallback chain in
//! [`crate::propagation::error`]. The whole pipeline is factored into one
//! internal field reader; the immutable and mutable extraction paths are
//! thin wrappers over it, so they agree field-for-field by construction.

use tracing::{debug, warn};

use crate::context::{
    MutableTraceContext, SamplingFlags, TraceContext, TraceContextOrSamplingFlags,
};
use crate::hex::{parse_lower_hex, write_lower_hex};
use crate::propagation::carrier::{Getter, Setter};
use crate::propagation::error::ExtractionIssue;

/// Carrier key for the trace ID (16 or 32 lowercase hex characters).
pub const B3_TRACE_ID_KEY: &str = "x-b3-traceid";

/// Carrier key for the span ID (16 lowercase hex characters).
pub const B3_SPAN_ID_KEY: &str = "x-b3-spanid";

/// Carrier key for the parent span ID (16 lowercase hex characters).
pub const B3_PARENT_SPAN_ID_KEY: &str = "x-b3-parentspanid";

/// Carrier key for the sampling decision (`1` or `0`).
pub const B3_SAMPLED_KEY: &str = "x-b3-sampled";

/// Carrier key for the debug flag (`1`). Subsumes the sampled key.
pub const B3_FLAGS_KEY: &str = "x-b3-flags";

/// The set of carrier keys one propagation instance is bound to.
///
/// `Default` gives the canonical lowercase B3 header names. Custom names
/// cover carriers that transport the same fields under different keys
/// (message attributes, gRPC metadata).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct B3Keys {
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: String,
    pub sampled: String,
    pub debug: String,
}

impl Default for B3Keys {
    fn default() -> Self {
        Self {
            trace_id: B3_TRACE_ID_KEY.to_string(),
            span_id: B3_SPAN_ID_KEY.to_string(),
            parent_span_id: B3_PARENT_SPAN_ID_KEY.to_string(),
            sampled: B3_SAMPLED_KEY.to_string(),
            debug: B3_FLAGS_KEY.to_string(),
        }
    }
}

/// Fixed-size intermediate record produced by the lenient field reader.
///
/// Both extraction paths are built from this: [`Self::into_result`]
/// allocates the immutable union, [`Self::write_into`] fills a
/// caller-owned holder.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub(crate) struct B3Fields {
    pub(crate) trace_id_high: u64,
    pub(crate) trace_id: Option<u64>,
    pub(crate) span_id: Option<u64>,
    pub(crate) parent_id: Option<u64>,
    pub(crate) sampled: Option<bool>,
    pub(crate) debug: bool,
}

impl B3Fields {
    pub(crate) fn into_result(self) -> TraceContextOrSamplingFlags {
        let flags = SamplingFlags::new(self.sampled, self.debug);

        match (self.trace_id, self.span_id) {
            (Some(trace_id), Some(span_id)) => TraceContext::new(
                self.trace_id_high,
                trace_id,
                span_id,
                self.parent_id,
                self.sampled,
                self.debug,
            )
            .map_or(
                // Unreachable: zero ids are rejected as malformed upstream.
                TraceContextOrSamplingFlags::Flags(flags),
                TraceContextOrSamplingFlags::Context,
            ),
            _ => TraceContextOrSamplingFlags::Flags(flags),
        }
    }

    pub(crate) fn write_into(self, out: &mut MutableTraceContext) {
        out.reset();
        out.set_trace_id_high(self.trace_id_high);
        if let Some(trace_id) = self.trace_id {
            out.set_trace_id(trace_id);
        }
        if let Some(span_id) = self.span_id {
            out.set_span_id(span_id);
        }
        if let Some(parent_id) = self.parent_id {
            out.set_parent_id(parent_id);
        }
        if let Some(sampled) = self.sampled {
            out.set_sampled(sampled);
        }
        if self.debug {
            out.set_debug(true);
        }
    }
}

/// Parses an explicit boolean carrier value.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Parses a trace ID value into its high and low halves.
///
/// Accepts exactly 16 or 32 lowercase hex characters; a zero low half is
/// malformed (a valid context never carries a zero trace ID).
pub(crate) fn parse_trace_id(value: &str) -> Option<(u64, u64)> {
    let (high, low) = match value.len() {
        16 => (0, parse_lower_hex(value).ok()?),
        32 => (
            parse_lower_hex(value.get(..16)?).ok()?,
            parse_lower_hex(value.get(16..)?).ok()?,
        ),
        _ => return None,
    };

    (low != 0).then_some((high, low))
}

/// Parses a span or parent span ID: exactly 16 lowercase hex characters,
/// non-zero.
pub(crate) fn parse_span_id(value: &str) -> Option<u64> {
    if value.len() != 16 {
        return None;
    }

    parse_lower_hex(value).ok().filter(|&id| id != 0)
}

/// The seven-step lenient pipeline over a bound key set.
///
/// Total on any input; each malformed field degrades per its documented
/// rule and is logged, never propagated.
fn read_fields<C: Getter + ?Sized>(keys: &B3Keys, carrier: &C) -> B3Fields {
    let mut fields = B3Fields::default();

    // Debug subsumes the sampled key.
    if let Some(value) = carrier.get(&keys.debug) {
        if parse_flag(value) == Some(true) {
            fields.debug = true;
            fields.sampled = Some(true);
        }
    }

    if fields.debug {
        if carrier.get(&keys.sampled).and_then(parse_flag) == Some(false) {
            warn!("{}", ExtractionIssue::ConflictingDebugAndSampled);
        }
    } else if let Some(value) = carrier.get(&keys.sampled) {
        match parse_flag(value) {
            Some(sampled) => fields.sampled = Some(sampled),
            None => debug!("{}", ExtractionIssue::MalformedSampledFlag),
        }
    }

    let Some(trace_id) = carrier.get(&keys.trace_id) else {
        debug!("{}", ExtractionIssue::MissingTraceId);
        return fields;
    };
    let Some((trace_id_high, trace_id)) = parse_trace_id(trace_id) else {
        debug!("{}", ExtractionIssue::MalformedTraceId);
        return fields;
    };

    let Some(span_id) = carrier.get(&keys.span_id).and_then(parse_span_id) else {
        // The partially-parsed trace id is dropped; the flags still stand.
        debug!("{}", ExtractionIssue::MissingOrMalformedSpanId);
        return fields;
    };

    fields.trace_id_high = trace_id_high;
    fields.trace_id = Some(trace_id);
    fields.span_id = Some(span_id);

    if let Some(value) = carrier.get(&keys.parent_span_id) {
        match parse_span_id(value) {
            Some(parent_id) => fields.parent_id = Some(parent_id),
            // A bad parent must not invalidate a valid trace/span pair.
            None => debug!("{}", ExtractionIssue::MalformedParentSpanId),
        }
    }

    fields
}

/// Write side of the multi-key codec.
///
/// Stateless after construction (holds only the bound keys); safe for
/// unrestricted concurrent reuse.
#[derive(Debug, Clone)]
pub struct B3Injector {
    keys: B3Keys,
}

impl B3Injector {
    pub(crate) fn new(keys: B3Keys) -> Self {
        Self { keys }
    }

    /// Writes a context into a carrier.
    ///
    /// A pure formatting operation over a well-formed context; never
    /// fails. The sampled key is omitted for an unknown decision and
    /// subsumed by the debug key for debug traces.
    pub fn inject<C: Setter + ?Sized>(&self, context: &TraceContext, carrier: &mut C) {
        carrier.set(&self.keys.trace_id, context.trace_id_string());
        carrier.set(&self.keys.span_id, write_lower_hex(context.span_id()));

        if let Some(parent_id) = context.parent_id() {
            carrier.set(&self.keys.parent_span_id, write_lower_hex(parent_id));
        }

        if context.is_debug() {
            carrier.set(&self.keys.debug, "1".to_string());
        } else if let Some(sampled) = context.sampled() {
            carrier.set(&self.keys.sampled, String::from(if sampled { "1" } else { "0" }));
        }
    }
}

/// Read side of the multi-key codec.
///
/// Stateless after construction; safe for unrestricted concurrent reuse.
#[derive(Debug, Clone)]
pub struct B3Extractor {
    keys: B3Keys,
}

impl B3Extractor {
    pub(crate) fn new(keys: B3Keys) -> Self {
        Self { keys }
    }

    /// Reads a carrier and classifies the result.
    ///
    /// Always returns; malformed input terminates in the `Flags` variant,
    /// never an error.
    pub fn extract<C: Getter + ?Sized>(&self, carrier: &C) -> TraceContextOrSamplingFlags {
        read_fields(&self.keys, carrier).into_result()
    }

    /// Reads a carrier into a caller-owned holder, avoiding the per-call
    /// result allocation.
    ///
    /// Fully overwrites `out` (including a reset of previously-set
    /// fields). Field-for-field equivalent to [`Self::extract`] for every
    /// input: both paths consume the same intermediate record.
    pub fn extract_into<C: Getter + ?Sized>(&self, carrier: &C, out: &mut MutableTraceContext) {
        read_fields(&self.keys, carrier).write_into(out);
    }
}
