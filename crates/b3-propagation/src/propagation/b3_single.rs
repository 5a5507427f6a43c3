//! Single-header B3 codec: the combined `b3` value.
//!
//! # Value Format
//!
//! ```text
//! b3: {traceId}-{spanId}-{samplingState}-{parentSpanId}
//! ```
//!
//! The sampling state and parent span ID are optional; the parent can only
//! appear after a sampling state. The sampling state is one character:
//! `1` (sampled), `0` (not sampled), or `d` (debug). A bare sampling state
//! (`b3: 0`) is also valid and carries a decision without identity.
//!
//! Examples:
//!
//! ```text
//! b3: 67891233abcdef012345678912345678-463ac35c9f6413ad-1
//! b3: 2345678912345678-463ac35c9f6413ad-d-0000000000000001
//! b3: 0
//! ```
//!
//! Parsing follows the same leniency rules as the multi-key form: the
//! value shape is pre-checked by regex, halves go through the hex codec,
//! and anything unusable degrades to [`TraceContextOrSamplingFlags::Empty`]
//! rather than an error.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::context::{MutableTraceContext, TraceContext, TraceContextOrSamplingFlags};
use crate::hex::write_lower_hex;
use crate::propagation::b3::{parse_span_id, parse_trace_id, B3Fields};
use crate::propagation::carrier::{Getter, Setter};
use crate::propagation::error::ExtractionIssue;

/// Carrier key for the combined single-header format.
pub const B3_SINGLE_KEY: &str = "b3";

lazy_static! {
    /// Shape of a combined `b3` value.
    ///
    /// `traceId-spanId[-samplingState[-parentSpanId]]` with lowercase hex
    /// segments. Field contents are validated separately by the hex codec.
    static ref B3_SINGLE_REGEX: Regex = Regex::new(
        r"^([0-9a-f]{16}|[0-9a-f]{32})-([0-9a-f]{16})(?:-([01d]))?(?:-([0-9a-f]{16}))?$"
    )
    .expect("failed creating regex");
}

/// Formats a context as a combined `b3` value.
///
/// Emits the shortest valid form: the sampling state is omitted when
/// unknown, and the parent span ID requires a sampling state before it.
#[must_use]
pub fn write_b3_single(context: &TraceContext) -> String {
    let mut value = context.trace_id_string();
    value.push('-');
    value.push_str(&write_lower_hex(context.span_id()));

    if context.is_debug() {
        value.push_str("-d");
    } else if let Some(sampled) = context.sampled() {
        value.push_str(if sampled { "-1" } else { "-0" });
    }

    if context.sampled().is_some() {
        if let Some(parent_id) = context.parent_id() {
            value.push('-');
            value.push_str(&write_lower_hex(parent_id));
        }
    }

    value
}

/// Parses a combined `b3` value with the multi-key leniency rules.
///
/// A blank or unusable value is [`TraceContextOrSamplingFlags::Empty`];
/// a bare sampling state is the `Flags` variant; a full form with a bad
/// parent keeps the trace/span pair and drops only the parent.
#[must_use]
pub fn parse_b3_single(value: &str) -> TraceContextOrSamplingFlags {
    parse_fields(value).map_or(TraceContextOrSamplingFlags::Empty, B3Fields::into_result)
}

fn parse_fields(value: &str) -> Option<B3Fields> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let mut fields = B3Fields::default();

    // Bare sampling state, no identity.
    if value.len() == 1 {
        match value {
            "d" => {
                fields.debug = true;
                fields.sampled = Some(true);
            }
            "1" => fields.sampled = Some(true),
            "0" => fields.sampled = Some(false),
            _ => {
                debug!("{}", ExtractionIssue::MalformedSampledFlag);
                return None;
            }
        }
        return Some(fields);
    }

    let Some(captures) = B3_SINGLE_REGEX.captures(value) else {
        debug!("{}", ExtractionIssue::MalformedTraceId);
        return None;
    };

    let Some((trace_id_high, trace_id)) = parse_trace_id(&captures[1]) else {
        debug!("{}", ExtractionIssue::MalformedTraceId);
        return None;
    };
    let Some(span_id) = parse_span_id(&captures[2]) else {
        debug!("{}", ExtractionIssue::MissingOrMalformedSpanId);
        return None;
    };

    fields.trace_id_high = trace_id_high;
    fields.trace_id = Some(trace_id);
    fields.span_id = Some(span_id);

    match captures.get(3).map(|state| state.as_str()) {
        Some("d") => {
            fields.debug = true;
            fields.sampled = Some(true);
        }
        Some("1") => fields.sampled = Some(true),
        Some("0") => fields.sampled = Some(false),
        _ => {}
    }

    if let Some(parent) = captures.get(4) {
        match parse_span_id(parent.as_str()) {
            Some(parent_id) => fields.parent_id = Some(parent_id),
            // An all-zero parent is unusable; the pair stays valid.
            None => debug!("{}", ExtractionIssue::MalformedParentSpanId),
        }
    }

    Some(fields)
}

/// Write side of the single-header codec.
#[derive(Debug, Clone)]
pub struct B3SingleInjector {
    key: String,
}

impl Default for B3SingleInjector {
    fn default() -> Self {
        Self {
            key: B3_SINGLE_KEY.to_string(),
        }
    }
}

impl B3SingleInjector {
    /// Binds a custom carrier key.
    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Writes a context into a carrier as one combined value.
    pub fn inject<C: Setter + ?Sized>(&self, context: &TraceContext, carrier: &mut C) {
        carrier.set(&self.key, write_b3_single(context));
    }
}

/// Read side of the single-header codec.
#[derive(Debug, Clone)]
pub struct B3SingleExtractor {
    key: String,
}

impl Default for B3SingleExtractor {
    fn default() -> Self {
        Self {
            key: B3_SINGLE_KEY.to_string(),
        }
    }
}

impl B3SingleExtractor {
    /// Binds a custom carrier key.
    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Reads the combined value from a carrier and classifies the result.
    pub fn extract<C: Getter + ?Sized>(&self, carrier: &C) -> TraceContextOrSamplingFlags {
        carrier
            .get(&self.key)
            .map_or(TraceContextOrSamplingFlags::Empty, parse_b3_single)
    }

    /// Reads the combined value into a caller-owned holder.
    ///
    /// Fully overwrites `out`; field-for-field equivalent to
    /// [`Self::extract`].
    pub fn extract_into<C: Getter + ?Sized>(&self, carrier: &C, out: &mut MutableTraceContext) {
        match carrier.get(&self.key).and_then(parse_fields) {
            Some(fields) => fields.write_into(out),
            None => out.reset(),
        }
    }
}
