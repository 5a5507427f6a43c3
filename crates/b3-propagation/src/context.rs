//! Trace context value types for distributed trace propagation.
//!
//! This module defines the values the codec moves across process
//! boundaries:
//! - **[`TraceContext`]**: the fully-resolved identity of a trace/span pair
//! - **[`SamplingFlags`]**: the sampling/debug decision alone, used when no
//!   usable trace ID is present
//! - **[`TraceContextOrSamplingFlags`]**: the universal extraction result
//! - **[`MutableTraceContext`]**: a caller-owned, reusable holder for
//!   allocation-free extraction on hot paths
//!
//! # Identity
//!
//! Trace IDs are up to 128 bits wide, split across two 64-bit halves. A
//! zero high half denotes a plain 64-bit trace ID. Trace and span IDs are
//! never zero in a valid context; the constructor enforces this before
//! anything reaches the wire.
//!
//! # Sampling
//!
//! The sampling decision is tri-state (`Some(true)`, `Some(false)`, or
//! `None` for unknown). The debug flag forces sampling: a debug context
//! always reports `sampled() == Some(true)`.
//!
//! # Sharing
//!
//! `TraceContext`, `SamplingFlags`, and `TraceContextOrSamplingFlags` are
//! immutable `Copy` values, safe to share across threads without
//! synchronization. `MutableTraceContext` is not thread-safe: at most one
//! in-flight extraction may own and write it at a time.

use thiserror::Error;

use crate::hex::write_lower_hex;

/// A trace context that would be meaningless on the wire.
///
/// Returned by [`TraceContext::new`] for zero trace or span IDs. This is
/// the only fatal condition in the crate; everything read from a carrier
/// degrades silently instead.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidTraceContext {
    #[error("trace_id must not be zero")]
    ZeroTraceId,
    #[error("span_id must not be zero")]
    ZeroSpanId,
}

/// Sampling and debug decision, without trace identity.
///
/// Used as the extraction result when a carrier holds a sampling decision
/// but no usable trace ID. The debug flag subsumes sampling: debug flags
/// always report `sampled() == Some(true)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SamplingFlags {
    sampled: Option<bool>,
    debug: bool,
}

impl SamplingFlags {
    /// No decision at all.
    pub const EMPTY: Self = Self {
        sampled: None,
        debug: false,
    };
    /// Explicitly sampled.
    pub const SAMPLED: Self = Self {
        sampled: Some(true),
        debug: false,
    };
    /// Explicitly not sampled.
    pub const NOT_SAMPLED: Self = Self {
        sampled: Some(false),
        debug: false,
    };
    /// Debug, which forces sampling.
    pub const DEBUG: Self = Self {
        sampled: Some(true),
        debug: true,
    };

    pub(crate) const fn new(sampled: Option<bool>, debug: bool) -> Self {
        if debug {
            Self::DEBUG
        } else {
            Self {
                sampled,
                debug: false,
            }
        }
    }

    /// Tri-state sampling decision. `None` means unknown.
    #[must_use]
    pub const fn sampled(&self) -> Option<bool> {
        self.sampled
    }

    /// Whether the debug flag is set.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }
}

/// The fully-resolved identity of a trace/span pair.
///
/// Immutable after construction; created once via [`TraceContext::new`] or
/// by extraction and then freely shared. A context always carries non-zero
/// trace and span IDs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TraceContext {
    trace_id_high: u64,
    trace_id: u64,
    span_id: u64,
    parent_id: Option<u64>,
    flags: SamplingFlags,
}

impl TraceContext {
    /// Validated constructor.
    ///
    /// Rejects a zero `trace_id` or `span_id`. A zero `trace_id_high`
    /// denotes a 64-bit trace ID; an absent (or zero) `parent_id` makes
    /// this a root span. When `debug` is set the sampling decision is
    /// normalized to `Some(true)` regardless of `sampled`.
    pub fn new(
        trace_id_high: u64,
        trace_id: u64,
        span_id: u64,
        parent_id: Option<u64>,
        sampled: Option<bool>,
        debug: bool,
    ) -> Result<Self, InvalidTraceContext> {
        if trace_id == 0 {
            return Err(InvalidTraceContext::ZeroTraceId);
        }
        if span_id == 0 {
            return Err(InvalidTraceContext::ZeroSpanId);
        }

        Ok(Self {
            trace_id_high,
            trace_id,
            span_id,
            parent_id: parent_id.filter(|&id| id != 0),
            flags: SamplingFlags::new(sampled, debug),
        })
    }

    /// High 64 bits of a 128-bit trace ID; zero for 64-bit trace IDs.
    #[must_use]
    pub const fn trace_id_high(&self) -> u64 {
        self.trace_id_high
    }

    /// Low 64 bits of the trace ID. Never zero.
    #[must_use]
    pub const fn trace_id(&self) -> u64 {
        self.trace_id
    }

    /// Span ID. Never zero.
    #[must_use]
    pub const fn span_id(&self) -> u64 {
        self.span_id
    }

    /// Span ID of the caller; `None` for root spans.
    #[must_use]
    pub const fn parent_id(&self) -> Option<u64> {
        self.parent_id
    }

    /// Tri-state sampling decision. `Some(true)` whenever debug is set.
    #[must_use]
    pub const fn sampled(&self) -> Option<bool> {
        self.flags.sampled()
    }

    /// Whether the debug flag is set.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.flags.is_debug()
    }

    /// The sampling decision of this context, without its identity.
    #[must_use]
    pub const fn sampling_flags(&self) -> SamplingFlags {
        self.flags
    }

    /// Wire form of the trace ID: 32 lowercase hex characters when the
    /// high half is set, 16 otherwise.
    #[must_use]
    pub fn trace_id_string(&self) -> String {
        if self.trace_id_high == 0 {
            write_lower_hex(self.trace_id)
        } else {
            let mut value = write_lower_hex(self.trace_id_high);
            value.push_str(&write_lower_hex(self.trace_id));
            value
        }
    }
}

/// Universal extraction result: a full context, a flags-only decision, or
/// nothing.
///
/// Exactly one variant is populated; extraction always returns one of
/// them, never an error. Match exhaustively at call sites, or use the
/// accessors for the common questions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TraceContextOrSamplingFlags {
    /// A usable trace/span pair was present.
    Context(TraceContext),
    /// Only a sampling decision (possibly empty) was present.
    Flags(SamplingFlags),
    /// Nothing usable at all.
    #[default]
    Empty,
}

impl TraceContextOrSamplingFlags {
    /// The extracted context, if any.
    #[must_use]
    pub const fn context(&self) -> Option<&TraceContext> {
        match self {
            Self::Context(context) => Some(context),
            Self::Flags(_) | Self::Empty => None,
        }
    }

    /// Tri-state sampling decision across all variants.
    #[must_use]
    pub const fn sampled(&self) -> Option<bool> {
        match self {
            Self::Context(context) => context.sampled(),
            Self::Flags(flags) => flags.sampled(),
            Self::Empty => None,
        }
    }

    /// Whether the debug flag is set, across all variants.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        match self {
            Self::Context(context) => context.is_debug(),
            Self::Flags(flags) => flags.is_debug(),
            Self::Empty => false,
        }
    }

    /// `true` for the [`Self::Empty`] variant.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Caller-owned, reusable extraction target.
///
/// Holds the same fields as [`TraceContext`] but each one individually
/// settable, with an explicit unset state distinct from zero. Extraction
/// into this holder avoids allocating a new immutable result per call,
/// which matters on the inbound-request hot path.
///
/// # Ownership
///
/// Exclusively owned by one logical extraction at a time; not thread-safe.
/// Reuse across sequential extractions requires [`Self::reset`] first.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MutableTraceContext {
    trace_id_high: u64,
    trace_id: Option<u64>,
    span_id: Option<u64>,
    parent_id: Option<u64>,
    sampled: Option<bool>,
    debug: bool,
}

impl MutableTraceContext {
    /// A holder with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every field to its unset state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// High 64 bits of the trace ID; zero until set.
    #[must_use]
    pub const fn trace_id_high(&self) -> u64 {
        self.trace_id_high
    }

    /// Low 64 bits of the trace ID; `None` until set.
    #[must_use]
    pub const fn trace_id(&self) -> Option<u64> {
        self.trace_id
    }

    /// Span ID; `None` until set.
    #[must_use]
    pub const fn span_id(&self) -> Option<u64> {
        self.span_id
    }

    /// Parent span ID; `None` until set.
    #[must_use]
    pub const fn parent_id(&self) -> Option<u64> {
        self.parent_id
    }

    /// Tri-state sampling decision. `Some(true)` whenever debug is set.
    #[must_use]
    pub const fn sampled(&self) -> Option<bool> {
        if self.debug {
            Some(true)
        } else {
            self.sampled
        }
    }

    /// Whether the debug flag is set.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn set_trace_id_high(&mut self, trace_id_high: u64) {
        self.trace_id_high = trace_id_high;
    }

    pub fn set_trace_id(&mut self, trace_id: u64) {
        self.trace_id = Some(trace_id);
    }

    pub fn set_span_id(&mut self, span_id: u64) {
        self.span_id = Some(span_id);
    }

    pub fn set_parent_id(&mut self, parent_id: u64) {
        self.parent_id = Some(parent_id);
    }

    pub fn set_sampled(&mut self, sampled: bool) {
        self.sampled = Some(sampled);
    }

    /// Setting debug forces the sampling decision to `Some(true)`.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
        if debug {
            self.sampled = Some(true);
        }
    }

    /// The sampling decision currently held, without identity.
    #[must_use]
    pub const fn sampling_flags(&self) -> SamplingFlags {
        SamplingFlags::new(self.sampled, self.debug)
    }

    /// Converts to an immutable context when both trace and span IDs are
    /// set. Zero IDs never land here: extraction rejects them as
    /// malformed before writing.
    #[must_use]
    pub fn to_context(&self) -> Option<TraceContext> {
        let trace_id = self.trace_id?;
        let span_id = self.span_id?;

        TraceContext::new(
            self.trace_id_high,
            trace_id,
            span_id,
            self.parent_id,
            self.sampled,
            self.debug,
        )
        .ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;

    #[test]
    fn rejects_zero_trace_id() {
        assert_eq!(
            TraceContext::new(0, 0, 1, None, None, false),
            Err(InvalidTraceContext::ZeroTraceId)
        );
    }

    #[test]
    fn rejects_zero_span_id() {
        assert_eq!(
            TraceContext::new(0, 1, 0, None, None, false),
            Err(InvalidTraceContext::ZeroSpanId)
        );
    }

    #[test]
    fn zero_high_bits_are_a_64_bit_trace_id() {
        let context = TraceContext::new(0, 1, 2, None, None, false).unwrap();
        assert_eq!(context.trace_id_high(), 0);
        assert_eq!(context.trace_id_string(), "0000000000000001");
    }

    #[test]
    fn high_bits_widen_the_wire_form() {
        let context =
            TraceContext::new(0x6789_1233_abcd_ef01, 0x2345_6789_1234_5678, 2, None, None, false)
                .unwrap();
        assert_eq!(context.trace_id_string(), "67891233abcdef012345678912345678");
    }

    #[test]
    fn debug_forces_sampled() {
        let context = TraceContext::new(0, 1, 2, None, Some(false), true).unwrap();
        assert!(context.is_debug());
        assert_eq!(context.sampled(), Some(true));
        assert_eq!(context.sampling_flags(), SamplingFlags::DEBUG);
    }

    #[test]
    fn zero_parent_is_a_root_span() {
        let context = TraceContext::new(0, 1, 2, Some(0), None, false).unwrap();
        assert_eq!(context.parent_id(), None);
    }

    #[test]
    fn sampling_flag_constants() {
        assert_eq!(SamplingFlags::EMPTY.sampled(), None);
        assert_eq!(SamplingFlags::SAMPLED.sampled(), Some(true));
        assert_eq!(SamplingFlags::NOT_SAMPLED.sampled(), Some(false));
        assert_eq!(SamplingFlags::DEBUG.sampled(), Some(true));
        assert!(SamplingFlags::DEBUG.is_debug());
        assert_eq!(SamplingFlags::default(), SamplingFlags::EMPTY);
    }

    #[test]
    fn union_default_is_empty() {
        let result = TraceContextOrSamplingFlags::default();
        assert!(result.is_empty());
        assert_eq!(result.sampled(), None);
        assert!(!result.is_debug());
        assert_eq!(result.context(), None);
    }

    #[test]
    fn union_accessors_delegate() {
        let context = TraceContext::new(0, 1, 2, None, Some(false), false).unwrap();
        let result = TraceContextOrSamplingFlags::Context(context);
        assert_eq!(result.sampled(), Some(false));
        assert_eq!(result.context(), Some(&context));

        let flags = TraceContextOrSamplingFlags::Flags(SamplingFlags::DEBUG);
        assert_eq!(flags.sampled(), Some(true));
        assert!(flags.is_debug());
    }

    #[test]
    fn mutable_starts_unset() {
        let holder = MutableTraceContext::new();
        assert_eq!(holder.trace_id(), None);
        assert_eq!(holder.span_id(), None);
        assert_eq!(holder.parent_id(), None);
        assert_eq!(holder.sampled(), None);
        assert!(!holder.is_debug());
        assert_eq!(holder.to_context(), None);
    }

    #[test]
    fn mutable_round_trips_to_immutable() {
        let mut holder = MutableTraceContext::new();
        holder.set_trace_id_high(3);
        holder.set_trace_id(1);
        holder.set_span_id(2);
        holder.set_parent_id(4);
        holder.set_sampled(true);

        let context = holder.to_context().unwrap();
        assert_eq!(context, TraceContext::new(3, 1, 2, Some(4), Some(true), false).unwrap());
    }

    #[test]
    fn mutable_debug_forces_sampled() {
        let mut holder = MutableTraceContext::new();
        holder.set_debug(true);
        assert_eq!(holder.sampled(), Some(true));
        assert_eq!(holder.sampling_flags(), SamplingFlags::DEBUG);
    }

    #[test]
    fn reset_clears_every_field() {
        let mut holder = MutableTraceContext::new();
        holder.set_trace_id_high(1);
        holder.set_trace_id(2);
        holder.set_span_id(3);
        holder.set_parent_id(4);
        holder.set_debug(true);

        holder.reset();
        assert_eq!(holder, MutableTraceContext::new());
    }
}
