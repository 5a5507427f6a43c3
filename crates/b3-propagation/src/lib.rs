//! # B3 Propagation
//!
//! Codec for the B3 trace-context propagation format, connecting traces
//! across service boundaries.
//!
//! ## Overview
//!
//! Distributed tracing requires the identity of a trace (trace ID, span ID,
//! parent span ID, sampling decision, debug flag) to travel with every
//! request. This crate implements the write side (injection) and read side
//! (extraction) of that exchange for the B3 format, in both its multi-key
//! (`x-b3-*` headers) and single-header (`b3`) encodings.
//!
//! ## Architecture
//!
//! The library is organized into three modules:
//! - [`hex`]: lowercase hexadecimal codec for 64-bit identifiers
//! - [`context`]: immutable trace context value types and the reusable
//!   mutable holder for allocation-free extraction
//! - [`propagation`]: carrier capabilities, the B3 codecs, and the factory
//!   binding header keys to injector/extractor pairs
//!
//! ## Leniency
//!
//! Carriers originate from untrusted transport input. Extraction never
//! fails loudly: malformed or absent headers degrade to a flags-only or
//! empty result so tracing can never break the request it observes. Only
//! programmer misuse (constructing a context with a zero trace or span ID)
//! is an error, and it is caught at construction time before anything
//! reaches the wire.
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use b3_propagation::{B3Propagation, TraceContext, TraceContextOrSamplingFlags};
//!
//! let propagation = B3Propagation::new();
//! let context = TraceContext::new(0, 0x2345_6789_1234_5678, 0x463a_c35c_9f64_13ad,
//!     None, Some(true), false).expect("non-zero ids");
//!
//! let mut carrier = HashMap::new();
//! propagation.injector().inject(&context, &mut carrier);
//!
//! match propagation.extractor().extract(&carrier) {
//!     TraceContextOrSamplingFlags::Context(extracted) => assert_eq!(extracted, context),
//!     other => panic!("expected a context, got {other:?}"),
//! }
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_copy_implementations)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

/// Trace context value types and the reusable mutable extraction holder
pub mod context;

/// Lowercase hexadecimal codec for 64-bit identifiers
pub mod hex;

/// Carrier capabilities, B3 codecs, and the propagation factory
pub mod propagation;

pub use context::{
    MutableTraceContext, SamplingFlags, TraceContext, TraceContextOrSamplingFlags,
};
pub use propagation::{B3Extractor, B3Injector, B3Keys, B3Propagation};
