//! Trace context propagation: carrier capabilities, B3 codecs, and the
//! factory binding them together.
//!
//! # Data Flow
//!
//! ```text
//! Outgoing Request
//!   ↓
//! Inject (write trace context under the bound keys)
//!   ↓
//! Carrier (HTTP headers, message metadata, ...)
//!   ↓
//! Extract (read the bound keys, classify leniently)
//!   ↓
//! TraceContextOrSamplingFlags
//! ```
//!
//! # Factory
//!
//! [`B3Propagation`] binds a set of carrier key names once and hands out
//! the write-side [`B3Injector`] and read-side [`B3Extractor`]. Both are
//! stateless after construction and safe for unrestricted concurrent
//! reuse against any carrier implementing the [`carrier::Setter`] /
//! [`carrier::Getter`] capability pair.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use b3_propagation::B3Propagation;
//!
//! let propagation = B3Propagation::new();
//!
//! let headers = HashMap::from([
//!     ("x-b3-traceid".to_string(), "2345678912345678".to_string()),
//!     ("x-b3-spanid".to_string(), "463ac35c9f6413ad".to_string()),
//!     ("x-b3-sampled".to_string(), "1".to_string()),
//! ]);
//!
//! let result = propagation.extractor().extract(&headers);
//! assert_eq!(result.sampled(), Some(true));
//! ```

pub mod b3;
pub mod b3_single;
pub mod carrier;
pub mod error;

pub use b3::{B3Extractor, B3Injector, B3Keys};
pub use b3_single::{B3SingleExtractor, B3SingleInjector};

/// Factory binding carrier key names to injector/extractor pairs.
///
/// Construction is the only configuration point; everything handed out
/// afterwards is immutable. One factory serves any number of carriers
/// and threads.
#[derive(Debug, Clone, Default)]
pub struct B3Propagation {
    keys: B3Keys,
}

impl B3Propagation {
    /// A factory bound to the canonical `x-b3-*` key names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory bound to custom key names.
    #[must_use]
    pub fn with_keys(keys: B3Keys) -> Self {
        Self { keys }
    }

    /// The bound key set.
    #[must_use]
    pub fn keys(&self) -> &B3Keys {
        &self.keys
    }

    /// Write side, bound to this factory's keys.
    #[must_use]
    pub fn injector(&self) -> B3Injector {
        B3Injector::new(self.keys.clone())
    }

    /// Read side, bound to this factory's keys.
    #[must_use]
    pub fn extractor(&self) -> B3Extractor {
        B3Extractor::new(self.keys.clone())
    }
}
