//! Signal conditioning for grain storage monitoring
//!
//! Cleans CO2, temperature and humidity readings from storage chamber nodes
//! and partitions them into windows for the detectors in `grainguard-detect`.
//! Designed to run both on a gateway (batch, `std`) and next to the sensor
//! (streaming, `no_std` + `alloc`).
//!
//! Key constraints:
//! - Streaming path allocation-free per reading
//! - One bad reading never stops a stream
//! - Every statistic that can be undefined says so (`Option` / typed error)
//!
//! ```rust
//! use grainguard_core::{RawSample, StreamingCleaner};
//!
//! let mut cleaner: StreamingCleaner = StreamingCleaner::default();
//!
//! match cleaner.process(RawSample::new(412.0, 23.4, 71.2)) {
//!     Ok(clean) => assert_eq!(clean.co2, 412.0), // warm-up: passed raw
//!     Err(e) => panic!("rejected: {}", e),
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod buffer;
pub mod constants;
pub mod errors;
pub mod filter;
pub mod parse;
pub mod reading;
pub mod stats;
pub mod time;
pub mod traits;
pub mod validators;
pub mod window;

// Public API
pub use errors::{SignalError, SignalResult};
pub use filter::{BatchHampel, BoundaryPolicy, HampelConfig, StreamingCleaner, StreamingHampel};
pub use parse::parse_sample_line;
pub use reading::{Channel, CleanSample, RawSample, Reading};
pub use time::Timestamp;
pub use traits::{OutlierFilter, ReadingSource};
pub use validators::ReadingValidator;
pub use window::{RateSummary, Window, WindowAggregator, WindowPolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
