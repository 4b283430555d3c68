//! Fixed-Size Circular Buffer for Per-Channel Filter History
//!
//! ## Overview
//!
//! The streaming Hampel filter needs the last `W` raw values of each channel.
//! This module provides a ring buffer with array storage whose maximum size is
//! fixed at compile time through const generics and whose active capacity `W`
//! is chosen at runtime from the filter configuration.
//!
//! ## Design Rationale
//!
//! - O(1) insertion (overwrites oldest when full)
//! - O(n) iteration in chronological order
//! - Zero heap allocations, also when computing medians (see [`ChannelWindow::copy_to`])
//!
//! The eviction policy is explicit: once `len == capacity`, every push
//! replaces the slot at `write_pos`, which always holds the oldest value.
//!
//! ### Memory Layout
//!
//! ```text
//! ChannelWindow<8> with capacity 5, after 7 pushes (values 0..7):
//! ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! │  5  │  6  │  2  │  3  │  4  │  -  │  -  │  -  │  ← storage (N = 8)
//! └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!                ↑
//!                └── write_pos = 2 (oldest value)
//! Logical view: [2, 3, 4, 5, 6]
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use grainguard_core::buffer::ChannelWindow;
//!
//! let mut history: ChannelWindow<16> = ChannelWindow::new(3).unwrap();
//! history.push(410.0);
//! history.push(415.0);
//! history.push(412.0);
//! let evicted = history.push(418.0);
//!
//! assert_eq!(evicted, Some(410.0));
//! assert_eq!(history.iter().collect::<Vec<_>>(), vec![415.0, 412.0, 418.0]);
//! ```

use crate::constants::filter::DEFAULT_HAMPEL_WINDOW;
use crate::errors::{SignalError, SignalResult};

/// Fixed-capacity ring buffer of raw channel values
///
/// ## Type Parameter
///
/// - `N`: storage size. The runtime capacity must be in `1..=N`.
///
/// ## Internal Invariants
///
/// - `write_pos < capacity`
/// - `len <= capacity <= N`
/// - Iteration yields values oldest first
///
/// ## Thread Safety
///
/// Single writer. The buffer is owned by one streaming filter; callers that
/// share a filter across threads must synchronize externally.
#[derive(Debug, Clone)]
pub struct ChannelWindow<const N: usize> {
    /// Raw values, valid in the first `capacity` slots
    data: [f64; N],

    /// Active window size
    capacity: usize,

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of valid values
    len: usize,
}

impl<const N: usize> ChannelWindow<N> {
    /// Creates an empty window holding at most `capacity` values
    ///
    /// Fails when `capacity` is zero or larger than the storage size `N`.
    pub fn new(capacity: usize) -> SignalResult<Self> {
        if capacity == 0 {
            return Err(SignalError::InvalidConfig { reason: "window capacity must be at least 1" });
        }
        if capacity > N {
            return Err(SignalError::InvalidConfig { reason: "window capacity exceeds buffer storage" });
        }

        Ok(Self {
            data: [0.0; N],
            capacity,
            write_pos: 0,
            len: 0,
        })
    }

    /// Evaluated per instantiation of [`Self::with_default_capacity`]
    const FITS_DEFAULT_WINDOW: () = assert!(
        N >= DEFAULT_HAMPEL_WINDOW,
        "buffer storage is smaller than the default Hampel window"
    );

    /// Window sized for the default Hampel configuration
    ///
    /// Storage smaller than [`DEFAULT_HAMPEL_WINDOW`] is rejected at compile
    /// time; use [`ChannelWindow::new`] for a smaller window.
    pub fn with_default_capacity() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS_DEFAULT_WINDOW;
        Self {
            data: [0.0; N],
            capacity: DEFAULT_HAMPEL_WINDOW,
            write_pos: 0,
            len: 0,
        }
    }

    /// Appends a value, returning the evicted oldest value when full
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.capacity == 0 {
            // Zero-sized storage keeps nothing
            return Some(value);
        }

        let evicted = if self.len == self.capacity {
            Some(self.data[self.write_pos])
        } else {
            self.len += 1;
            None
        };

        self.data[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % self.capacity;
        evicted
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.len
    }

    /// Configured window size
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the warm-up period is over
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Most recent value
    pub fn last(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let idx = if self.write_pos == 0 { self.capacity - 1 } else { self.write_pos - 1 };
        Some(self.data[idx])
    }

    /// Iterate over values from oldest to newest
    pub fn iter(&self) -> ChannelWindowIter<'_, N> {
        ChannelWindowIter { buffer: self, index: 0 }
    }

    /// Copies the values, oldest first, into `out` and returns the filled prefix
    ///
    /// `out` must hold at least `len()` values; the streaming filter passes a
    /// stack array of size `N` so medians need no allocation.
    pub fn copy_to<'o>(&self, out: &'o mut [f64]) -> &'o mut [f64] {
        let n = self.len.min(out.len());
        for (slot, value) in out.iter_mut().zip(self.iter()).take(n) {
            *slot = value;
        }
        &mut out[..n]
    }

    /// Drop all values, keeping the capacity
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Value by logical index (0 = oldest)
    fn get(&self, index: usize) -> Option<f64> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < self.capacity {
            // Not wrapped yet, data starts at 0
            index
        } else {
            // Full: oldest value sits at write_pos
            (self.write_pos + index) % self.capacity
        };

        Some(self.data[actual_index])
    }
}

/// Iterator over channel window contents
pub struct ChannelWindowIter<'a, const N: usize> {
    buffer: &'a ChannelWindow<N>,
    index: usize,
}

impl<'a, const N: usize> Iterator for ChannelWindowIter<'a, N> {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}
