//! Core traits
//!
//! Two seams: the outlier filter contract shared by the batch and streaming
//! Hampel filters, and the pull-based source of raw samples that drives the
//! streaming path.

/// Outlier rejection contract: take a value or a series, return it cleaned
///
/// The batch and streaming Hampel filters implement this with different
/// causality assumptions (centered window with a global MAD versus trailing
/// window with a local MAD). They do not produce identical output on the same
/// data and are not interchangeable.
pub trait OutlierFilter<In> {
    /// Cleaned output for one input
    type Output;

    /// Clean one input
    ///
    /// Streaming implementations update their history, hence `&mut self`.
    fn clean(&mut self, input: In) -> Self::Output;
}

/// Pull-based source of raw sensor samples
///
/// Follows the `nb` model: `WouldBlock` means no sample is available yet and
/// is the only point where a streaming consumer waits. The source owns the
/// transport (serial port, socket, replay file); the filter never does.
///
/// ```rust
/// use grainguard_core::{RawSample, ReadingSource};
///
/// struct Replay(Vec<RawSample>);
///
/// impl ReadingSource for Replay {
///     type Error = ();
///
///     fn poll_sample(&mut self) -> nb::Result<RawSample, Self::Error> {
///         if self.0.is_empty() {
///             return Err(nb::Error::WouldBlock);
///         }
///         Ok(self.0.remove(0))
///     }
/// }
/// ```
pub trait ReadingSource {
    /// Transport-level error
    type Error;

    /// Attempt to pull the next raw sample
    ///
    /// - `Ok(sample)` - next sample available
    /// - `Err(nb::Error::WouldBlock)` - nothing yet, try again later
    /// - `Err(nb::Error::Other(e))` - transport or format failure for one
    ///   sample; the source may still be usable
    fn poll_sample(&mut self) -> nb::Result<crate::reading::RawSample, Self::Error>;
}
