//! # Direction detection capability

use crate::direction::Direction;
use crate::error::Result;

/// Per-tick camera direction detector.
///
/// Implementations are alternate strategies over the same contract (e.g.
/// dense optical flow vs. colour segmentation). Consumers hold a
/// `Box<dyn DirectionDetector>` and drive it from a single polling loop,
/// swapping strategies without branching on type.
pub trait DirectionDetector {
    /// Acquire the underlying frame source and any per-strategy baseline.
    ///
    /// Idempotent when already active. Fails with
    /// [`Error::DeviceUnavailable`](crate::error::Error::DeviceUnavailable)
    /// if no camera can be opened.
    fn activate(&mut self) -> Result<()>;

    /// Pull one frame and classify its motion.
    ///
    /// This is the single blocking call of a tick: it waits for the next
    /// frame, runs the strategy's classification and yields exactly one
    /// [`Direction`]. A failed frame read surfaces as
    /// [`Error::CaptureFailed`](crate::error::Error::CaptureFailed), which
    /// the caller may treat as `Middle` and retry next tick.
    fn direction(&mut self) -> Result<Direction>;

    /// Release the frame source and drop any retained baseline.
    ///
    /// Safe to call at any time, repeatedly, or without a prior
    /// [`activate`](Self::activate). Closing debug display surfaces is a
    /// best-effort side effect.
    fn release(&mut self);
}
