//! # Detection error taxonomy

/// Errors surfaced by a detection session.
///
/// Degenerate geometry (empty masks, zero-area contours, tied motion
/// counts) is never an error - those inputs classify to `Middle` locally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The camera device could not be opened. Fatal to the session.
    #[error("camera device unavailable")]
    DeviceUnavailable(#[source] anyhow::Error),

    /// A single frame read failed. Recoverable - skip the tick or retry.
    #[error("frame capture failed")]
    CaptureFailed(#[source] anyhow::Error),

    /// A flow estimate was requested before a baseline frame was primed.
    #[error("flow estimator not primed")]
    NotPrimed,

    /// An underlying image operation failed.
    #[error("backend image operation failed")]
    Backend(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn device_unavailable(err: impl Into<anyhow::Error>) -> Self {
        Error::DeviceUnavailable(err.into())
    }

    pub fn capture_failed(err: impl Into<anyhow::Error>) -> Self {
        Error::CaptureFailed(err.into())
    }

    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Error::Backend(err.into())
    }

    /// Whether the caller should keep the session alive.
    ///
    /// A failed read means one lost tick; everything else terminates the
    /// session (dead device, violated contract, broken backend).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::CaptureFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverability() {
        assert!(Error::capture_failed(anyhow::anyhow!("eof")).is_recoverable());
        assert!(!Error::device_unavailable(anyhow::anyhow!("no device")).is_recoverable());
        assert!(!Error::NotPrimed.is_recoverable());
    }
}
