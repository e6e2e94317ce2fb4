//! # Camera frame source

use camsteer::prelude::v1::*;
use log::*;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

/// Owns the camera device handle and produces raw BGR frames on demand.
///
/// The device is exclusively owned by this source for its activation
/// lifetime. Mirroring and all further preprocessing happen downstream.
pub struct CameraSource {
    capture: VideoCapture,
    device: i32,
}

impl CameraSource {
    /// Create an unopened source for a device index.
    pub fn new(device: i32) -> Result<Self> {
        Ok(Self {
            capture: VideoCapture::default().map_err(Error::backend)?,
            device,
        })
    }

    /// Open the camera device. Idempotent when already active.
    pub fn activate(&mut self) -> Result<()> {
        if self.is_active() {
            return Ok(());
        }

        let opened = self
            .capture
            .open(self.device, videoio::CAP_ANY)
            .map_err(Error::device_unavailable)?;

        if !opened {
            return Err(Error::device_unavailable(anyhow!(
                "no camera at device index {}",
                self.device
            )));
        }

        info!("opened camera device {}", self.device);

        Ok(())
    }

    /// Whether the device handle is currently open.
    pub fn is_active(&self) -> bool {
        self.capture.is_opened().unwrap_or(false)
    }

    /// Block until the next frame is available.
    pub fn capture(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();

        let got = self
            .capture
            .read(&mut frame)
            .map_err(Error::capture_failed)?;

        if !got || frame.rows() == 0 {
            return Err(Error::capture_failed(anyhow!("device yielded no frame")));
        }

        Ok(frame)
    }

    /// Release the device handle.
    ///
    /// Safe to call repeatedly, or without a prior
    /// [`activate`](Self::activate).
    pub fn release(&mut self) {
        if self.is_active() {
            match self.capture.release() {
                Ok(()) => info!("released camera device {}", self.device),
                Err(err) => warn!("failed to release camera: {}", err),
            }
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.release();
    }
}
