//! # Frame preprocessing
//!
//! Pure functions normalizing a raw capture into the form either
//! estimator consumes. Deterministic, no hidden state, testable with
//! synthetic images.

use camsteer::prelude::v1::*;
use opencv::core::{self, BorderTypes, Size};
use opencv::imgproc;
use opencv::prelude::*;

/// Gaussian kernel edge applied before thresholding and flow estimation.
///
/// Both downstream algorithms are sensitive to pixel-level sensor noise;
/// the large kernel smooths it out.
pub const BLUR_KERNEL: i32 = 25;

/// Mirror the frame horizontally.
///
/// Camera and screen face the same way, so the flip makes on-screen
/// motion match the user's physical left/right.
pub fn mirror(frame: &Mat) -> Result<Mat> {
    let mut out = Mat::default();
    core::flip(frame, &mut out, 1).map_err(Error::backend)?;
    Ok(out)
}

fn blurred(frame: &Mat) -> Result<Mat> {
    let mut out = Mat::default();
    imgproc::gaussian_blur(
        frame,
        &mut out,
        Size::new(BLUR_KERNEL, BLUR_KERNEL),
        0.0,
        0.0,
        BorderTypes::BORDER_REPLICATE as _,
    )
    .map_err(Error::backend)?;
    Ok(out)
}

/// Blur and convert to grayscale, for flow estimation.
pub fn blurred_gray(frame: &Mat) -> Result<Mat> {
    let mut gray = Mat::default();
    imgproc::cvt_color(&blurred(frame)?, &mut gray, imgproc::COLOR_BGR2GRAY, 0)
        .map_err(Error::backend)?;
    Ok(gray)
}

/// Blur and convert to HSV, for colour thresholding.
pub fn blurred_hsv(frame: &Mat) -> Result<Mat> {
    let mut hsv = Mat::default();
    imgproc::cvt_color(&blurred(frame)?, &mut hsv, imgproc::COLOR_BGR2HSV, 0)
        .map_err(Error::backend)?;
    Ok(hsv)
}
