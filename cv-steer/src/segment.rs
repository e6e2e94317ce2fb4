//! # Colour-segmentation direction estimation
//!
//! Appearance-based strategy: tracks a specific coloured object (a hand
//! or a marker) instead of generic motion. Stateless per call - two
//! estimates over the same frame always agree.

use camsteer::prelude::v1::*;
use log::*;
use opencv::core::{self, Scalar};
use opencv::prelude::*;

use crate::capture::CameraSource;
use crate::display::DebugDisplay;
use crate::preprocess;

/// Colour band and dead-zone tuning knobs.
#[derive(Clone, Copy, Debug)]
pub struct SegmentParams {
    /// Lower HSV bound of the tracked colour band.
    pub lower: (f64, f64, f64),
    /// Upper HSV bound of the tracked colour band.
    pub upper: (f64, f64, f64),
    /// Half-width (pixels) of the neutral band around the frame midpoint.
    pub dead_zone: f32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            lower: (20.0, 100.0, 100.0),
            upper: (30.0, 255.0, 255.0),
            dead_zone: 20.0,
        }
    }
}

/// One frame's segmentation outcome.
pub struct Segmentation {
    pub direction: Direction,
    /// Binary mask as produced by the range threshold.
    pub mask: Mat,
    /// Dominant contour, when any region with nonzero area exists.
    pub dominant: Option<Contour>,
}

/// Stateless colour-segmentation estimator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentEstimator {
    params: SegmentParams,
}

impl SegmentEstimator {
    pub fn new(params: SegmentParams) -> Self {
        Self { params }
    }

    /// Classify one mirrored frame. No cross-call state.
    pub fn estimate(&self, frame: &Mat) -> Result<Direction> {
        self.segment(frame).map(|s| s.direction)
    }

    /// Full segmentation of one mirrored frame, including the mask and
    /// the dominant contour for display purposes.
    pub fn segment(&self, frame: &Mat) -> Result<Segmentation> {
        let hsv = preprocess::blurred_hsv(frame)?;

        let (lo, hi) = (self.params.lower, self.params.upper);
        let mut thresholded = Mat::default();
        core::in_range(
            &hsv,
            &Scalar::new(lo.0, lo.1, lo.2, 0.0),
            &Scalar::new(hi.0, hi.1, hi.2, 0.0),
            &mut thresholded,
        )
        .map_err(Error::backend)?;

        let mask = mask_from_mat(&thresholded)?;
        let dominant = mask.dominant_contour();

        // An empty mask, or one with only zero-mass regions, is an
        // expected steady state: the tracked object simply is not in
        // view. It resolves to the neutral signal, never an error.
        let direction = match dominant.as_ref().and_then(|c| c.centroid()) {
            Some(centroid) => {
                let mid = frame.cols() as f32 / 2.0;
                trace!("dominant centroid at x={} (mid {})", centroid.x, mid);
                Direction::from_offset(centroid.x - mid, self.params.dead_zone)
            }
            None => Direction::Middle,
        };

        Ok(Segmentation {
            direction,
            mask: thresholded,
            dominant,
        })
    }
}

/// Convert a CV_8UC1 threshold output into a mask grid.
fn mask_from_mat(mat: &Mat) -> Result<Mask> {
    let mut mask = Mask::new(mat.cols() as usize, mat.rows() as usize);

    for y in 0..mat.rows() {
        for x in 0..mat.cols() {
            if *mat.at_2d::<u8>(y, x).map_err(Error::backend)? > 0 {
                mask.set(x as usize, y as usize, true);
            }
        }
    }

    Ok(mask)
}

/// Camera-backed colour-segmentation direction detector.
pub struct SegmentDetector {
    source: CameraSource,
    estimator: SegmentEstimator,
    display: Option<DebugDisplay>,
}

impl SegmentDetector {
    pub fn new(device: i32, display: bool) -> Result<Self> {
        Ok(Self {
            source: CameraSource::new(device)?,
            estimator: SegmentEstimator::default(),
            display: display.then(DebugDisplay::new),
        })
    }

    pub fn with_params(mut self, params: SegmentParams) -> Self {
        self.estimator = SegmentEstimator::new(params);
        self
    }
}

impl DirectionDetector for SegmentDetector {
    fn activate(&mut self) -> Result<()> {
        self.source.activate()
    }

    fn direction(&mut self) -> Result<Direction> {
        let frame = self.source.capture()?;
        let mirrored = preprocess::mirror(&frame)?;

        if let Some(display) = &self.display {
            let segmentation = self.estimator.segment(&mirrored)?;
            if let Err(err) = display.show_camera(&mirrored).and_then(|_| {
                display.show_mask(&segmentation.mask, segmentation.dominant.as_ref())
            }) {
                warn!("debug display failed: {}", err);
            }
            Ok(segmentation.direction)
        } else {
            self.estimator.estimate(&mirrored)
        }
    }

    fn release(&mut self) {
        self.source.release();
        if let Some(display) = &mut self.display {
            display.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Rect, CV_8UC3};
    use opencv::imgproc;

    // BGR (43, 174, 200) sits around hue 25, well inside the tracked
    // 20-30 band, with saturation and value near 200.
    const IN_BAND: (f64, f64, f64) = (43.0, 174.0, 200.0);

    fn solid(color: (f64, f64, f64)) -> Mat {
        Mat::new_rows_cols_with_default(
            100,
            200,
            CV_8UC3,
            Scalar::new(color.0, color.1, color.2, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn black_frame_is_middle() {
        let estimator = SegmentEstimator::default();
        let frame = solid((0.0, 0.0, 0.0));
        assert_eq!(estimator.estimate(&frame).unwrap(), Direction::Middle);
    }

    #[test]
    fn full_frame_band_centers_to_middle() {
        let estimator = SegmentEstimator::default();
        let frame = solid(IN_BAND);
        assert_eq!(estimator.estimate(&frame).unwrap(), Direction::Middle);
    }

    #[test]
    fn estimate_is_idempotent() {
        let estimator = SegmentEstimator::default();
        let frame = solid(IN_BAND);
        let first = estimator.estimate(&frame).unwrap();
        let second = estimator.estimate(&frame).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn block_left_of_center_steers_left() {
        let estimator = SegmentEstimator::default();
        let mut frame = solid((0.0, 0.0, 0.0));
        imgproc::rectangle(
            &mut frame,
            Rect::new(5, 30, 30, 40),
            Scalar::new(IN_BAND.0, IN_BAND.1, IN_BAND.2, 0.0),
            -1,
            imgproc::LINE_8,
            0,
        )
        .unwrap();
        assert_eq!(estimator.estimate(&frame).unwrap(), Direction::Left);
    }

    #[test]
    fn block_right_of_center_steers_right() {
        let estimator = SegmentEstimator::default();
        let mut frame = solid((0.0, 0.0, 0.0));
        imgproc::rectangle(
            &mut frame,
            Rect::new(165, 30, 30, 40),
            Scalar::new(IN_BAND.0, IN_BAND.1, IN_BAND.2, 0.0),
            -1,
            imgproc::LINE_8,
            0,
        )
        .unwrap();
        assert_eq!(estimator.estimate(&frame).unwrap(), Direction::Right);
    }
}
