//! # Optical-flow direction estimation
//!
//! Whole-frame dense-flow aggregation: any leftward or rightward body
//! motion registers, regardless of lighting or shape, at the cost of
//! needing a frame-to-frame baseline and being sensitive to camera shake.

use camsteer::prelude::v1::*;
use log::*;
use nalgebra as na;
use opencv::core::Point2f;
use opencv::prelude::*;
use opencv::video;

use crate::capture::CameraSource;
use crate::display::DebugDisplay;
use crate::preprocess;

/// Farneback tuning knobs.
///
/// These are tuning values, not contract. Whatever they are set to, the
/// estimate produces a full-resolution flow field matching the frame
/// dimensions.
#[derive(Clone, Copy, Debug)]
pub struct FlowParams {
    pub pyr_scale: f64,
    pub levels: i32,
    pub winsize: i32,
    pub iterations: i32,
    pub poly_n: i32,
    pub poly_sigma: f64,
    /// Horizontal displacement (pixels) a pixel must exceed to vote.
    pub threshold: f32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            pyr_scale: 0.5,
            levels: 1,
            winsize: 15,
            iterations: 1,
            poly_n: 5,
            poly_sigma: 1.2,
            threshold: 2.0,
        }
    }
}

/// Stateful dense-flow estimator.
///
/// Retains the previous blurred-grayscale frame as the baseline each
/// estimate is computed against. The baseline is created by
/// [`prime`](Self::prime), advanced on every estimate and dropped on
/// [`reset`](Self::reset).
pub struct FlowEstimator {
    previous: Option<Mat>,
    flow: Mat,
    params: FlowParams,
}

impl Default for FlowEstimator {
    fn default() -> Self {
        Self::new(FlowParams::default())
    }
}

impl FlowEstimator {
    pub fn new(params: FlowParams) -> Self {
        Self {
            previous: None,
            flow: Default::default(),
            params,
        }
    }

    /// Set the baseline from a mirrored frame.
    ///
    /// Must be called once before the first [`estimate`](Self::estimate).
    pub fn prime(&mut self, frame: &Mat) -> Result<()> {
        self.previous = Some(preprocess::blurred_gray(frame)?);
        Ok(())
    }

    /// Whether a baseline exists.
    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }

    /// Drop the baseline.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// The retained baseline frame.
    pub fn baseline(&self) -> Option<&Mat> {
        self.previous.as_ref()
    }

    /// Most recent dense flow estimate, for visualisation.
    pub fn flow(&self) -> &Mat {
        &self.flow
    }

    /// Estimate net horizontal motion between the baseline and `frame`.
    ///
    /// The baseline advances to `frame` on every call, tied census
    /// included, so consecutive calls always compare adjacent frames
    /// rather than frame N against the first one.
    pub fn estimate(&mut self, frame: &Mat) -> Result<Direction> {
        let previous = self.previous.as_ref().ok_or(Error::NotPrimed)?;
        let current = preprocess::blurred_gray(frame)?;

        video::calc_optical_flow_farneback(
            previous,
            &current,
            &mut self.flow,
            self.params.pyr_scale,
            self.params.levels,
            self.params.winsize,
            self.params.iterations,
            self.params.poly_n,
            self.params.poly_sigma,
            0,
        )
        .map_err(Error::backend)?;

        let mut field = FlowField::new(self.flow.cols() as usize, self.flow.rows() as usize);

        for y in 0..self.flow.rows() {
            for x in 0..self.flow.cols() {
                let dir: &Point2f = self.flow.at_2d(y, x).map_err(Error::backend)?;
                field.set_flow(x as usize, y as usize, na::Vector2::new(dir.x, dir.y));
            }
        }

        self.previous = Some(current);

        let (left, right) = field.horizontal_counts(self.params.threshold);
        trace!("flow census: left={} right={}", left, right);

        Ok(Direction::from_counts(left, right))
    }
}

/// Camera-backed optical-flow direction detector.
pub struct FlowDetector {
    source: CameraSource,
    estimator: FlowEstimator,
    display: Option<DebugDisplay>,
}

impl FlowDetector {
    pub fn new(device: i32, display: bool) -> Result<Self> {
        Ok(Self {
            source: CameraSource::new(device)?,
            estimator: FlowEstimator::default(),
            display: display.then(DebugDisplay::new),
        })
    }

    pub fn with_params(mut self, params: FlowParams) -> Self {
        self.estimator = FlowEstimator::new(params);
        self
    }
}

impl DirectionDetector for FlowDetector {
    fn activate(&mut self) -> Result<()> {
        self.source.activate()?;

        if !self.estimator.is_primed() {
            let frame = self.source.capture()?;
            self.estimator.prime(&preprocess::mirror(&frame)?)?;
        }

        Ok(())
    }

    fn direction(&mut self) -> Result<Direction> {
        let frame = self.source.capture()?;
        let mirrored = preprocess::mirror(&frame)?;
        let direction = self.estimator.estimate(&mirrored)?;

        if let Some(display) = &self.display {
            if let Err(err) = display
                .show_camera(&mirrored)
                .and_then(|_| display.show_flow(self.estimator.flow()))
            {
                warn!("debug display failed: {}", err);
            }
        }

        Ok(direction)
    }

    fn release(&mut self) {
        self.estimator.reset();
        self.source.release();
        if let Some(display) = &mut self.display {
            display.close();
        }
    }
}
