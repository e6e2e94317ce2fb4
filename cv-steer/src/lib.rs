//! OpenCV camera steering detection
//!
//! Two alternate strategies over the shared
//! [`DirectionDetector`](camsteer::detector::DirectionDetector) contract:
//! whole-frame dense optical flow, and HSV colour segmentation. Both pull
//! frames from an exclusively-owned camera device and yield one ternary
//! direction per tick.

use camsteer::prelude::v1::*;

pub mod capture;
pub mod display;
pub mod flow;
pub mod preprocess;
pub mod segment;

pub use capture::CameraSource;
pub use flow::{FlowDetector, FlowEstimator, FlowParams};
pub use segment::{SegmentDetector, SegmentEstimator, SegmentParams};

/// Detection strategy selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Whole-frame dense optical-flow census.
    Flow,
    /// HSV colour-segmentation centroid tracking.
    Segment,
}

impl std::str::FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "flow" => Ok(Strategy::Flow),
            "segment" => Ok(Strategy::Segment),
            _ => Err(anyhow!("unknown strategy {} (expected flow|segment)", s)),
        }
    }
}

/// Create a detector for the given strategy.
///
/// # Arguments
///
/// * `strategy` - which estimation strategy to run.
/// * `device` - camera device index.
/// * `display` - whether to show the live debug windows.
pub fn create_detector(
    strategy: Strategy,
    device: i32,
    display: bool,
) -> Result<Box<dyn DirectionDetector>> {
    Ok(match strategy {
        Strategy::Flow => Box::new(FlowDetector::new(device, display)?),
        Strategy::Segment => Box::new(SegmentDetector::new(device, display)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parsing() {
        assert_eq!("flow".parse::<Strategy>().unwrap(), Strategy::Flow);
        assert_eq!("segment".parse::<Strategy>().unwrap(), Strategy::Segment);
        assert!("farneback".parse::<Strategy>().is_err());
    }
}
