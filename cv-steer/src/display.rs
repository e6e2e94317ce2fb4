//! # Live debug display
//!
//! Optional side channel showing the mirrored camera frame, the flow
//! field and the segmentation mask. Presentation only - not part of the
//! detection contract - and closed best-effort on release.

use camsteer::prelude::v1::*;
use opencv::core::{self, no_array, Point, Scalar, NORM_MINMAX};
use opencv::highgui;
use opencv::imgproc;
use opencv::prelude::*;
use opencv::types::{VectorOfMat, VectorOfPoint, VectorOfVectorOfPoint};

const CAMERA_WINDOW: &str = "Camera";
const FLOW_WINDOW: &str = "Flow";
const MASK_WINDOW: &str = "Mask";

/// Debug window set for one detector.
#[derive(Default)]
pub struct DebugDisplay {
    closed: bool,
}

impl DebugDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the mirrored camera frame.
    pub fn show_camera(&self, frame: &Mat) -> Result<()> {
        highgui::imshow(CAMERA_WINDOW, frame).map_err(Error::backend)
    }

    /// Show the flow field, hue encoding the flow angle and value the
    /// min-max normalised magnitude.
    pub fn show_flow(&self, flow: &Mat) -> Result<()> {
        highgui::imshow(FLOW_WINDOW, &render_flow(flow)?).map_err(Error::backend)
    }

    /// Show the segmentation mask with the dominant contour outlined and
    /// its centroid marked.
    pub fn show_mask(&self, mask: &Mat, dominant: Option<&Contour>) -> Result<()> {
        let mut canvas = Mat::default();
        imgproc::cvt_color(mask, &mut canvas, imgproc::COLOR_GRAY2BGR, 0)
            .map_err(Error::backend)?;

        if let Some(contour) = dominant {
            let mut outline = VectorOfVectorOfPoint::new();
            outline.push(
                contour
                    .points()
                    .iter()
                    .map(|p| Point::new(p.x as i32, p.y as i32))
                    .collect::<VectorOfPoint>(),
            );
            imgproc::polylines(
                &mut canvas,
                &outline,
                true,
                Scalar::new(30.0, 255.0, 255.0, 0.0),
                1,
                imgproc::LINE_8,
                0,
            )
            .map_err(Error::backend)?;

            if let Some(centroid) = contour.centroid() {
                imgproc::circle(
                    &mut canvas,
                    Point::new(centroid.x as i32, centroid.y as i32),
                    3,
                    Scalar::new(0.0, 0.0, 255.0, 0.0),
                    -1,
                    imgproc::LINE_8,
                    0,
                )
                .map_err(Error::backend)?;
            }
        }

        highgui::imshow(MASK_WINDOW, &canvas).map_err(Error::backend)
    }

    /// Close all windows. Best-effort; failures are ignored.
    pub fn close(&mut self) {
        if !self.closed {
            for name in [CAMERA_WINDOW, FLOW_WINDOW, MASK_WINDOW] {
                let _ = highgui::destroy_window(name);
            }
            self.closed = true;
        }
    }
}

impl Drop for DebugDisplay {
    fn drop(&mut self) {
        self.close();
    }
}

/// Render a CV_32FC2 flow into a BGR visualisation.
fn render_flow(flow: &Mat) -> Result<Mat> {
    let mut planes = VectorOfMat::new();
    planes.push(Mat::default());
    planes.push(Mat::default());
    core::split(flow, &mut planes).map_err(Error::backend)?;

    let mut magnitude = Mat::default();
    let mut angle = Mat::default();
    core::cart_to_polar(
        &planes.get(0).map_err(Error::backend)?,
        &planes.get(1).map_err(Error::backend)?,
        &mut magnitude,
        &mut angle,
        true,
    )
    .map_err(Error::backend)?;

    let mut value = Mat::default();
    core::normalize(
        &magnitude,
        &mut value,
        0.0,
        1.0,
        NORM_MINMAX,
        -1,
        &no_array(),
    )
    .map_err(Error::backend)?;

    let sz = angle.size().map_err(Error::backend)?;
    let typ = angle.typ();
    let saturation = Mat::ones_size(sz, typ)
        .map_err(Error::backend)?
        .to_mat()
        .map_err(Error::backend)?;

    let mut hsv_planes = VectorOfMat::new();
    hsv_planes.push(angle); // already in degrees, which float HSV expects
    hsv_planes.push(saturation);
    hsv_planes.push(value);

    let mut hsv = Mat::default();
    core::merge(&hsv_planes, &mut hsv).map_err(Error::backend)?;

    let mut bgr = Mat::default();
    imgproc::cvt_color(&hsv, &mut bgr, imgproc::COLOR_HSV2BGR, 0).map_err(Error::backend)?;

    Ok(bgr)
}
