//! # Dense optical flow field

use crate::direction::Direction;
use nalgebra::*;

/// Dense per-pixel optical flow field.
///
/// Stores one `(dx, dy)` displacement column per pixel, in row-major
/// order, with the same spatial dimensions as the frame it was estimated
/// from. The field is ephemeral - it is refilled from the flow estimate
/// on every tick and never persisted.
pub struct FlowField {
    vf: Matrix2xX<f32>,
    width: usize,
}

impl FlowField {
    /// Create a zeroed flow field.
    ///
    /// # Arguments
    ///
    /// * `width` - width of the field.
    /// * `height` - height of the field.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            vf: Matrix2xX::repeat(width * height, 0f32),
            width,
        }
    }

    /// Get width and height of the flow field.
    pub fn dim(&self) -> (usize, usize) {
        if self.width == 0 {
            (0, 0)
        } else {
            (self.width, self.vf.ncols() / self.width)
        }
    }

    /// Get size of the flow field.
    ///
    /// This is the same as `width * height`.
    pub fn size(&self) -> usize {
        self.vf.ncols()
    }

    /// Set displacement at given position.
    ///
    /// # Arguments
    ///
    /// * `x` - horizontal coordinate to set at.
    /// * `y` - vertical coordinate to set at.
    /// * `flow` - displacement to set.
    pub fn set_flow(&mut self, x: usize, y: usize, flow: Vector2<f32>) {
        self.vf.set_column(self.width * y + x, &flow);
    }

    /// Get displacement at coordinates.
    pub fn flow_at(&self, x: usize, y: usize) -> Vector2<f32> {
        self.vf.column(self.width * y + x).into()
    }

    /// Iterate every element of the flow field.
    ///
    /// The resulting iterator yields `(x, y, flow)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Vector2<f32>)> + '_ {
        let (width, height) = self.dim();
        (0..height)
            .flat_map(move |y| (0..width).map(move |x| (x, y, self.flow_at(x, y))))
    }

    /// Census of pixels moving horizontally beyond `threshold`.
    ///
    /// Returns `(left, right)` counts: pixels with `dx < -threshold` and
    /// `dx > threshold` respectively. Pixels inside the band vote for
    /// neither side.
    pub fn horizontal_counts(&self, threshold: f32) -> (usize, usize) {
        let mut left = 0;
        let mut right = 0;
        for dx in self.vf.row(0).iter() {
            if *dx < -threshold {
                left += 1;
            } else if *dx > threshold {
                right += 1;
            }
        }
        (left, right)
    }

    /// Classify the net horizontal motion of the whole field.
    ///
    /// Whole-frame aggregation keeps the estimate robust to lighting and
    /// shape variance - any part of the scene moving sideways registers.
    /// A tied census (including an all-zero field) yields `Middle`.
    pub fn dominant_direction(&self, threshold: f32) -> Direction {
        let (left, right) = self.horizontal_counts(threshold);
        Direction::from_counts(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_field_is_middle() {
        let field = FlowField::new(32, 24);
        assert_eq!(field.horizontal_counts(2.0), (0, 0));
        assert_eq!(field.dominant_direction(2.0), Direction::Middle);
    }

    #[test]
    fn tied_census_is_middle() {
        let mut field = FlowField::new(32, 24);
        for x in 0..8 {
            field.set_flow(x, 0, Vector2::new(-5.0, 0.0));
            field.set_flow(x, 1, Vector2::new(5.0, 0.0));
        }
        assert_eq!(field.horizontal_counts(2.0), (8, 8));
        assert_eq!(field.dominant_direction(2.0), Direction::Middle);
    }

    #[test]
    fn leftward_majority() {
        let mut field = FlowField::new(32, 32);
        let mut placed = 0;
        'outer: for y in 0..32 {
            for x in 0..32 {
                if placed == 100 {
                    break 'outer;
                }
                field.set_flow(x, y, Vector2::new(-5.0, 0.0));
                placed += 1;
            }
        }
        for x in 0..10 {
            field.set_flow(x, 20, Vector2::new(5.0, 0.0));
        }
        assert_eq!(field.horizontal_counts(2.0), (100, 10));
        assert_eq!(field.dominant_direction(2.0), Direction::Left);
    }

    #[test]
    fn sub_threshold_motion_does_not_vote() {
        let mut field = FlowField::new(16, 16);
        for (x, y) in (0..16).flat_map(|y| (0..16).map(move |x| (x, y))) {
            field.set_flow(x, y, Vector2::new(1.5, 3.0));
        }
        assert_eq!(field.horizontal_counts(2.0), (0, 0));
        assert_eq!(field.dominant_direction(2.0), Direction::Middle);
    }

    #[test]
    fn vertical_motion_is_ignored() {
        let mut field = FlowField::new(16, 16);
        for x in 0..16 {
            field.set_flow(x, 3, Vector2::new(0.0, 9.0));
        }
        assert_eq!(field.dominant_direction(2.0), Direction::Middle);
    }
}
