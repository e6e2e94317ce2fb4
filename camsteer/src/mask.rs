//! # Binary mask segmentation
//!
//! Connected-region discovery over a boolean pixel grid, with external
//! boundary tracing and pixel-mass moments. This is the appearance-based
//! half of the pipeline: a thresholded mask comes in, the dominant blob's
//! centroid comes out.

use nalgebra as na;

/// Neighbour offsets in clockwise order, starting west.
///
/// Image coordinates: x grows right, y grows down.
const NEIGHBORS: [(i64, i64); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Binary pixel mask.
///
/// Marks the pixels satisfying a threshold predicate. Ephemeral - rebuilt
/// from the thresholded frame every tick.
pub struct Mask {
    data: Vec<bool>,
    width: usize,
}

/// Raw pixel-mass moments of a connected region.
///
/// `m00` is the region area in pixels, `m10`/`m01` the coordinate sums
/// used to derive the centroid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Centroid of the region, or `None` for zero pixel mass.
    pub fn centroid(&self) -> Option<na::Point2<f32>> {
        if self.m00 == 0.0 {
            None
        } else {
            Some(na::Point2::new(
                (self.m10 / self.m00) as f32,
                (self.m01 / self.m00) as f32,
            ))
        }
    }
}

/// External boundary of one connected mask region.
///
/// Points are the full-resolution boundary sequence in clockwise tracing
/// order, starting from the region's first pixel in row-major scan order.
/// No simplification is applied.
#[derive(Clone, Debug)]
pub struct Contour {
    points: Vec<na::Point2<usize>>,
    moments: Moments,
}

impl Contour {
    /// Boundary points in tracing order.
    pub fn points(&self) -> &[na::Point2<usize>] {
        &self.points
    }

    /// Enclosed pixel mass.
    pub fn area(&self) -> f64 {
        self.moments.m00
    }

    /// Raw moments of the enclosed region.
    pub fn moments(&self) -> Moments {
        self.moments
    }

    /// Centroid of the enclosed region, `None` for zero pixel mass.
    pub fn centroid(&self) -> Option<na::Point2<f32>> {
        self.moments.centroid()
    }
}

impl Mask {
    /// Create a cleared mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![false; width * height],
            width,
        }
    }

    /// Get width and height of the mask.
    pub fn dim(&self) -> (usize, usize) {
        if self.width == 0 {
            (0, 0)
        } else {
            (self.width, self.data.len() / self.width)
        }
    }

    /// Get the value at coordinates.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    /// Set the value at coordinates.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.data[y * self.width + x] = value;
    }

    /// Count of set pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    fn is_set(&self, (x, y): (i64, i64)) -> bool {
        let (width, height) = self.dim();
        x >= 0
            && y >= 0
            && x < width as i64
            && y < height as i64
            && self.data[y as usize * self.width + x as usize]
    }

    /// Extract the external contour of every connected region.
    ///
    /// Regions are 8-connected and reported in row-major discovery order.
    /// Only outer boundaries are traced; holes inside a region are not.
    pub fn contours(&self) -> Vec<Contour> {
        let (width, height) = self.dim();
        let mut visited = vec![false; self.data.len()];
        let mut contours = vec![];

        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                if !self.data[idx] || visited[idx] {
                    continue;
                }

                // Flood fill the region, accumulating raw moments.
                let mut moments = Moments::default();
                let mut to_fill = vec![(x, y); 1];
                visited[idx] = true;

                while let Some((x, y)) = to_fill.pop() {
                    moments.m00 += 1.0;
                    moments.m10 += x as f64;
                    moments.m01 += y as f64;

                    let neighbor_offs = NEIGHBORS
                        .iter()
                        .map(|&(ox, oy)| (x as i64 + ox, y as i64 + oy));

                    for (x, y) in neighbor_offs
                        .filter(|&(x, y)| {
                            (0..width as i64).contains(&x) && (0..height as i64).contains(&y)
                        })
                        .map(|(x, y)| (x as usize, y as usize))
                    {
                        let idx = y * width + x;
                        if self.data[idx] && !visited[idx] {
                            visited[idx] = true;
                            to_fill.push((x, y));
                        }
                    }
                }

                contours.push(Contour {
                    points: self.trace_boundary((x as i64, y as i64)),
                    moments,
                });
            }
        }

        contours
    }

    /// Select the contour with maximum enclosed area.
    ///
    /// Returns `None` when the mask has no regions, or when every region
    /// has zero area. Ties keep the earlier discovery.
    pub fn dominant_contour(&self) -> Option<Contour> {
        let mut best: Option<Contour> = None;
        for contour in self.contours() {
            if contour.area() <= 0.0 {
                continue;
            }
            match &best {
                Some(b) if contour.area() <= b.area() => {}
                _ => best = Some(contour),
            }
        }
        best
    }

    /// Moore-neighbour boundary tracing from a region's start pixel.
    ///
    /// `start` must be the region's first pixel in row-major scan order,
    /// so its west neighbour is background. Terminates on re-entering the
    /// start state (Jacob's criterion), or immediately for an isolated
    /// pixel.
    fn trace_boundary(&self, start: (i64, i64)) -> Vec<na::Point2<usize>> {
        let mut boundary = vec![na::Point2::new(start.0 as usize, start.1 as usize)];

        let mut cur = start;
        let mut backtrack = (start.0 - 1, start.1);
        let initial = (cur, backtrack);

        // A closed trace terminates well before this bound.
        let cap = self.data.len() * 8;

        loop {
            let bidx = match NEIGHBORS
                .iter()
                .position(|&(ox, oy)| (cur.0 + ox, cur.1 + oy) == backtrack)
            {
                Some(i) => i,
                None => break,
            };

            let mut moved = false;
            for k in 1..=8 {
                let d = (bidx + k) % 8;
                let cand = (cur.0 + NEIGHBORS[d].0, cur.1 + NEIGHBORS[d].1);
                if self.is_set(cand) {
                    let b = (bidx + k - 1) % 8;
                    backtrack = (cur.0 + NEIGHBORS[b].0, cur.1 + NEIGHBORS[b].1);
                    cur = cand;
                    moved = true;
                    break;
                }
            }

            if !moved || (cur, backtrack) == initial || boundary.len() >= cap {
                break;
            }

            boundary.push(na::Point2::new(cur.0 as usize, cur.1 as usize));
        }

        boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use assert_approx_eq::assert_approx_eq;

    fn disc(width: usize, height: usize, cx: i64, cy: i64, r: i64) -> Mask {
        let mut mask = Mask::new(width, height);
        for y in 0..height as i64 {
            for x in 0..width as i64 {
                if (x - cx) * (x - cx) + (y - cy) * (y - cy) <= r * r {
                    mask.set(x as usize, y as usize, true);
                }
            }
        }
        mask
    }

    fn classify(mask: &Mask, dead_zone: f32) -> Direction {
        let mid = mask.dim().0 as f32 / 2.0;
        mask.dominant_contour()
            .and_then(|c| c.centroid())
            .map(|c| Direction::from_offset(c.x - mid, dead_zone))
            .unwrap_or(Direction::Middle)
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = Mask::new(64, 48);
        assert!(mask.contours().is_empty());
        assert!(mask.dominant_contour().is_none());
        assert_eq!(classify(&mask, 20.0), Direction::Middle);
    }

    #[test]
    fn centered_disc_is_middle() {
        // Radius 13 gives a disc of roughly 500 px.
        let mask = disc(200, 120, 100, 60, 13);
        let contour = mask.dominant_contour().unwrap();
        let centroid = contour.centroid().unwrap();
        assert_approx_eq!(centroid.x, 100.0, 1e-3);
        assert_approx_eq!(centroid.y, 60.0, 1e-3);
        assert_eq!(classify(&mask, 20.0), Direction::Middle);
    }

    #[test]
    fn disc_offsets_against_dead_zone() {
        assert_eq!(classify(&disc(200, 120, 125, 60, 13), 20.0), Direction::Right);
        assert_eq!(classify(&disc(200, 120, 75, 60, 13), 20.0), Direction::Left);
        // 10 px right of the midpoint stays inside the 20 px dead-zone.
        assert_eq!(classify(&disc(200, 120, 110, 60, 13), 20.0), Direction::Middle);
    }

    #[test]
    fn larger_blob_dominates() {
        let mut mask = Mask::new(100, 40);
        for y in 5..10 {
            for x in 5..10 {
                mask.set(x, y, true);
            }
        }
        for y in 10..25 {
            for x in 70..85 {
                mask.set(x, y, true);
            }
        }
        let contour = mask.dominant_contour().unwrap();
        assert_eq!(contour.area(), 225.0);
        let centroid = contour.centroid().unwrap();
        assert_approx_eq!(centroid.x, 77.0, 1e-3);
        assert_approx_eq!(centroid.y, 17.0, 1e-3);
    }

    #[test]
    fn single_pixel_region() {
        let mut mask = Mask::new(10, 10);
        mask.set(4, 7, true);
        let contours = mask.contours();
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points().to_vec(), vec![nalgebra::Point2::new(4, 7)]);
        assert_eq!(contours[0].area(), 1.0);
        assert_eq!(
            contours[0].centroid(),
            Some(nalgebra::Point2::new(4.0, 7.0))
        );
    }

    #[test]
    fn boundary_encloses_square() {
        let mut mask = Mask::new(20, 20);
        for y in 3..8 {
            for x in 3..8 {
                mask.set(x, y, true);
            }
        }
        let contours = mask.contours();
        assert_eq!(contours.len(), 1);
        // A 5x5 square has a 16-pixel perimeter.
        assert_eq!(contours[0].points().len(), 16);
        assert!(contours[0]
            .points()
            .iter()
            .all(|p| (3..8).contains(&p.x) && (3..8).contains(&p.y)));
        assert!(contours[0]
            .points()
            .iter()
            .all(|p| p.x == 3 || p.x == 7 || p.y == 3 || p.y == 7));
    }

    #[test]
    fn zero_mass_centroid_is_none() {
        assert_eq!(Moments::default().centroid(), None);
    }

    #[test]
    fn extraction_is_pure() {
        let mask = disc(80, 80, 30, 40, 9);
        let a = mask.dominant_contour().unwrap();
        let b = mask.dominant_contour().unwrap();
        assert_eq!(a.points(), b.points());
        assert_eq!(a.moments(), b.moments());
    }
}
