//! # Steering direction signal

/// Ternary horizontal steering signal.
///
/// Exactly one value is produced per detector invocation. Undecidable
/// inputs (tied motion counts, no tracked object) resolve to
/// [`Direction::Middle`] rather than an error or an absent value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Left,
    Middle,
    Right,
}

impl Direction {
    /// Classify by comparing per-side census counts.
    ///
    /// Returns `Left`/`Right` for the strictly larger side, and `Middle`
    /// on a tie (which covers the no-motion case of two zero counts).
    ///
    /// # Arguments
    ///
    /// * `left` - number of samples voting for leftward motion.
    /// * `right` - number of samples voting for rightward motion.
    pub fn from_counts(left: usize, right: usize) -> Self {
        match left.cmp(&right) {
            std::cmp::Ordering::Greater => Direction::Left,
            std::cmp::Ordering::Less => Direction::Right,
            std::cmp::Ordering::Equal => Direction::Middle,
        }
    }

    /// Classify a horizontal offset from a reference point.
    ///
    /// Offsets within the symmetric dead-zone (boundary inclusive) stay
    /// `Middle`, preventing output oscillation when the tracked object
    /// sits near the reference.
    ///
    /// # Arguments
    ///
    /// * `offset` - signed distance from the reference (positive = right).
    /// * `dead_zone` - half-width of the neutral band around the reference.
    pub fn from_offset(offset: f32, dead_zone: f32) -> Self {
        if offset > dead_zone {
            Direction::Right
        } else if offset < -dead_zone {
            Direction::Left
        } else {
            Direction::Middle
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Left => "LEFT",
            Direction::Middle => "MIDDLE",
            Direction::Right => "RIGHT",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_ordering() {
        assert_eq!(Direction::from_counts(10, 3), Direction::Left);
        assert_eq!(Direction::from_counts(3, 10), Direction::Right);
        assert_eq!(Direction::from_counts(7, 7), Direction::Middle);
        assert_eq!(Direction::from_counts(0, 0), Direction::Middle);
    }

    #[test]
    fn offset_dead_zone() {
        assert_eq!(Direction::from_offset(25.0, 20.0), Direction::Right);
        assert_eq!(Direction::from_offset(-25.0, 20.0), Direction::Left);
        assert_eq!(Direction::from_offset(10.0, 20.0), Direction::Middle);
        assert_eq!(Direction::from_offset(-10.0, 20.0), Direction::Middle);
        // The boundary itself stays neutral.
        assert_eq!(Direction::from_offset(20.0, 20.0), Direction::Middle);
        assert_eq!(Direction::from_offset(-20.0, 20.0), Direction::Middle);
    }
}
