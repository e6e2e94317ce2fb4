//! # Camera Steering Library
//!
//! This library provides the backend-agnostic half of a camera driven
//! steering pipeline: the ternary [`Direction`](direction::Direction)
//! signal, the [`DirectionDetector`](detector::DirectionDetector) capability
//! implemented by the concrete strategies, and the field/mask geometry the
//! strategies classify over.
//!
//! The easiest way to use the library is to import its prelude:
//!
//! ```
//! use camsteer::prelude::v1::*;
//! ```
//!
//! You may need [`nalgebra`](https://crates.io/crates/nalgebra) to make use of the functionality.

pub mod detector;
pub mod direction;
pub mod error;
pub mod flow_field;
pub mod mask;

pub mod prelude {
    pub mod v1 {
        pub use crate::{
            detector::DirectionDetector,
            direction::Direction,
            error::{Error, Result},
            flow_field::FlowField,
            mask::{Contour, Mask, Moments},
        };
        pub use anyhow::anyhow;
    }
}
