//! Integer to degree coordinate conversion.

use geo::{Point, point};

/// Geographic degrees converted out of a block's integer grid.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lon: f64,
}

impl Coords {
    /// Converts a `(value, granularity)` pair to degrees. Values are stored
    /// at a granularity relative to `Nanodegree`.
    #[inline]
    pub(crate) fn from_scaled(lat: i64, lon: i64, granularity: i32) -> Coords {
        let scaling_factor: f64 = (granularity as f64) * 1e-9f64;

        Coords {
            lat: lat as f64 * scaling_factor,
            lon: lon as f64 * scaling_factor,
        }
    }
}

impl From<Coords> for Point {
    fn from(value: Coords) -> Self {
        point! { x: value.lon, y: value.lat }
    }
}
