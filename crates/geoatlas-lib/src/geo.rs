//! Geographic value types shared across the library.
//!
//! All types here are immutable values: construct, validate once, pass by
//! copy. Coordinates are WGS84 decimal degrees; tile indices follow the
//! slippy-map convention of a 2^z by 2^z grid per zoom level.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mercator::MAX_ZOOM;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Construct a point, rejecting coordinates outside the WGS84 domain.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
            return Err(Error::InvalidLatitude { latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
            return Err(Error::InvalidLongitude { longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A geographic bounding box as the standard (west, south, east, north)
/// quadruple.
///
/// `west > east` is not an error: it marks a box spanning the antimeridian
/// (the ±180° longitude seam) and is resolved by the coverage resolver as
/// two longitude spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Construct a bounding box, rejecting south > north. Longitude order is
    /// deliberately not checked; see the type-level notes on wraparound.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self> {
        if south > north {
            return Err(Error::InvalidBoundingBox { south, north });
        }
        for &latitude in &[south, north] {
            if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
                return Err(Error::InvalidLatitude { latitude });
            }
        }
        for &longitude in &[west, east] {
            if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
                return Err(Error::InvalidLongitude { longitude });
            }
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// True when the box spans the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Geographic centre of the box. For a wrapped box the centre longitude
    /// is computed along the short arc through the antimeridian and
    /// normalised back into [-180, 180].
    pub fn center(&self) -> GeoPoint {
        let latitude = (self.south + self.north) / 2.0;
        let longitude = if self.crosses_antimeridian() {
            let mid = (self.west + self.east + 360.0) / 2.0;
            if mid > 180.0 {
                mid - 360.0
            } else {
                mid
            }
        } else {
            (self.west + self.east) / 2.0
        };
        GeoPoint {
            latitude,
            longitude,
        }
    }
}

/// Index of one square tile in the zoom-z grid of 2^z by 2^z tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileIndex {
    /// Construct a tile index, enforcing the structural invariant
    /// 0 <= x, y < 2^z for z in [0, 22].
    pub fn new(x: u32, y: u32, z: u8) -> Result<Self> {
        if z > MAX_ZOOM {
            return Err(Error::InvalidZoom { zoom: z as i32 });
        }
        let extent = 1u32 << z;
        if x >= extent || y >= extent {
            return Err(Error::InvalidZoom { zoom: z as i32 });
        }
        Ok(Self { x, y, z })
    }

    /// Number of tiles along one axis at this index's zoom level.
    pub fn axis_extent(&self) -> u32 {
        1u32 << self.z
    }
}
