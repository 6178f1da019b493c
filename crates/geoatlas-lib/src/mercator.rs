//! Web Mercator (EPSG:3857) projection math.
//!
//! Pure conversions between WGS84 coordinates, fractional global pixel
//! coordinates, and slippy-map tile indices. The grid at zoom z is 2^z by
//! 2^z tiles of 256 px. Longitude maps linearly; latitude maps through the
//! inverse Gudermannian, which diverges at the poles, so latitudes are
//! clamped to the Mercator-valid range rather than rejected — callers
//! routinely pass extreme values and the tile adjacent to the pole is the
//! only sensible answer.

use crate::error::{Error, Result};
use crate::geo::{BoundingBox, GeoPoint, TileIndex};

/// Lowest supported zoom level (whole globe in one tile).
pub const MIN_ZOOM: u8 = 0;

/// Highest zoom level supported by the tile services this library targets.
pub const MAX_ZOOM: u8 = 22;

/// Latitude bound of the Web Mercator projection. Beyond this the forward
/// formula has no finite value.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051128779807;

/// Edge length of one tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Number of tiles along one axis at the given zoom level.
pub fn axis_tile_count(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Project a point to fractional global pixel coordinates at the given zoom.
///
/// Latitude is clamped to the Mercator-valid range first. The result spans
/// [0, 2^z * 256) on each axis and keeps the sub-tile offset that
/// [`point_to_tile`] discards.
pub(crate) fn point_to_pixel(point: GeoPoint, zoom: u8) -> (f64, f64) {
    let map_size = (axis_tile_count(zoom) * TILE_SIZE) as f64;
    let latitude = point
        .latitude
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let lat_rad = latitude.to_radians();

    let px = (point.longitude + 180.0) / 360.0 * map_size;
    let py = (1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0 * map_size;

    (px, py)
}

/// Convert a point to the tile index containing it.
///
/// Fails with [`Error::InvalidZoom`] outside [0, 22]. Latitude is clamped to
/// ±[`MAX_MERCATOR_LATITUDE`] (documented lenient behavior); edge values such
/// as longitude 180 map to the last valid index instead of overflowing to
/// 2^z.
pub fn point_to_tile(point: GeoPoint, zoom: u8) -> Result<TileIndex> {
    if zoom > MAX_ZOOM {
        return Err(Error::InvalidZoom { zoom: zoom as i32 });
    }

    let (px, py) = point_to_pixel(point, zoom);
    let max_index = axis_tile_count(zoom) - 1;
    let x = ((px / TILE_SIZE as f64).floor() as i64).clamp(0, max_index as i64) as u32;
    let y = ((py / TILE_SIZE as f64).floor() as i64).clamp(0, max_index as i64) as u32;

    Ok(TileIndex { x, y, z: zoom })
}

/// Exact geographic extent of one tile. Pure and total for any structurally
/// valid [`TileIndex`].
pub fn tile_to_bounds(tile: TileIndex) -> BoundingBox {
    let n = tile.axis_extent() as f64;

    BoundingBox {
        west: tile.x as f64 / n * 360.0 - 180.0,
        east: (tile.x + 1) as f64 / n * 360.0 - 180.0,
        north: tile_row_to_latitude(tile.y as f64, n),
        south: tile_row_to_latitude((tile.y + 1) as f64, n),
    }
}

/// Latitude of a horizontal tile-grid line, via the inverse projection.
fn tile_row_to_latitude(row: f64, n: f64) -> f64 {
    let y = std::f64::consts::PI * (1.0 - 2.0 * row / n);
    y.sinh().atan().to_degrees()
}
