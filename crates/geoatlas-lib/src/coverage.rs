//! Bounding-box to tile-set resolution.
//!
//! Given a WGS84 bounding box and a zoom level, computes the minimal set of
//! tile indices whose union covers the box. Boxes spanning the antimeridian
//! (west > east) split into two longitude spans; there is no vertical
//! wraparound. Output order is row-major (increasing y, then increasing x)
//! and deterministic, so identical inputs always yield identical sequences.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::{BoundingBox, GeoPoint, TileIndex};
use crate::mercator::{axis_tile_count, point_to_tile, MAX_ZOOM};

/// Default cap on the number of tiles a single resolution may produce.
pub const DEFAULT_MAX_COVERAGE_TILES: usize = 100;

/// Resolve the covering tile set for a bounding box using the default cap.
pub fn resolve_coverage(bbox: BoundingBox, zoom: u8) -> Result<Vec<TileIndex>> {
    resolve_coverage_capped(bbox, zoom, DEFAULT_MAX_COVERAGE_TILES)
}

/// Resolve the covering tile set for a bounding box with an explicit cap.
///
/// Fails with [`Error::InvalidBoundingBox`] when south > north and with
/// [`Error::CoverageTooLarge`] when the resolved span would exceed
/// `max_tiles` — the set is never silently truncated; callers must lower
/// the zoom or shrink the box.
pub fn resolve_coverage_capped(
    bbox: BoundingBox,
    zoom: u8,
    max_tiles: usize,
) -> Result<Vec<TileIndex>> {
    if zoom > MAX_ZOOM {
        return Err(Error::InvalidZoom { zoom: zoom as i32 });
    }
    if bbox.south > bbox.north {
        return Err(Error::InvalidBoundingBox {
            south: bbox.south,
            north: bbox.north,
        });
    }

    let north_west = GeoPoint {
        latitude: bbox.north,
        longitude: bbox.west,
    };
    let south_east = GeoPoint {
        latitude: bbox.south,
        longitude: bbox.east,
    };

    let min_corner = point_to_tile(north_west, zoom)?;
    let max_corner = point_to_tile(south_east, zoom)?;

    let last_index = axis_tile_count(zoom) - 1;
    let (min_x, max_x) = (min_corner.x, max_corner.x);
    let (min_y, max_y) = (min_corner.y, max_corner.y);

    // Wraparound shows up either in the raw input (west > east) or after
    // projection when both edges land in the same column ordering.
    let wrapped = bbox.crosses_antimeridian() || min_x > max_x;

    // Column spans in ascending x. Overlapping spans on a wrapped box at a
    // coarse zoom collapse into one full row.
    let spans: Vec<(u32, u32)> = if !wrapped {
        vec![(min_x, max_x)]
    } else if max_x + 1 >= min_x {
        vec![(0, last_index)]
    } else {
        vec![(0, max_x), (min_x, last_index)]
    };

    let width: usize = spans
        .iter()
        .map(|(start, end)| (end - start + 1) as usize)
        .sum();
    let height = (max_y - min_y + 1) as usize;
    let requested = width * height;

    if requested > max_tiles {
        warn!(
            requested,
            max = max_tiles,
            zoom,
            "tile coverage request exceeds cap"
        );
        return Err(Error::CoverageTooLarge {
            requested,
            max: max_tiles,
        });
    }

    let mut tiles = Vec::with_capacity(requested);
    for y in min_y..=max_y {
        for &(start, end) in &spans {
            for x in start..=end {
                tiles.push(TileIndex { x, y, z: zoom });
            }
        }
    }

    debug!(
        tile_count = tiles.len(),
        zoom,
        wrapped,
        "resolved bounding box coverage"
    );

    Ok(tiles)
}
