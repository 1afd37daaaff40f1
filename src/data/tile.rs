use std::f64::consts::PI;
use std::fmt;

use crate::errors::{Error, Result};

/// Highest zoom a requested tile may have.
pub const MAX_ZOOM: u32 = 30;

/// Slippy-map tile address. `y` grows southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub zoom: u32,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(zoom: u32, x: u32, y: u32) -> Result<Self> {
        if zoom > MAX_ZOOM {
            return Err(Error::usage(format!("zoom {} is above {}", zoom, MAX_ZOOM)));
        }
        let side = 1u64 << zoom;
        if u64::from(x) >= side || u64::from(y) >= side {
            return Err(Error::usage(format!(
                "tile {}/{}/{} is outside the {}x{} grid", zoom, x, y, side, side
            )));
        }
        Ok(TileCoord { zoom, x, y })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

/// Axis-aligned box in geographic degrees, used only for inclusion tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub sw: Location,
    pub ne: Location,
}

/// Coarse envelope overlap test against an interleaved `[lon, lat, ...]` sequence.
/// Touching edges count as inside. An empty sequence is never inside.
pub fn is_inside(bbox: &BBox, lonlats: &[f64]) -> bool {
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;

    for pair in lonlats.chunks(2) {
        min_lon = min_lon.min(pair[0]);
        max_lon = max_lon.max(pair[0]);
        if let Some(&lat) = pair.get(1) {
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
        }
    }

    if max_lon < bbox.sw.lon || bbox.ne.lon < min_lon {
        false
    } else {
        !(max_lat < bbox.sw.lat || bbox.ne.lat < min_lat)
    }
}

/// Maps display tiles onto the data provider's fixed-zoom tiles and onto
/// their geographic extent (spherical Web Mercator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMapper {
    pub data_zoom: u32,
}

impl TileMapper {
    pub fn new(data_zoom: u32) -> Self {
        TileMapper { data_zoom }
    }

    /// The data tile containing `tile`: the tile itself rescaled to the data
    /// zoom and floored.
    pub fn data_tile(&self, tile: &TileCoord) -> TileCoord {
        let (x, y) = if self.data_zoom >= tile.zoom {
            let shift = self.data_zoom - tile.zoom;
            (tile.x << shift, tile.y << shift)
        } else {
            let shift = tile.zoom - self.data_zoom;
            (tile.x >> shift, tile.y >> shift)
        };
        TileCoord {
            zoom: self.data_zoom,
            x,
            y,
        }
    }

    pub fn bbox(&self, tile: &TileCoord) -> BBox {
        BBox {
            sw: Self::location(tile.zoom, f64::from(tile.x), f64::from(tile.y) + 1.0),
            ne: Self::location(tile.zoom, f64::from(tile.x) + 1.0, f64::from(tile.y)),
        }
    }

    /// Geographic location of a (fractional) tile grid corner.
    fn location(zoom: u32, column: f64, row: f64) -> Location {
        let n = 2f64.powi(zoom as i32);
        let lon = column / n * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * row / n)).sinh().atan().to_degrees();
        Location { lon, lat }
    }
}
