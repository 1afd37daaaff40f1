use indexmap::IndexMap;

use self::sharedstreets::{SharedStreetsGeometry, SharedStreetsIntersection, SharedStreetsReference};

pub mod geojson;
pub mod sharedstreets;
pub mod tile;

/// Records of one display tile, keyed by id. Iteration follows the order in
/// which ids were first seen upstream; a repeated id replaces the earlier
/// record in place.
#[derive(Debug, Default, Clone)]
pub struct TileData {
    pub geometries: IndexMap<String, SharedStreetsGeometry>,
    pub intersections: IndexMap<String, SharedStreetsIntersection>,
    pub references: IndexMap<String, SharedStreetsReference>,
}
