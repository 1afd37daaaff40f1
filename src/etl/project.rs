use crate::data::geojson::{
    Feature, FeatureCollection, Geometry, IntersectionProperties, LocationReferenceRecord,
    Position, Properties, ReferenceRecord, SegmentProperties, GEOMETRY_ROLE, INTERSECTION_ROLE,
    REFERENCE_ROLE,
};
use crate::data::sharedstreets::{
    SharedStreetsGeometry, SharedStreetsIntersection, SharedStreetsReference,
};
use crate::data::TileData;
use crate::errors::{Error, Result};

const ID_LENGTH: usize = 12;
const COORD_PLACES: usize = 7;

/// First twelve characters of a SharedStreets hash. Collisions are accepted.
pub fn truncate_id(id: &str) -> String {
    match id.char_indices().nth(ID_LENGTH) {
        Some((end, _)) => id[..end].to_string(),
        None => id.to_string(),
    }
}

/// Rounds a longitude or latitude to 7 decimal places.
///
/// Rounds the exact decimal expansion of `value` (ties to even), so a value
/// sitting just below a tie never rounds up through an inexact multiply.
pub fn round_coord(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", COORD_PLACES, value).parse().unwrap_or(value)
}

fn truncate_ids(ids: &[String]) -> Vec<String> {
    ids.iter().map(|id| truncate_id(id)).collect()
}

fn point(lon: f64, lat: f64) -> Position {
    [round_coord(lon), round_coord(lat)]
}

pub fn geometry_feature(geometry: &SharedStreetsGeometry) -> Result<Feature> {
    let lonlats = &geometry.lonlats;
    if lonlats.len() % 2 != 0 || lonlats.len() < 4 {
        return Err(Error::shape(format!(
            "geometry {} has {} coordinate values, expected an even count of at least 4",
            geometry.id, lonlats.len()
        )));
    }

    let id = truncate_id(&geometry.id);
    Ok(Feature {
        kind: "Feature",
        role: GEOMETRY_ROLE,
        id: id.clone(),
        properties: Properties::Segment(SegmentProperties {
            id,
            forward_reference_id: truncate_id(&geometry.forward_reference_id),
            start_intersection_id: truncate_id(&geometry.from_intersection_id),
            back_reference_id: truncate_id(&geometry.back_reference_id),
            end_intersection_id: truncate_id(&geometry.to_intersection_id),
            road_class: geometry.road_class,
        }),
        geometry: Geometry::LineString(
            lonlats.chunks_exact(2).map(|pair| point(pair[0], pair[1])).collect(),
        ),
    })
}

pub fn intersection_feature(intersection: &SharedStreetsIntersection) -> Feature {
    let id = truncate_id(&intersection.id);
    Feature {
        kind: "Feature",
        role: INTERSECTION_ROLE,
        id: id.clone(),
        properties: Properties::Intersection(IntersectionProperties {
            id,
            inbound_segment_ids: truncate_ids(&intersection.inbound_reference_ids),
            outbound_segment_ids: truncate_ids(&intersection.outbound_reference_ids),
        }),
        geometry: Geometry::Point(point(intersection.lon, intersection.lat)),
    }
}

pub fn reference_record(reference: &SharedStreetsReference) -> Result<ReferenceRecord> {
    let [start, end] = reference.location_references.as_slice() else {
        return Err(Error::shape(format!(
            "reference {} has {} location references, expected 2",
            reference.id,
            reference.location_references.len()
        )));
    };

    // Unset scalars read as 0, as protobuf defaults them.
    Ok(ReferenceRecord {
        role: REFERENCE_ROLE,
        id: truncate_id(&reference.id),
        geometry_id: truncate_id(&reference.geometry_id),
        form_of_way: reference.form_of_way,
        location_references: [
            LocationReferenceRecord {
                sequence: 0,
                intersection_id: truncate_id(&start.intersection_id),
                distance_to_next_ref: Some(start.distance_to_next_ref.unwrap_or_default()),
                bearing: Some(start.inbound_bearing.unwrap_or_default()),
                out_bearing: Some(start.outbound_bearing.unwrap_or_default()),
                point: point(start.lon, start.lat),
            },
            LocationReferenceRecord {
                sequence: 1,
                intersection_id: truncate_id(&end.intersection_id),
                distance_to_next_ref: None,
                bearing: None,
                out_bearing: None,
                point: point(end.lon, end.lat),
            },
        ],
    })
}

/// Geometries then intersections as features, references alongside, each in
/// the order of its map.
pub fn make_geojson(data: &TileData) -> Result<FeatureCollection> {
    let mut geojson = FeatureCollection::default();

    for geometry in data.geometries.values() {
        geojson.features.push(geometry_feature(geometry)?);
    }
    for intersection in data.intersections.values() {
        geojson.features.push(intersection_feature(intersection));
    }
    for reference in data.references.values() {
        geojson.references.push(reference_record(reference)?);
    }

    Ok(geojson)
}
