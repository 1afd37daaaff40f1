//! GeoJSON output shapes, extended with a top-level `references` array.

use serde::Serialize;

pub const GEOMETRY_ROLE: &str = "SharedStreets:Geometry";
pub const INTERSECTION_ROLE: &str = "SharedStreets:Intersection";
pub const REFERENCE_ROLE: &str = "SharedStreets:Reference";

pub type Position = [f64; 2];

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
    pub references: Vec<ReferenceRecord>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        FeatureCollection {
            kind: "FeatureCollection",
            features: Vec::new(),
            references: Vec::new(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub role: &'static str,
    pub id: String,
    pub properties: Properties,
    pub geometry: Geometry,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Properties {
    Segment(SegmentProperties),
    Intersection(IntersectionProperties),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentProperties {
    pub id: String,
    pub forward_reference_id: String,
    pub start_intersection_id: String,
    pub back_reference_id: String,
    pub end_intersection_id: String,
    pub road_class: i32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntersectionProperties {
    pub id: String,
    pub inbound_segment_ids: Vec<String>,
    pub outbound_segment_ids: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    LineString(Vec<Position>),
    Point(Position),
}

/// Not a GeoJSON feature: references carry no geometry of their own.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRecord {
    pub role: &'static str,
    pub id: String,
    pub geometry_id: String,
    pub form_of_way: i32,
    pub location_references: [LocationReferenceRecord; 2],
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationReferenceRecord {
    pub sequence: u32,
    pub intersection_id: String,
    pub distance_to_next_ref: Option<u32>,
    pub bearing: Option<u32>,
    pub out_bearing: Option<u32>,
    pub point: Position,
}
