//! SharedStreets tile records as they come off the wire. Each layer file is a
//! run of varint length-prefixed messages of one of these types.

use std::fmt;

/// Upstream tile layers that carry records we consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Geometry,
    Intersection,
    Reference,
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Geometry => "geometry",
            Layer::Intersection => "intersection",
            Layer::Reference => "reference",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum RoadClass {
    Motorway = 0,
    Trunk = 1,
    Primary = 2,
    Secondary = 3,
    Tertiary = 4,
    Residential = 5,
    Unclassified = 6,
    Service = 7,
    Other = 8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum FormOfWay {
    Undefined = 0,
    Motorway = 1,
    MultipleCarriageway = 2,
    SingleCarriageway = 3,
    Roundabout = 4,
    TrafficSquare = 5,
    SlipRoad = 6,
    Other = 7,
}

/// A street segment between two intersections.
/// `lonlats` interleaves coordinates: `[lon0, lat0, lon1, lat1, ...]`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SharedStreetsGeometry {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub from_intersection_id: String,
    #[prost(string, tag = "3")]
    pub to_intersection_id: String,
    #[prost(string, tag = "4")]
    pub forward_reference_id: String,
    #[prost(string, tag = "5")]
    pub back_reference_id: String,
    #[prost(enumeration = "RoadClass", tag = "6")]
    pub road_class: i32,
    #[prost(double, repeated, tag = "7")]
    pub lonlats: Vec<f64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SharedStreetsIntersection {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(uint64, tag = "2")]
    pub node_id: u64,
    #[prost(double, tag = "3")]
    pub lon: f64,
    #[prost(double, tag = "4")]
    pub lat: f64,
    #[prost(string, repeated, tag = "5")]
    pub inbound_reference_ids: Vec<String>,
    #[prost(string, repeated, tag = "6")]
    pub outbound_reference_ids: Vec<String>,
}

/// Directional reference over one geometry. Valid references have exactly
/// two location references: start and end.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SharedStreetsReference {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub geometry_id: String,
    #[prost(enumeration = "FormOfWay", tag = "3")]
    pub form_of_way: i32,
    #[prost(message, repeated, tag = "4")]
    pub location_references: Vec<LocationReference>,
}

/// Bearings and distance are only set on the first entry of a reference.
#[derive(Clone, PartialEq, prost::Message)]
pub struct LocationReference {
    #[prost(string, tag = "1")]
    pub intersection_id: String,
    #[prost(double, tag = "2")]
    pub lon: f64,
    #[prost(double, tag = "3")]
    pub lat: f64,
    #[prost(uint32, optional, tag = "4")]
    pub inbound_bearing: Option<u32>,
    #[prost(uint32, optional, tag = "5")]
    pub outbound_bearing: Option<u32>,
    #[prost(uint32, optional, tag = "6")]
    pub distance_to_next_ref: Option<u32>,
}
