//! GeoJSON (RFC 7946) reader.
//!
//! Parses `serde_json::Value` documents into the core [`FeatureCollection`].
//! A document may be a `FeatureCollection`, a single `Feature` or a bare
//! geometry; the latter two load as a one-feature collection.
//!
//! A feature whose geometry is malformed is kept with no geometry and logged,
//! so one bad feature never rejects the whole document.

use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use log::{debug, warn};
use maplabel_core::{Feature, FeatureCollection};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoJsonError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON document must be an object")]
    NotAnObject,

    #[error("unknown GeoJSON type {0:?}")]
    UnknownType(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid feature collection: {0}")]
    InvalidCollection(String),
}

const COORDINATE_TYPES: [&str; 6] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
];

fn invalid(message: impl Into<String>) -> GeoJsonError {
    GeoJsonError::InvalidGeometry(message.into())
}

/// Parse a GeoJSON document from raw bytes.
pub fn parse_feature_collection(name: &str, bytes: &[u8]) -> Result<FeatureCollection, GeoJsonError> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_value(name, &value)
}

/// Parse an already decoded GeoJSON document.
pub fn from_value(name: &str, value: &Value) -> Result<FeatureCollection, GeoJsonError> {
    let object = value.as_object().ok_or(GeoJsonError::NotAnObject)?;
    let kind = type_of(object)?;

    let features = match kind {
        "FeatureCollection" => {
            let entries = object
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| GeoJsonError::InvalidCollection("missing \"features\" array".into()))?;
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| parse_feature(name, i, entry))
                .collect()
        }
        "Feature" => vec![parse_feature(name, 0, value)],
        _ => vec![Feature::new(parse_geometry(value)?)],
    };

    debug!("{}: parsed {} features", name, features.len());
    Ok(FeatureCollection::new(name, features))
}

fn type_of(object: &Map<String, Value>) -> Result<&str, GeoJsonError> {
    object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeoJsonError::UnknownType(String::new()))
}

fn parse_feature(source: &str, index: usize, value: &Value) -> Feature {
    let Some(object) = value.as_object() else {
        warn!("{}: feature #{} is not an object", source, index);
        return Feature::without_geometry();
    };

    let geometry = match object.get("geometry") {
        None | Some(Value::Null) => None,
        Some(g) => match parse_geometry(g) {
            Ok(g) => Some(g),
            Err(e) => {
                warn!("{}: feature #{} has unusable geometry: {}", source, index, e);
                None
            }
        },
    };

    let properties = match object.get("properties") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    Feature {
        id: object.get("id").cloned(),
        geometry,
        properties,
    }
}

/// Parse a GeoJSON geometry object.
pub fn parse_geometry(value: &Value) -> Result<Geometry<f64>, GeoJsonError> {
    let object = value.as_object().ok_or(GeoJsonError::NotAnObject)?;
    let kind = type_of(object)?;

    if kind == "GeometryCollection" {
        let members = object
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("GeometryCollection without \"geometries\""))?;
        let geometries = members.iter().map(parse_geometry).collect::<Result<Vec<_>, _>>()?;
        return Ok(Geometry::GeometryCollection(GeometryCollection(geometries)));
    }

    if !COORDINATE_TYPES.contains(&kind) {
        return Err(GeoJsonError::UnknownType(kind.to_string()));
    }
    let coords = object
        .get("coordinates")
        .ok_or_else(|| invalid(format!("{} without \"coordinates\"", kind)))?;

    let geometry = match kind {
        "Point" => Geometry::Point(Point(position(coords)?)),
        "MultiPoint" => Geometry::MultiPoint(MultiPoint(
            array(coords)?
                .iter()
                .map(|c| position(c).map(Point))
                .collect::<Result<_, _>>()?,
        )),
        "LineString" => Geometry::LineString(line_string(coords)?),
        "MultiLineString" => Geometry::MultiLineString(MultiLineString(
            array(coords)?.iter().map(line_string).collect::<Result<_, _>>()?,
        )),
        "Polygon" => Geometry::Polygon(polygon(coords)?),
        "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon(
            array(coords)?.iter().map(polygon).collect::<Result<_, _>>()?,
        )),
        other => return Err(GeoJsonError::UnknownType(other.to_string())),
    };
    Ok(geometry)
}

fn array(value: &Value) -> Result<&Vec<Value>, GeoJsonError> {
    value.as_array().ok_or_else(|| invalid("coordinates must be an array"))
}

/// `[lng, lat, ...]`; extra ordinates (altitude) are ignored.
fn position(value: &Value) -> Result<Coord<f64>, GeoJsonError> {
    let items = array(value)?;
    if items.len() < 2 {
        return Err(invalid("position needs at least two numbers"));
    }
    let x = items[0].as_f64().ok_or_else(|| invalid("longitude must be a number"))?;
    let y = items[1].as_f64().ok_or_else(|| invalid("latitude must be a number"))?;
    Ok(Coord { x, y })
}

fn line_string(value: &Value) -> Result<LineString<f64>, GeoJsonError> {
    let coords = array(value)?.iter().map(position).collect::<Result<Vec<_>, _>>()?;
    Ok(LineString(coords))
}

fn polygon(value: &Value) -> Result<Polygon<f64>, GeoJsonError> {
    let mut rings = array(value)?.iter().map(line_string);
    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => LineString(Vec::new()),
    };
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    // Polygon::new closes open rings.
    Ok(Polygon::new(exterior, interiors))
}
