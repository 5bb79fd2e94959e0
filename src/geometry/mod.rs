//! Region boundaries loaded from a GeoJSON FeatureCollection.

mod viewport;

use std::path::Path;

use anyhow::{Context, Result};
use geo::{LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value, json};

use crate::common;

pub use viewport::{DEFAULT_VIEWPORT, Viewport, bounding_box, estimate_viewport};

/// The polygonal shape of a region.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl RegionGeometry {
    /// Decode a GeoJSON geometry object. Null geometries and types other than
    /// Polygon/MultiPolygon have no region shape.
    pub fn from_geojson(geometry: &Value) -> Result<Option<Self>> {
        let Some(object) = geometry.as_object() else { return Ok(None) };
        let coords = object.get("coordinates").unwrap_or(&Value::Null);
        match object.get("type").and_then(Value::as_str) {
            Some("Polygon") => Ok(Some(Self::Polygon(common::parse_polygon_coords(coords)?))),
            Some("MultiPolygon") => Ok(Some(Self::MultiPolygon(common::parse_multipolygon_coords(coords)?))),
            _ => Ok(None),
        }
    }

    /// Polygons of this shape; a single Polygon yields itself.
    pub fn polygons(&self) -> std::slice::Iter<'_, Polygon<f64>> {
        match self {
            Self::Polygon(polygon) => std::slice::from_ref(polygon).iter(),
            Self::MultiPolygon(multi) => multi.0.iter(),
        }
    }

    /// Every ring (exteriors and holes) of every polygon, in file order.
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.polygons()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
    }
}

/// One administrative region: its shape plus free-form properties.
///
/// The source geometry object is kept verbatim so written output carries the
/// boundaries exactly as they were read.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeature {
    pub shape: Option<RegionGeometry>,
    pub properties: Map<String, Value>,
    geometry: Value,
    extra: Map<String, Value>,
}

impl RegionFeature {
    pub fn new(shape: Option<RegionGeometry>, properties: Map<String, Value>) -> Self {
        let geometry = shape.as_ref().map_or(Value::Null, geometry_to_geojson);
        Self { shape, properties, geometry, extra: Map::new() }
    }

    /// Build from a GeoJSON Feature. Unusable geometry leaves the region without shape.
    fn from_geojson(index: usize, feature: Value) -> Self {
        let Value::Object(mut object) = feature else {
            tracing::warn!(index, "feature is not a JSON object; keeping it without shape or properties");
            return Self::new(None, Map::new());
        };

        let geometry = object.shift_remove("geometry").unwrap_or(Value::Null);
        let properties = match object.shift_remove("properties") {
            Some(Value::Object(properties)) => properties,
            _ => Map::new(),
        };
        object.shift_remove("type");

        let shape = RegionGeometry::from_geojson(&geometry).unwrap_or_else(|e| {
            tracing::warn!(index, error = %e, "malformed feature geometry; region has no shape");
            None
        });

        Self { shape, properties, geometry, extra: object }
    }

    fn to_geojson(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".into(), json!("Feature"));
        for (k, v) in &self.extra {
            object.insert(k.clone(), v.clone());
        }
        object.insert("geometry".into(), self.geometry.clone());
        object.insert("properties".into(), Value::Object(self.properties.clone()));
        Value::Object(object)
    }

    /// A property as trimmed text, the way join keys are compared.
    /// Strings are used as-is, numbers and booleans in their JSON form, null/absent as empty.
    pub fn property_text(&self, name: &str) -> String {
        match self.properties.get(name) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// The full map: every region, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<RegionFeature>,
    extra: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<RegionFeature>) -> Self {
        Self { features, extra: Map::new() }
    }

    /// Read a GeoJSON FeatureCollection file.
    pub fn read_geojson(path: &Path) -> Result<Self> {
        let bytes = common::read_source(path, "geometry")?;
        Self::from_geojson_bytes(&bytes)
            .with_context(|| format!("[geometry::read_geojson] Failed to parse geometry file {}", path.display()))
    }

    /// Parse a GeoJSON FeatureCollection from memory.
    pub fn from_geojson_bytes(bytes: &[u8]) -> Result<Self> {
        let (features, mut extra) = common::parse_feature_collection(bytes)?;
        extra.shift_remove("type");

        let features = features.into_iter().enumerate()
            .map(|(i, feature)| RegionFeature::from_geojson(i, feature))
            .collect::<Vec<_>>();

        tracing::debug!(
            features = features.len(),
            with_shape = features.iter().filter(|f| f.shape.is_some()).count(),
            "feature collection loaded"
        );
        Ok(Self { features, extra })
    }

    /// Export as a GeoJSON FeatureCollection value.
    pub fn to_geojson(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".into(), json!("FeatureCollection"));
        for (k, v) in &self.extra {
            object.insert(k.clone(), v.clone());
        }
        object.insert("features".into(), Value::Array(self.features.iter().map(RegionFeature::to_geojson).collect()));
        Value::Object(object)
    }

    /// Write as a GeoJSON file.
    pub fn write_geojson(&self, path: &Path) -> Result<()> {
        common::ensure_parent_dir(path)?;
        common::write_json_file(path, &self.to_geojson())
    }

    /// Property names of the first feature, in file order.
    pub fn first_property_names(&self) -> Vec<&str> {
        self.features.first()
            .map(|f| f.properties.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }
}

/// Convert a shape to a GeoJSON geometry value.
fn geometry_to_geojson(shape: &RegionGeometry) -> Value {
    let ring = |ls: &LineString<f64>| ls.0.iter().map(|c| vec![c.x, c.y]).collect::<Vec<_>>();
    let polygon = |p: &Polygon<f64>| {
        std::iter::once(p.exterior()).chain(p.interiors()).map(ring).collect::<Vec<_>>()
    };
    match shape {
        RegionGeometry::Polygon(p) => json!({ "type": "Polygon", "coordinates": polygon(p) }),
        RegionGeometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon).collect::<Vec<_>>(),
        }),
    }
}
