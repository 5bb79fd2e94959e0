use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};

/// Parse GeoJSON bytes and split the root object into its `features` array and
/// the remaining top-level members.
pub(crate) fn parse_feature_collection(bytes: &[u8]) -> Result<(Vec<Value>, Map<String, Value>)> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] Invalid JSON")?;
    let Value::Object(mut root) = value else {
        bail!("[io::geojson] Root is not a JSON object")
    };
    match root.shift_remove("features") {
        Some(Value::Array(features)) => Ok((features, root)),
        Some(_) => bail!("[io::geojson] `features` is not an array"),
        None => bail!("[io::geojson] Missing `features` array"),
    }
}

/// Parse GeoJSON Polygon coordinates: `[exterior, hole, hole, ...]`.
pub(crate) fn parse_polygon_coords(coords: &Value) -> Result<Polygon<f64>> {
    let rings = coords.as_array()
        .ok_or_else(|| anyhow!("Invalid Polygon: coordinates must be an array of rings"))?;

    let mut rings = rings.iter().map(parse_ring_coords);
    let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString(Vec::new()));
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse GeoJSON MultiPolygon coordinates: `[polygon, polygon, ...]`.
pub(crate) fn parse_multipolygon_coords(coords: &Value) -> Result<MultiPolygon<f64>> {
    let polygons = coords.as_array()
        .ok_or_else(|| anyhow!("Invalid MultiPolygon: coordinates must be an array of polygons"))?;

    polygons.iter()
        .map(parse_polygon_coords)
        .collect::<Result<Vec<_>>>()
        .map(MultiPolygon)
}

/// Parse a ring of positions. Only the first two ordinates are kept.
fn parse_ring_coords(ring: &Value) -> Result<LineString<f64>> {
    let positions = ring.as_array()
        .ok_or_else(|| anyhow!("Invalid ring: must be an array of positions"))?;

    let mut points = Vec::with_capacity(positions.len());
    for position in positions {
        let pair = position.as_array()
            .filter(|p| p.len() >= 2)
            .ok_or_else(|| anyhow!("Invalid position: expected [lon, lat]"))?;
        let x = pair[0].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: longitude must be a number"))?;
        let y = pair[1].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: latitude must be a number"))?;
        points.push(Coord { x, y });
    }

    Ok(LineString(points))
}

/// Serialize a JSON value to `path`.
pub(crate) fn write_json_file(path: &Path, value: &Value) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::geojson] Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|| format!("[io::geojson] Failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
