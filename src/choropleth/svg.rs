use std::{io::Write, path::Path};

use anyhow::{Result, anyhow, ensure};
use geo::Coord;

use crate::{common, geometry::bounding_box};

use super::{Rendered, color::Rgba, legend::Legend};

const MARGIN: f64 = 10.0;
const SWATCH: f64 = 16.0;
const LEGEND_ROW: f64 = SWATCH + 6.0;

/// Narrowest drawable width in pixels.
pub const MIN_SVG_WIDTH: u32 = 64;

impl Rendered {
    /// Small wrapper with defaults.
    pub fn to_svg(&self, path: &Path) -> Result<()> {
        self.to_svg_with_width(path, 1200)
    }

    /// Draw the annotated regions as a static SVG choropleth with a legend underneath.
    /// Each region carries its label as a hover title.
    pub fn to_svg_with_width(&self, path: &Path, width: u32) -> Result<()> {
        ensure!(width >= MIN_SVG_WIDTH, "[to_svg] Width {width}px is below the minimum of {MIN_SVG_WIDTH}px");
        let bounds = bounding_box(&self.features)
            .ok_or_else(|| anyhow!("[to_svg] Geometry has no coordinates; nothing to draw."))?;

        let width = width as f64;
        let span = bounds.width().max(bounds.height()).max(f64::EPSILON);
        let scale = (width - 2.0 * MARGIN) / span;
        let map_height = bounds.height() * scale + 2.0 * MARGIN;

        let legend = self.legend();
        let height = map_height + LEGEND_ROW * (legend.entries.len() + 1) as f64 + MARGIN;

        // --- Map lon/lat -> SVG coords (preserve aspect, Y down) ---
        let project = move |coord: &Coord<f64>| -> (f64, f64) {
            let x = MARGIN + (coord.x - bounds.min().x) * scale;
            let y = MARGIN + (bounds.max().y - coord.y) * scale; // invert vertically
            (x, y)
        };

        common::ensure_parent_dir(path)?;
        let mut writer = common::SvgWriter::new(path)?;
        writer.write_header(width, height, &bounds)?;
        writer.write_styles()?;

        for feature in &self.features.features {
            let Some(shape) = &feature.shape else { continue };
            let color = feature_color(feature.properties.get(super::COLOR_PROP))
                .unwrap_or(super::NO_DATA);
            let title = feature.properties.get(super::LABEL_PROP)
                .and_then(|v| v.as_str())
                .map(|label| label.replace("<br>", "\n"));
            common::draw_region(
                &mut writer,
                &common::rings_to_path(shape.rings(), &project),
                &color.rgb().to_string(),
                color.opacity(),
                title.as_deref(),
            )?;
        }

        draw_legend(&mut writer, &legend, map_height)?;

        writer.write_footer()?;
        writer.flush()?;

        Ok(())
    }
}

/// Read back an `[r, g, b, a]` color property.
fn feature_color(value: Option<&serde_json::Value>) -> Option<Rgba> {
    let channels = value?.as_array()?
        .iter()
        .map(|c| c.as_u64().and_then(|c| u8::try_from(c).ok()))
        .collect::<Option<Vec<_>>>()?;
    let [r, g, b, a] = channels[..] else { return None };
    Some(Rgba { r, g, b, a })
}

fn draw_legend(writer: &mut impl Write, legend: &Legend, top: f64) -> Result<()> {
    writeln!(writer, r#"<g class="legend">"#)?;
    writeln!(writer, r#"<text x="{MARGIN:.1}" y="{:.1}">{}</text>"#, top + SWATCH - 4.0, common::xml_escape(&legend.metric))?;
    for (i, (entry, color)) in legend.entries.iter().zip(legend.colors()).enumerate() {
        let y = top + LEGEND_ROW * (i + 1) as f64;
        common::draw_swatch(writer, MARGIN, y, SWATCH, &color.rgb().to_string(), &Legend::caption(entry))?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Choropleth, FeatureCollection, table::{AttributeRecord, AttributeTable}};
    use serde_json::json;

    fn rendered(geojson: &str) -> Rendered {
        let fc = FeatureCollection::from_geojson_bytes(geojson.as_bytes()).unwrap();
        let record = [("DPTO_CCDGO", "05"), ("POP", "10")].into_iter().collect::<AttributeRecord>();
        let table = AttributeTable::new(vec!["DPTO_CCDGO".into(), "POP".into()], vec![record]);
        Choropleth::default().render(&fc, &table, None).unwrap()
    }

    #[test]
    fn writes_regions_titles_and_legend() {
        let r = rendered(r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"DPTO_CCDGO":"05"},"geometry":{"type":"Polygon","coordinates":[[[-76,6],[-75,6],[-75,7],[-76,6]]]}},
            {"type":"Feature","properties":{"DPTO_CCDGO":"08"},"geometry":null}
        ]}"#);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.svg");
        r.to_svg_with_width(&path, 400).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"<path class="region""#).count(), 1);
        assert!(svg.contains("<title>DPTO_CCDGO: 05\nPOP: 10.0</title>"));
        assert!(svg.contains(r#"<g class="legend">"#));
        assert!(svg.contains("10–10"));
    }

    #[test]
    fn nothing_to_draw_is_an_error() {
        let r = rendered(r#"{"type":"FeatureCollection","features":[]}"#);
        let dir = tempfile::tempdir().unwrap();
        assert!(r.to_svg(&dir.path().join("map.svg")).is_err());
    }

    #[test]
    fn too_narrow_width_is_rejected() {
        let r = rendered(r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"DPTO_CCDGO":"05"},"geometry":{"type":"Polygon","coordinates":[[[-76,6],[-75,6],[-75,7],[-76,6]]]}}
        ]}"#);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.svg");
        assert!(r.to_svg_with_width(&path, 0).is_err());
        assert!(r.to_svg_with_width(&path, MIN_SVG_WIDTH - 1).is_err());
        assert!(!path.exists());
        r.to_svg_with_width(&path, MIN_SVG_WIDTH).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn color_property_round_trip() {
        assert_eq!(feature_color(Some(&json!([1, 2, 3, 4]))), Some(Rgba { r: 1, g: 2, b: 3, a: 4 }));
        assert_eq!(feature_color(Some(&json!([1, 2, 3]))), None);
        assert_eq!(feature_color(Some(&json!([1, 2, 3, 300]))), None);
        assert_eq!(feature_color(None), None);
    }
}
