use std::io::Write;

use anyhow::Result;
use geo::{Coord, CoordsIter, LineString};

/// Projection function: lon/lat -> SVG coords (x,y)
pub(crate) type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Build a compact SVG path string from rings: "M x,y L x,y ... Z" per ring.
pub(crate) fn rings_to_path<'a>(rings: impl IntoIterator<Item = &'a LineString<f64>>, project: &Projection) -> String {
    let mut out = String::new();

    for ring in rings {
        let mut coords = ring.coords_iter()
            .map(|coord| project(&coord));
        if let Some((x, y)) = coords.next() {
            out.push_str(&format!(" M{x:.3},{y:.3}"));
            for (x, y) in coords {
                out.push_str(&format!(" L{x:.3},{y:.3}"));
            }
            out.push('Z');
        }
    }

    out
}

/// Draw one filled region path, with an optional hover title.
pub(crate) fn draw_region(writer: &mut impl Write, path: &str, fill: &str, opacity: f64, title: Option<&str>) -> Result<()> {
    if path.is_empty() { return Ok(()) }
    match title {
        Some(title) => writeln!(writer,
            r#"<path class="region" d="{path}" fill="{fill}" fill-opacity="{opacity:.3}"><title>{}</title></path>"#,
            xml_escape(title),
        )?,
        None => writeln!(writer, r#"<path class="region" d="{path}" fill="{fill}" fill-opacity="{opacity:.3}"/>"#)?,
    }
    Ok(())
}

/// Draw a legend swatch with its caption to the right.
pub(crate) fn draw_swatch(writer: &mut impl Write, x: f64, y: f64, size: f64, fill: &str, caption: &str) -> Result<()> {
    writeln!(writer, r#"<rect class="swatch" x="{x:.1}" y="{y:.1}" width="{size:.1}" height="{size:.1}" fill="{fill}"/>"#)?;
    writeln!(writer, r#"<text x="{:.1}" y="{:.1}">{}</text>"#, x + size + 4.0, y + size - 4.0, xml_escape(caption))?;
    Ok(())
}

/// Escape text for use in XML content and attribute values.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
