//! Format-level reading and writing.
//!
//! - `csv` - delimited attribute tables, read as all-string columns
//! - `geojson` - FeatureCollection parsing and polygon coordinate decoding
//! - `svg` - low-level SVG writer and path drawing

mod csv;
mod geojson;
mod svg;

pub(crate) use csv::*;
pub(crate) use geojson::*;
pub(crate) use svg::*;
