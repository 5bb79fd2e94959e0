//! Joining attributes onto regions, quantile classification and coloring.

mod color;
mod keys;
mod legend;
mod quantile;
mod render;
mod svg;

pub use color::{ClassScheme, DATA_ALPHA, NO_DATA, NO_DATA_LABEL, PALETTE, Rgb, Rgba, class_palette, format_value, label_for};
pub use keys::{KeyMatch, KeyResolution, resolve_keys};
pub use legend::{Legend, LegendEntry};
pub use quantile::{DEFAULT_BREAKS, quantiles};
pub use render::{COLOR_PROP, Choropleth, LABEL_PROP, Rendered, VALUE_PROP, ValueMap, annotate, build_value_map};
pub use svg::MIN_SVG_WIDTH;
