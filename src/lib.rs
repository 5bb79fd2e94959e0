#![doc = "Choropleth maps of administrative regions: join, quantile classes, colors, viewport"]
pub mod cache;
pub mod choropleth;
pub mod cli;
pub mod commands;
mod common;
pub mod config;
pub mod geometry;
pub mod table;

#[doc(inline)]
pub use cache::DatasetCache;

#[doc(inline)]
pub use choropleth::{Choropleth, ClassScheme, Legend, Rendered, quantiles, resolve_keys};

#[doc(inline)]
pub use config::ChoroplethConfig;

#[doc(inline)]
pub use geometry::{FeatureCollection, RegionFeature, RegionGeometry, Viewport, estimate_viewport};

#[doc(inline)]
pub use table::{AttributeRecord, AttributeTable, classify_columns, to_number};
