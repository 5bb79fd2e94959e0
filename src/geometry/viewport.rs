use geo::{CoordsIter, Rect, coord};
use serde::Serialize;

use super::FeatureCollection;

/// Spans wider than this (degrees) get the wider zoom.
const WIDE_SPAN_DEG: f64 = 15.0;
const ZOOM_WIDE: f64 = 4.5;
const ZOOM_NARROW: f64 = 5.0;

/// Initial map view: center and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

/// Whole-country framing of Colombia, used when there is nothing to measure.
pub const DEFAULT_VIEWPORT: Viewport = Viewport { latitude: 4.6, longitude: -74.3, zoom: 4.5 };

/// Extent of every vertex of every polygon (holes included), or `None` without vertices.
pub fn bounding_box(collection: &FeatureCollection) -> Option<Rect<f64>> {
    let mut coords = collection.features.iter()
        .filter_map(|feature| feature.shape.as_ref())
        .flat_map(|shape| shape.polygons())
        .flat_map(|polygon| polygon.coords_iter());

    let first = coords.next()?;
    Some(coords.fold(Rect::new(first, first), |rect, c| {
        Rect::new(
            coord! { x: rect.min().x.min(c.x), y: rect.min().y.min(c.y) },
            coord! { x: rect.max().x.max(c.x), y: rect.max().y.max(c.y) },
        )
    }))
}

/// Center on the bounding-box midpoint with a two-level zoom: wider when the
/// larger span exceeds 15 degrees. Falls back to [`DEFAULT_VIEWPORT`].
pub fn estimate_viewport(collection: &FeatureCollection) -> Viewport {
    let Some(bbox) = bounding_box(collection) else {
        tracing::debug!("no coordinates in geometry; using default viewport");
        return DEFAULT_VIEWPORT;
    };

    let span = bbox.width().max(bbox.height());
    Viewport {
        latitude: (bbox.min().y + bbox.max().y) / 2.0,
        longitude: (bbox.min().x + bbox.max().x) / 2.0,
        zoom: if span > WIDE_SPAN_DEG { ZOOM_WIDE } else { ZOOM_NARROW },
    }
}
