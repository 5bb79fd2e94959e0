use ahash::AHashMap;
use anyhow::{Result, bail};
use serde_json::{Value, json};

use crate::{
    config::ChoroplethConfig,
    geometry::{FeatureCollection, Viewport, estimate_viewport},
    table::{AttributeTable, MetricSelection, classify_columns, to_number},
};

use super::{
    color::{ClassScheme, label_for},
    keys::{KeyResolution, resolve_keys},
    legend::Legend,
};

/// Property names added to every feature by annotation.
pub const VALUE_PROP: &str = "_value";
pub const COLOR_PROP: &str = "_color";
pub const LABEL_PROP: &str = "_label";

const ANNOTATION_PROPS: [&str; 3] = [VALUE_PROP, COLOR_PROP, LABEL_PROP];

/// Region key (trimmed) -> metric value, `None` when the cell is missing or not numeric.
pub type ValueMap = AHashMap<String, Option<f64>>;

/// Join the table on `data_key`, taking `metric` from each row.
/// Rows with an empty key are skipped; a repeated key keeps the last row's value.
pub fn build_value_map(table: &AttributeTable, data_key: &str, metric: &str) -> ValueMap {
    let mut values = ValueMap::default();
    for record in table.records() {
        let key = record.get(data_key).unwrap_or_default().trim();
        if key.is_empty() { continue }
        values.insert(key.to_string(), record.get(metric).and_then(to_number));
    }
    values
}

/// Write `_value`, `_color` and `_label` into every feature, replacing any earlier
/// annotation. Returns how many features found a row in `values`.
pub fn annotate(collection: &mut FeatureCollection, geo_key: &str, metric: &str, values: &ValueMap, scheme: &ClassScheme) -> usize {
    let mut matched = 0;
    for feature in &mut collection.features {
        let region_id = feature.property_text(geo_key);
        let value = match values.get(&region_id) {
            Some(value) => { matched += 1; *value }
            None => None,
        };

        let props = &mut feature.properties;
        props.insert(VALUE_PROP.into(), value.map_or(Value::Null, |v| json!(v)));
        props.insert(COLOR_PROP.into(), json!(scheme.color_for(value).to_array()));
        props.insert(LABEL_PROP.into(), json!(label_for(geo_key, &region_id, metric, value)));
    }
    matched
}

/// The output of one render pass.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Fresh copy of the geometry with annotation properties.
    pub features: FeatureCollection,
    pub keys: KeyResolution,
    pub selection: MetricSelection,
    /// The metric actually colored by.
    pub metric: String,
    pub scheme: ClassScheme,
    pub viewport: Viewport,
    /// Features whose key found a table row.
    pub matched: usize,
}

impl Rendered {
    pub fn legend(&self) -> Legend { Legend::new(&self.metric, &self.scheme) }

    /// True when either join key was picked positionally; worth a warning to the user.
    pub fn used_key_fallback(&self) -> bool { self.keys.used_fallback() }
}

/// Joins, classifies and colors region geometry by an attribute column.
#[derive(Debug, Clone, Default)]
pub struct Choropleth {
    config: ChoroplethConfig,
}

impl Choropleth {
    pub fn new(config: ChoroplethConfig) -> Self { Self { config } }

    #[inline] pub fn config(&self) -> &ChoroplethConfig { &self.config }

    /// Resolve the join keys and the selectable metrics.
    /// Annotation properties from an earlier render never act as the geometry key.
    pub fn resolve(&self, collection: &FeatureCollection, table: &AttributeTable) -> (KeyResolution, MetricSelection) {
        let geo_props = collection.first_property_names().into_iter()
            .filter(|name| !ANNOTATION_PROPS.iter().any(|prop| prop == name));
        let keys = resolve_keys(geo_props, table.columns(), &self.config.geo_key_candidates);
        let selection = classify_columns(table, &keys.data_key, self.config.sample_rows, &self.config.default_metrics);
        (keys, selection)
    }

    /// Annotate a copy of `collection` by `metric` (the default metric when `None`).
    ///
    /// Fails only when `metric` names a column that is not selectable.
    pub fn render(&self, collection: &FeatureCollection, table: &AttributeTable, metric: Option<&str>) -> Result<Rendered> {
        let (keys, selection) = self.resolve(collection, table);

        let metric = match metric {
            Some(metric) if selection.contains(metric) => metric.to_string(),
            Some(metric) => bail!(
                "[choropleth::render] Metric {:?} is not selectable; choose one of: {}",
                metric,
                selection.metrics.join(", "),
            ),
            None => selection.default_metric().to_string(),
        };

        let values = build_value_map(table, &keys.data_key, &metric);
        let present = values.values().flatten().copied().collect::<Vec<_>>();
        let scheme = ClassScheme::from_values(&present, self.config.class_count());

        let mut features = collection.clone();
        let matched = annotate(&mut features, &keys.geo_key, &metric, &values, &scheme);
        if matched == 0 && !features.is_empty() {
            tracing::warn!(geo_key = %keys.geo_key, data_key = %keys.data_key, "no region matched a table row");
        }
        tracing::debug!(metric = %metric, regions = features.len(), matched, "choropleth rendered");

        let viewport = estimate_viewport(&features);

        Ok(Rendered { features, keys, selection, metric, scheme, viewport, matched })
    }
}
