use std::fmt;

use serde::Serialize;

use super::color::{ClassScheme, DATA_ALPHA, Rgba};

/// One class: its value range and fill color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    pub lower: f64,
    pub upper: f64,
    pub color: [u8; 4],
}

/// Breakpoints and colors for display next to the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub metric: String,
    pub breaks: Vec<f64>,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn new(metric: &str, scheme: &ClassScheme) -> Self {
        let palette = scheme.palette();
        let entries = scheme.breaks().windows(2).enumerate()
            .map(|(i, w)| {
                let rgb = palette[i.min(palette.len() - 1)];
                LegendEntry { lower: w[0], upper: w[1], color: rgb.with_alpha(DATA_ALPHA).to_array() }
            })
            .collect();
        Self { metric: metric.to_string(), breaks: scheme.breaks().to_vec(), entries }
    }

    /// Range caption with whole-number bounds, e.g. `100–140`.
    pub fn caption(entry: &LegendEntry) -> String {
        format!("{:.0}–{:.0}", entry.lower, entry.upper)
    }

    pub fn colors(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.entries.iter().map(|e| {
            let [r, g, b, a] = e.color;
            Rgba { r, g, b, a }
        })
    }
}

impl fmt::Display for Legend {
    /// `Classes (quantiles): 100–140, 140–180 | Variable: POP`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges = self.entries.iter().map(Self::caption).collect::<Vec<_>>();
        write!(f, "Classes (quantiles): {} | Variable: {}", ranges.join(", "), self.metric)
    }
}
