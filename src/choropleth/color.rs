//! Class colors and region labels.

use std::fmt;

use super::quantile::{DEFAULT_BREAKS, quantiles};

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn with_alpha(self, a: u8) -> Rgba { Rgba { r: self.r, g: self.g, b: self.b, a } }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// RGB color with an alpha channel, serialized as `[r, g, b, a]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[inline] pub fn rgb(self) -> Rgb { Rgb { r: self.r, g: self.g, b: self.b } }

    /// Alpha as an opacity in [0, 1].
    #[inline] pub fn opacity(self) -> f64 { self.a as f64 / 255.0 }

    #[inline] pub fn to_array(self) -> [u8; 4] { [self.r, self.g, self.b, self.a] }
}

/// Sequential blues, light to dark; class `i` gets entry `i`.
pub const PALETTE: [Rgb; 5] = [
    Rgb { r: 239, g: 243, b: 255 },
    Rgb { r: 189, g: 215, b: 231 },
    Rgb { r: 107, g: 174, b: 214 },
    Rgb { r:  49, g: 130, b: 189 },
    Rgb { r:   8, g:  81, b: 156 },
];

/// Alpha of every data class.
pub const DATA_ALPHA: u8 = 180;

/// Regions without a value: light gray, more transparent than any data class.
pub const NO_DATA: Rgba = Rgb { r: 230, g: 230, b: 230 }.with_alpha(160);

/// Shown in labels in place of a missing value.
pub const NO_DATA_LABEL: &str = "N/A";

/// Quantile breakpoints paired with the palette entries of their classes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassScheme {
    breaks: Vec<f64>,
    palette: Vec<Rgb>,
}

impl Default for ClassScheme {
    fn default() -> Self { Self::new(DEFAULT_BREAKS.to_vec(), PALETTE.len()) }
}

impl ClassScheme {
    /// Use `breaks` with `classes` palette entries (see [`class_palette`]).
    pub fn new(breaks: Vec<f64>, classes: usize) -> Self {
        Self { breaks, palette: class_palette(classes) }
    }

    /// Classify `values` into `classes` quantile classes.
    pub fn from_values(values: &[f64], classes: usize) -> Self {
        let classes = classes.clamp(1, PALETTE.len());
        let breaks = quantiles(values, classes);
        tracing::debug!(?breaks, "quantile breakpoints");
        Self::new(breaks, classes)
    }

    #[inline] pub fn breaks(&self) -> &[f64] { &self.breaks }

    #[inline] pub fn palette(&self) -> &[Rgb] { &self.palette }

    /// Lowest class `i` with `breaks[i] <= v <= breaks[i + 1]`.
    ///
    /// Both interval ends are inclusive and the scan runs upward, so a value sitting
    /// exactly on an interior breakpoint lands in the lower of its two classes.
    pub fn class_of(&self, value: f64) -> Option<usize> {
        self.breaks.windows(2)
            .take(self.palette.len())
            .position(|w| w[0] <= value && value <= w[1])
    }

    /// Fill color for a region value. Values outside every class take the last
    /// class's color; missing values take [`NO_DATA`].
    pub fn color_for(&self, value: Option<f64>) -> Rgba {
        let Some(value) = value else { return NO_DATA };
        let palette = &self.palette;
        let color = self.class_of(value)
            .map(|i| palette[i])
            .unwrap_or(palette[palette.len() - 1]);
        color.with_alpha(DATA_ALPHA)
    }
}

/// `classes` palette entries spread evenly from the lightest to the darkest.
pub fn class_palette(classes: usize) -> Vec<Rgb> {
    match classes.clamp(1, PALETTE.len()) {
        1 => vec![PALETTE[PALETTE.len() - 1]],
        k => (0..k).map(|i| PALETTE[i * (PALETTE.len() - 1) / (k - 1)]).collect(),
    }
}

/// Tooltip text: `"{geo_key}: {region_id}<br>{metric}: {value}"`.
pub fn label_for(geo_key: &str, region_id: &str, metric: &str, value: Option<f64>) -> String {
    let value = value.map_or_else(|| NO_DATA_LABEL.to_string(), format_value);
    format!("{geo_key}: {region_id}<br>{metric}: {value}")
}

/// Shortest round-trip decimal, always with a fractional part (`100.0`, `12.5`).
pub fn format_value(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme() -> ClassScheme {
        ClassScheme::from_values(&[100.0, 200.0, 300.0], 5)
    }

    #[test]
    fn missing_value_is_no_data_regardless_of_breaks() {
        assert_eq!(scheme().color_for(None), NO_DATA);
        assert_eq!(ClassScheme::default().color_for(None), NO_DATA);
        assert!(NO_DATA.a < DATA_ALPHA);
    }

    #[test]
    fn interior_values_take_their_class() {
        let s = scheme(); // [100, 140, 180, 220, 260, 300]
        assert_eq!(s.color_for(Some(120.0)), PALETTE[0].with_alpha(DATA_ALPHA));
        assert_eq!(s.color_for(Some(150.0)), PALETTE[1].with_alpha(DATA_ALPHA));
        assert_eq!(s.color_for(Some(299.0)), PALETTE[4].with_alpha(DATA_ALPHA));
    }

    #[test]
    fn breakpoint_values_take_the_lower_class() {
        let s = ClassScheme::new(vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0], 5);
        assert_eq!(s.class_of(0.0), Some(0));
        assert_eq!(s.class_of(10.0), Some(0));
        assert_eq!(s.class_of(20.0), Some(1));
        assert_eq!(s.class_of(40.0), Some(3));
        assert_eq!(s.class_of(50.0), Some(4));
        assert_eq!(s.color_for(Some(30.0)), PALETTE[2].with_alpha(DATA_ALPHA));
    }

    #[test]
    fn out_of_range_values_take_the_last_color() {
        let s = ClassScheme::new(vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0], 5);
        assert_eq!(s.class_of(-1.0), None);
        assert_eq!(s.color_for(Some(-1.0)), PALETTE[4].with_alpha(DATA_ALPHA));
        assert_eq!(s.color_for(Some(50.5)), PALETTE[4].with_alpha(DATA_ALPHA));
    }

    #[test]
    fn repeated_breakpoints_pick_first_class() {
        let s = ClassScheme::from_values(&[7.0], 5);
        assert_eq!(s.class_of(7.0), Some(0));
    }

    #[test]
    fn fewer_classes_spread_the_palette() {
        assert_eq!(class_palette(5), PALETTE.to_vec());
        assert_eq!(class_palette(3), vec![PALETTE[0], PALETTE[2], PALETTE[4]]);
        assert_eq!(class_palette(2), vec![PALETTE[0], PALETTE[4]]);
        assert_eq!(class_palette(1), vec![PALETTE[4]]);
        assert_eq!(class_palette(9).len(), 5);
    }

    #[test]
    fn labels_embed_key_region_metric_and_value() {
        assert_eq!(label_for("DPTO_CCDGO", "05", "POP", Some(100.0)), "DPTO_CCDGO: 05<br>POP: 100.0");
        assert_eq!(label_for("DPTO_CCDGO", "05", "POP", Some(12.5)), "DPTO_CCDGO: 05<br>POP: 12.5");
        assert_eq!(label_for("DPTO_CCDGO", "99", "POP", None), "DPTO_CCDGO: 99<br>POP: N/A");
    }

    #[test]
    fn css_formatting() {
        assert_eq!(PALETTE[4].to_string(), "rgb(8,81,156)");
        assert_eq!(NO_DATA.to_array(), [230, 230, 230, 160]);
    }
}
