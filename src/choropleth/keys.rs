use std::fmt;

/// How a join key was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// Geometry property found in the candidate list.
    Candidate,
    /// Table column named exactly like the geometry key.
    Exact,
    /// Table column equal to the geometry key ignoring case.
    CaseInsensitive,
    /// First property / first column, nothing matched.
    Fallback,
    /// Nothing to choose from; the name is a placeholder.
    Placeholder,
}

impl KeyMatch {
    #[inline] pub fn is_fallback(self) -> bool { matches!(self, Self::Fallback | Self::Placeholder) }
}

impl fmt::Display for KeyMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Candidate => "candidate",
            Self::Exact => "exact",
            Self::CaseInsensitive => "case-insensitive",
            Self::Fallback => "fallback",
            Self::Placeholder => "placeholder",
        })
    }
}

/// The property name (geometry side) and column name (table side) used to join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResolution {
    pub geo_key: String,
    pub geo_match: KeyMatch,
    pub data_key: String,
    pub data_match: KeyMatch,
}

impl KeyResolution {
    /// True when either side was picked positionally rather than by name.
    pub fn used_fallback(&self) -> bool {
        self.geo_match.is_fallback() || self.data_match.is_fallback()
    }
}

/// Pick the join keys.
///
/// Geometry: the first name of `candidates` present among `geo_properties`, else the
/// first property. Table: the column equal to the geometry key (case-sensitive, then
/// case-insensitive), else the first column. Never fails; with nothing to pick from the
/// names degrade to placeholders (first candidate, then the geometry key).
pub fn resolve_keys<'a>(
    geo_properties: impl IntoIterator<Item = &'a str>,
    columns: &[String],
    candidates: &[String],
) -> KeyResolution {
    let properties = geo_properties.into_iter().collect::<Vec<_>>();

    let (geo_key, geo_match) = candidates.iter()
        .find(|c| properties.contains(&c.as_str()))
        .map(|c| (c.clone(), KeyMatch::Candidate))
        .or_else(|| properties.first().map(|p| (p.to_string(), KeyMatch::Fallback)))
        .unwrap_or_else(|| (candidates.first().cloned().unwrap_or_default(), KeyMatch::Placeholder));

    let (data_key, data_match) = columns.iter()
        .find(|c| **c == geo_key)
        .map(|c| (c.clone(), KeyMatch::Exact))
        .or_else(|| columns.iter()
            .find(|c| c.to_lowercase() == geo_key.to_lowercase())
            .map(|c| (c.clone(), KeyMatch::CaseInsensitive)))
        .or_else(|| columns.first().map(|c| (c.clone(), KeyMatch::Fallback)))
        .unwrap_or_else(|| (geo_key.clone(), KeyMatch::Placeholder));

    let resolution = KeyResolution { geo_key, geo_match, data_key, data_match };
    if resolution.used_fallback() {
        tracing::warn!(
            geo_key = %resolution.geo_key, geo_match = %resolution.geo_match,
            data_key = %resolution.data_key, data_match = %resolution.data_match,
            "join key resolved by fallback; regions may not match"
        );
    }
    resolution
}
