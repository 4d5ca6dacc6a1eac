use std::collections::BTreeMap;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// One input feature together with the classification written by
/// [`crate::infer_hierarchy`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonRecord {
    pub id: usize,
    /// Empty until named by the loader or by the hierarchy engine.
    pub name: String,
    /// Lon/lat geometry; `None` for features without usable geometry.
    pub geometry: Option<MultiPolygon<f64>>,
    /// Passthrough attributes from the source file.
    pub properties: BTreeMap<String, String>,

    // Written by the hierarchy engine only.
    pub area: f64,
    pub parent_name: Option<String>,
    pub is_top_level: bool,
    pub depth: usize,
    pub overlap_ratio: Option<f64>,
}

impl PolygonRecord {
    pub fn new(id: usize, name: impl Into<String>, geometry: Option<MultiPolygon<f64>>) -> Self {
        Self { id, name: name.into(), geometry, is_top_level: true, ..Default::default() }
    }

    /// Attach a passthrough attribute.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Operator decision for one record, keyed by record name in a [`Dataset`] edit map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordEdit {
    pub included: bool,
    pub rename: Option<String>,
}

impl Default for RecordEdit {
    fn default() -> Self { Self { included: true, rename: None } }
}

/// Ordered collection of records sharing one geodetic CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<PolygonRecord>,
    epsg: u32,
}

impl Dataset {
    /// Construct a dataset in WGS84 lon/lat (EPSG:4326).
    pub fn new(records: Vec<PolygonRecord>) -> Self {
        Self { records, epsg: 4326 }
    }

    pub fn with_epsg(records: Vec<PolygonRecord>, epsg: u32) -> Self {
        Self { records, epsg }
    }

    #[inline] pub fn epsg(&self) -> u32 { self.epsg }
    #[inline] pub fn len(&self) -> usize { self.records.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Filter and rename records according to operator decisions keyed by name.
    /// Records without an entry are kept unchanged. Parent references follow renames,
    /// and references to excluded parents are kept so the export stays faithful
    /// to the inferred hierarchy.
    pub fn apply_edits(&self, edits: &BTreeMap<String, RecordEdit>) -> Dataset {
        let renamed = |name: &str| -> String {
            edits.get(name)
                .and_then(|edit| edit.rename.clone())
                .filter(|rename| !rename.trim().is_empty())
                .unwrap_or_else(|| name.to_string())
        };

        let records = self.records.iter()
            .filter(|record| edits.get(&record.name).is_none_or(|edit| edit.included))
            .map(|record| PolygonRecord {
                name: renamed(&record.name),
                parent_name: record.parent_name.as_deref().map(renamed),
                ..record.clone()
            })
            .collect();

        Dataset { records, epsg: self.epsg }
    }
}
