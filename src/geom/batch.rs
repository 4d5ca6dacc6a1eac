use log::{debug, warn};

use crate::{BatchConfig, Error, Footprint, FootprintConfig, GeoPoint, Result, geom::build_footprint_with};

/// Compact description of a set of footprint centroids.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchSpec {
    /// One footprint per centroid, no lateral offset.
    Explicit(Vec<GeoPoint>),
    /// `count` footprints fanned out sideways around `base`.
    Fan { base: GeoPoint, count: usize },
}

/// A centroid plus the cross-track offset to apply to its footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchEntry {
    pub centroid: GeoPoint,
    pub lateral_offset_m: f64,
}

/// Expand `spec` into the ordered sequence consumed by the footprint builder.
pub fn generate_footprints(spec: &BatchSpec, config: &BatchConfig) -> Vec<BatchEntry> {
    match spec {
        BatchSpec::Explicit(centroids) => centroids.iter()
            .map(|&centroid| BatchEntry { centroid, lateral_offset_m: 0.0 })
            .collect(),
        BatchSpec::Fan { base, count } => fan_offsets(*count, config.spacing_m)
            .map(|lateral_offset_m| BatchEntry { centroid: *base, lateral_offset_m })
            .collect(),
    }
}

/// Offsets `+s, -s, +2s, -2s, ...` for `i = 1..=count`, magnitude `s * ceil(i / 2)`.
pub fn fan_offsets(count: usize, spacing_m: f64) -> impl Iterator<Item = f64> {
    (1..=count).map(move |i| {
        let magnitude = spacing_m * i.div_ceil(2) as f64;
        if i % 2 == 1 { magnitude } else { -magnitude }
    })
}

/// Parse one `"lat, lon"` entry. `line` is 1-based and only used for error reporting.
pub fn parse_centroid(text: &str, line: usize) -> Result<GeoPoint> {
    let fields = text.split(',').map(str::trim).collect::<Vec<_>>();
    let [lat, lon] = fields[..] else {
        return Err(Error::MalformedInput {
            line,
            reason: format!("expected \"lat, lon\", found {} field(s) in {text:?}", fields.len()),
        })
    };
    parse_lat_lon(lat, lon, line)
}

/// Parse separate latitude and longitude fields into an in-range point.
pub fn parse_lat_lon(lat: &str, lon: &str, line: usize) -> Result<GeoPoint> {
    let malformed = |reason: String| Error::MalformedInput { line, reason };
    let parse = |field: &str, what: &str| field.trim().parse::<f64>()
        .map_err(|_| malformed(format!("{what} {field:?} is not a number")));

    GeoPoint::new(parse(lat, "latitude")?, parse(lon, "longitude")?)
        .map_err(|e| match e {
            Error::MalformedInput { reason, .. } => malformed(reason),
            other => other,
        })
}

/// Parse newline-separated centroids, one result per non-blank line, so a
/// malformed line is reported without discarding its siblings.
pub fn parse_centroids(text: &str) -> Vec<Result<GeoPoint>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_centroid(line, i + 1))
        .inspect(|result| if let Err(e) = result { warn!("[batch] {e}") })
        .collect()
}

/// Run the footprint builder over every entry.
pub fn build_batch(entries: &[BatchEntry], config: &FootprintConfig) -> Result<Vec<Footprint>> {
    config.validate()?;
    debug!("[batch] building {} footprint(s)", entries.len());
    entries.iter()
        .map(|entry| build_footprint_with(entry.centroid, entry.lateral_offset_m, config))
        .collect()
}
