//! CSV reading operations.

use std::{fs, io::Cursor, path::Path};

use anyhow::{Context, Result, bail};
use log::warn;
use polars::{frame::DataFrame, io::SerReader, prelude::{Column, CsvReadOptions, CsvReader}};

use crate::{NamedPoint, geom::parse_lat_lon};

const NAME_COLUMNS: [&str; 3] = ["name", "label", "id"];
const LAT_COLUMNS: [&str; 2] = ["lat", "latitude"];
const LON_COLUMNS: [&str; 4] = ["lon", "lng", "long", "longitude"];

/// Read name/lat/lon rows from a CSV file, one result per data row.
///
/// A row that fails to parse is returned as `Err` with the 1-based line number
/// its record starts on (the header is line 1, quoted line breaks and blank
/// lines are counted); it does not prevent the remaining rows from loading.
pub fn read_points_csv(path: &Path) -> Result<Vec<crate::Result<NamedPoint>>> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    read_points_csv_bytes(&bytes)
        .with_context(|| format!("[io::csv::read] Failed to read points from {}", path.display()))
}

/// Read name/lat/lon rows from CSV bytes.
pub fn read_points_csv_bytes(bytes: &[u8]) -> Result<Vec<crate::Result<NamedPoint>>> {
    // Every column as a string, so malformed numbers surface per row instead of failing the read.
    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0));

    let df = CsvReader::new(Cursor::new(bytes))
        .with_options(options)
        .finish()
        .context("[io::csv::read] Failed to parse CSV")?;

    let lines = record_lines(bytes);
    if lines.len() != df.height() {
        warn!("[io::csv::read] {} record(s) found by line scan but {} parsed, line numbers assume one line per row", lines.len(), df.height());
    }
    points_from_frame(&df, |row| lines.get(row).copied().unwrap_or(row + 2))
}

/// Starting line of every data record, skipping the header and blank lines.
/// Line breaks inside double-quoted fields do not start a new record.
fn record_lines(bytes: &[u8]) -> Vec<usize> {
    let mut starts = Vec::new();
    let (mut line, mut quoted, mut start) = (1, false, None);
    for &byte in bytes {
        if start.is_none() && byte != b'\n' && byte != b'\r' { start = Some(line) }
        match byte {
            b'"' => quoted = !quoted,
            b'\n' => {
                if !quoted { starts.extend(start.take()) }
                line += 1;
            }
            _ => {}
        }
    }
    starts.extend(start);
    starts.into_iter().skip(1).collect()
}

fn points_from_frame(df: &DataFrame, line_of: impl Fn(usize) -> usize) -> Result<Vec<crate::Result<NamedPoint>>> {
    let (Some(lat), Some(lon)) = (find_column(df, &LAT_COLUMNS), find_column(df, &LON_COLUMNS)) else {
        bail!("[io::csv::read] CSV must have latitude and longitude columns, found {:?}", df.get_column_names());
    };
    let name = find_column(df, &NAME_COLUMNS);

    let lats = lat.str()?;
    let lons = lon.str()?;
    let names = name.map(|column| column.str()).transpose()?;

    let points = (0..df.height())
        .map(|row| {
            let line = line_of(row);
            let point = parse_lat_lon(lats.get(row).unwrap_or(""), lons.get(row).unwrap_or(""), line)?;
            let name = names.and_then(|names| names.get(row))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map_or_else(|| format!("Point_{}", row + 1), str::to_string);
            Ok(NamedPoint { name, point })
        })
        .inspect(|result: &crate::Result<NamedPoint>| if let Err(e) = result { warn!("[io::csv::read] {e}") })
        .collect();

    Ok(points)
}

/// Case-insensitive lookup of the first column matching any alias.
fn find_column<'a>(df: &'a DataFrame, aliases: &[&str]) -> Option<&'a Column> {
    aliases.iter().find_map(|alias| {
        df.get_columns().iter()
            .find(|column| column.name().as_str().trim().eq_ignore_ascii_case(alias))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, GeoPoint};

    #[test]
    fn reads_named_points() {
        let csv = "Name,Latitude,Longitude\nNewcastle,54.9783,-1.6178\nLondon,51.5074,-0.1278\n";
        let points = read_points_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(points, vec![
            Ok(NamedPoint { name: "Newcastle".into(), point: GeoPoint::new_unchecked(54.9783, -1.6178) }),
            Ok(NamedPoint { name: "London".into(), point: GeoPoint::new_unchecked(51.5074, -0.1278) }),
        ]);
    }

    #[test]
    fn missing_names_are_numbered() {
        let points = read_points_csv_bytes(b"lat,lon\n1.0,2.0\n3.0,4.0\n").unwrap();
        assert_eq!(points[1].as_ref().unwrap().name, "Point_2");
    }

    #[test]
    fn bad_rows_are_reported_with_line_numbers() {
        let csv = "name,lat,lon\na,10,20\nb,north,20\nc,10,200\nd,11,21\n";
        let points = read_points_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(points.len(), 4);
        assert!(points[0].is_ok() && points[3].is_ok());
        assert!(matches!(points[1], Err(Error::MalformedInput { line: 3, .. })));
        assert!(matches!(points[2], Err(Error::MalformedInput { line: 4, .. })));
    }

    #[test]
    fn line_numbers_count_quoted_line_breaks() {
        let csv = "name,lat,lon\n\"Two\nlines\",10,20\nb,north,20\n";
        let points = read_points_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].as_ref().unwrap().name, "Two\nlines");
        assert!(matches!(points[1], Err(Error::MalformedInput { line: 4, .. })));
    }

    #[test]
    fn record_lines_skip_blank_lines() {
        assert_eq!(record_lines(b"lat,lon\r\n1,2\r\n\r\n3,4"), vec![2, 4]);
        assert_eq!(record_lines(b"lat,lon\n\"a\n\nb\",1\n5,6\n"), vec![2, 5]);
    }

    #[test]
    fn missing_coordinate_columns_fail_the_file() {
        assert!(read_points_csv_bytes(b"name,x,y\na,1,2\n").is_err());
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        fs::write(&path, "lat,lng\n-33.8688,151.2093\n").unwrap();
        let points = read_points_csv(&path).unwrap();
        assert_eq!(points[0].as_ref().unwrap().point, GeoPoint::new_unchecked(-33.8688, 151.2093));
    }
}
