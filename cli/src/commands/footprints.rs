use std::fs;

use anyhow::{Context, Result, bail};
use imaging_areas::{
    BatchSpec, GeoPoint, build_batch, generate_footprints,
    io::{prepare_output, read_points_csv, write_footprints},
    parse_centroid, parse_centroids,
};
use log::info;

use crate::cli::{Cli, FootprintsArgs};

/// Parse "LAT,LON,COUNT".
fn parse_fan(text: &str) -> Result<(GeoPoint, usize)> {
    let (centroid, count) = text.rsplit_once(',')
        .with_context(|| format!("[footprints] expected LAT,LON,COUNT, got {text:?}"))?;
    let count = count.trim().parse::<usize>()
        .with_context(|| format!("[footprints] fan count {count:?} is not a whole number"))?;
    Ok((parse_centroid(centroid, 1)?, count))
}

pub fn run(cli: &Cli, args: &FootprintsArgs) -> Result<()> {
    let mut config = crate::load_config(cli)?;
    if let Some(km) = args.length_km { config.footprint.length_m = km * 1000.0 }
    if let Some(km) = args.width_km { config.footprint.width_m = km * 1000.0 }
    if let Some(direction) = args.direction { config.footprint.direction = direction }
    if let Some(km) = args.spacing_km { config.batch.spacing_m = km * 1000.0 }
    config.validate()?;

    prepare_output(&args.out, cli.force)?;

    // Point names from a CSV become footprint names.
    let (spec, names) = if let Some(path) = &args.centroids {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[footprints] Failed to read centroid file: {}", path.display()))?;
        let points = parse_centroids(&text).into_iter().filter_map(|point| point.ok()).collect();
        (BatchSpec::Explicit(points), None)
    } else if let Some(path) = &args.csv {
        let points = super::valid_points(read_points_csv(path)?);
        let names = points.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
        (BatchSpec::Explicit(points.into_iter().map(|p| p.point).collect()), Some(names))
    } else if let Some(fan) = &args.fan {
        let (base, count) = parse_fan(fan)?;
        (BatchSpec::Fan { base, count }, None)
    } else {
        bail!("[footprints] one of --centroids, --csv or --fan is required")
    };

    let entries = generate_footprints(&spec, &config.batch);
    if entries.is_empty() {
        bail!("[footprints] no valid centroids to build footprints from")
    }

    let mut footprints = build_batch(&entries, &config.footprint)?;
    if let Some(names) = names {
        footprints = footprints.into_iter().zip(names)
            .map(|(footprint, name)| footprint.with_name(name))
            .collect();
    }

    info!("[footprints] built {} {} footprints of {} x {} m",
        footprints.len(), config.footprint.direction, config.footprint.length_m, config.footprint.width_m);
    write_footprints(&footprints, &args.out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_argument_splits_on_last_comma() {
        let (base, count) = parse_fan("51.5074, -0.1278, 10").unwrap();
        assert_eq!(count, 10);
        assert_eq!(base, GeoPoint::new(51.5074, -0.1278).unwrap());
    }

    #[test]
    fn malformed_fan_argument_is_rejected() {
        assert!(parse_fan("51.5").is_err());
        assert!(parse_fan("51.5,-0.1,many").is_err());
        assert!(parse_fan("91,0,3").is_err());
    }
}
