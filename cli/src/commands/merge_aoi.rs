use anyhow::{Result, bail};
use imaging_areas::{
    io::{prepare_output, read_points_csv, write_regions},
    merge_points,
};
use log::info;

use crate::cli::{Cli, MergeAoiArgs};

pub fn run(cli: &Cli, args: &MergeAoiArgs) -> Result<()> {
    let mut config = crate::load_config(cli)?.aoi;
    if let Some(km) = args.side_km { config.side_m = km * 1000.0 }

    prepare_output(&args.out, cli.force)?;

    let points = super::valid_points(read_points_csv(&args.csv)?);
    if points.is_empty() {
        bail!("[merge-aoi] no valid points in {}", args.csv.display())
    }

    let names = points.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
    let centers = points.iter().map(|p| p.point).collect::<Vec<_>>();
    let regions = merge_points(&centers, config.side_m)?;

    info!("[merge-aoi] {} points merged into {} regions", points.len(), regions.len());
    write_regions(&regions, &names, &args.out)
}
