use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use imaging_areas::{
    RecordEdit,
    io::{prepare_output, read_dataset, write_dataset},
};
use log::info;

use crate::cli::{Cli, HierarchyArgs};

fn read_edits(path: &Path) -> Result<BTreeMap<String, RecordEdit>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("[hierarchy] Failed to read edits file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("[hierarchy] Invalid edits file: {}", path.display()))
}

pub fn run(cli: &Cli, args: &HierarchyArgs) -> Result<()> {
    let mut config = crate::load_config(cli)?.hierarchy;
    if let Some(buffer) = args.buffer { config.buffer_tolerance = buffer }
    if let Some(ratio) = args.min_overlap { config.min_overlap_ratio = ratio }
    if args.metric { config.project_to_metric = true }
    config.validate()?;

    prepare_output(&args.out, cli.force)?;

    let dataset = read_dataset(&args.input)?.infer_hierarchy(&config)?;

    let dataset = match &args.edits {
        Some(path) => dataset.apply_edits(&read_edits(path)?),
        None => dataset,
    };

    let top_level = dataset.records.iter().filter(|r| r.is_top_level).count();
    info!("[hierarchy] {} records, {} top-level", dataset.len(), top_level);

    write_dataset(&dataset, &args.out)
}
