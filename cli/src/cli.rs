use std::path::PathBuf;

use imaging_areas::Direction;

/// Satellite imaging footprint and field hierarchy CLI
#[derive(clap::Parser, Debug)]
#[command(name = "imaging-areas", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON config file; command-line flags take precedence
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(short, long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate oriented imaging footprints (.kmz, .kml, .geojson, .shp, .csv)
    Footprints(FootprintsArgs),

    /// Infer the field/sub-field hierarchy of a polygon dataset
    Hierarchy(HierarchyArgs),

    /// Merge overlapping AOI squares around points of interest
    MergeAoi(MergeAoiArgs),
}

#[derive(clap::Args, Debug)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["centroids", "csv", "fan"])))]
pub struct FootprintsArgs {
    /// Text file with one "lat, lon" centroid per line
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub centroids: Option<PathBuf>,

    /// CSV file with name/lat/lon columns
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub csv: Option<PathBuf>,

    /// Fan out COUNT footprints sideways around one centroid, e.g. "51.5,-0.12,10"
    #[arg(long, value_name = "LAT,LON,COUNT")]
    pub fan: Option<String>,

    /// Output file; the format follows the extension
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub out: PathBuf,

    /// Footprint length along the ground track, in km
    #[arg(long)]
    pub length_km: Option<f64>,

    /// Footprint width across the ground track, in km
    #[arg(long)]
    pub width_km: Option<f64>,

    /// Pass direction: "NE->SW" (descending) or "SE->NW" (ascending)
    #[arg(short, long)]
    pub direction: Option<Direction>,

    /// Lateral spacing between fanned footprints, in km
    #[arg(long)]
    pub spacing_km: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct HierarchyArgs {
    /// Input polygon dataset (.geojson, .json or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output dataset (.geojson, .shp, .kml or .kmz)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub out: PathBuf,

    /// JSON object mapping record names to {"included": bool, "rename": "..."}
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub edits: Option<PathBuf>,

    /// Buffer applied to candidate parents
    #[arg(long)]
    pub buffer: Option<f64>,

    /// Minimum fraction of a child inside its parent, in [0, 1]
    #[arg(long)]
    pub min_overlap: Option<f64>,

    /// Measure in the local UTM zone (buffer in metres)
    #[arg(long)]
    pub metric: bool,
}

#[derive(clap::Args, Debug)]
pub struct MergeAoiArgs {
    /// CSV file with name/lat/lon columns
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub csv: PathBuf,

    /// Output regions (.geojson, .kml or .kmz)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub out: PathBuf,

    /// Side of the square drawn around each point, in km
    #[arg(long)]
    pub side_km: Option<f64>,
}
