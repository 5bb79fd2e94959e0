use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Quantile choropleth maps of regions (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "choromap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved join keys and the selectable metrics
    Metrics(SourceArgs),

    /// Annotate the regions by a metric and write the colored map
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Region boundaries (GeoJSON FeatureCollection)
    #[arg(value_hint = ValueHint::FilePath)]
    pub geometry: PathBuf,

    /// Attribute table (delimited text with a header row)
    #[arg(value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// JSON settings file (key candidates, default metrics, delimiter, classes)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Field separator of the attribute table, overriding the config
    #[arg(short, long)]
    pub delimiter: Option<char>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output annotated GeoJSON file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Metric column to color by (defaults to the detected default metric)
    #[arg(short, long)]
    pub metric: Option<String>,

    /// Also write a static SVG map here
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub svg: Option<PathBuf>,

    /// SVG width in pixels
    #[arg(long, default_value_t = 1200, value_parser = clap::value_parser!(u32).range(crate::choropleth::MIN_SVG_WIDTH as i64..))]
    pub width: u32,
}
