use anyhow::Context;
use bisect_partition::io::{self, GraphFormat};
use bisect_partition::{PartitionDriver, PartitioningConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Csrrg,
    Bin,
    Metis,
}

impl From<Format> for GraphFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csrrg => GraphFormat::Csrrg,
            Format::Bin => GraphFormat::Binary,
            Format::Metis => GraphFormat::Metis,
        }
    }
}

/// Cut a graph into balanced, connected parts.
#[derive(Parser, Debug)]
struct Args {
    /// Graph file to partition.
    path: PathBuf,
    /// Input format. Guessed from the file extension when omitted.
    #[arg(long, value_enum)]
    format: Option<Format>,
    /// Number of cuts to attempt.
    #[arg(long, default_value_t = 1)]
    cuts: u32,
    /// Allowed size difference between the sides of a cut, in percent.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(0..=100))]
    margin: u32,
    /// Print the full outcome as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let format = match args.format {
        Some(format) => format.into(),
        None => GraphFormat::from_path(&args.path)
            .context("unknown graph format, pass --format")?,
    };
    let mut graph = io::load(&args.path, format)?;

    let t1 = time::Instant::now();
    let config = PartitioningConfig {
        num_cuts: args.cuts,
        margin_percent: args.margin,
    };
    let outcome = PartitionDriver::new(&mut graph, config)?.run();
    println!("time: {}ms", t1.elapsed().as_millis());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "cuts: {} of {}, removed edges: {}",
        outcome.successful_cuts(),
        outcome.cuts_requested(),
        outcome.cut_edge_count()
    );
    if let Some(last) = outcome.records().last() {
        let sizes = last
            .component_vertices()
            .values()
            .map(Vec::len)
            .collect::<Vec<_>>();
        println!(
            "components: {}, with sizes from {} to {}",
            last.total_components(),
            sizes.iter().min().unwrap_or(&0),
            sizes.iter().max().unwrap_or(&0)
        );
    }
    Ok(())
}
