#![warn(clippy::all, clippy::pedantic)]

use std::error::Error;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use csv::{ReaderBuilder, Writer};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use trustflow::{find_transitive_transfer, TransferStep, TrustEdge, TrustGraph};

/// Computes a transitive token transfer over a trust network loaded from
/// CSV.
#[derive(Parser)]
#[command(name = "trustflow-cli", version, about)]
struct Args {
    /// CSV file with one `from,to,token,capacity` row per trust relation
    #[arg(long)]
    graph: PathBuf,

    /// Sending account
    #[arg(long)]
    from: String,

    /// Receiving account
    #[arg(long)]
    to: String,

    /// Value to transfer
    #[arg(long)]
    value: u64,

    /// Write the transfer plan to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// Rows carry no header line, matching the network dumps this tool consumes.
fn read_trust_csv(filepath: &Path) -> Result<Vec<TrustEdge<String, u64>>, Box<dyn Error>> {
    let file = File::open(filepath)?;
    let mut rdr = ReaderBuilder::new().has_headers(false).from_reader(file);
    let rows: Result<Vec<TrustEdge<String, u64>>, _> = rdr.deserialize().collect();
    Ok(rows?)
}

fn infer_nodes(edges: &[TrustEdge<String, u64>]) -> Vec<String> {
    let mut nodes = Vec::new();
    for edge in edges {
        for node in [edge.from(), edge.to(), edge.token()] {
            if !nodes.contains(node) {
                nodes.push(node.clone());
            }
        }
    }
    nodes
}

// Function to write the transfer plan
fn write_steps_csv<W: io::Write>(
    steps: &[TransferStep<String, u64>],
    writer: W,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["step", "from", "to", "token", "value"])?;
    for step in steps {
        wtr.write_record([
            &step.step.to_string(),
            &step.from,
            &step.to,
            &step.token,
            &step.value.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let edges = read_trust_csv(&args.graph)?;
    let nodes = infer_nodes(&edges);
    let graph = TrustGraph::new(nodes, edges)?;

    let result = find_transitive_transfer(&graph, &args.from, &args.to, args.value)?;

    log::info!(
        "{} -> {}: max flow {}, transfer value {}, {} steps",
        result.from,
        result.to,
        result.max_flow_value,
        result.transfer_value,
        result.transfer_steps.len()
    );

    match args.output {
        Some(path) => write_steps_csv(&result.transfer_steps, File::create(path)?)?,
        None => write_steps_csv(&result.transfer_steps, io::stdout())?,
    }

    Ok(())
}
