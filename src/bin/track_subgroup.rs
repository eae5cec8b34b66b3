//! Track a Subgroup Through its Merger Tree
//!
//! Usage:
//!   track-subgroup catalogue.json --snapshot 28 --subgroup 0 -p Mass -p position
//!
//! Prints the merged track (descendants, then main progenitors) with the
//! time axis, reports where the track first breaks, then each requested
//! property along the track.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use eagle_database::{open_json, Catalogue, CatalogueLayout, Evolution, Property, Result};

#[derive(Parser, Debug)]
#[command(name = "track-subgroup")]
#[command(about = "Rebuild the evolutionary track of one subgroup")]
#[command(version)]
struct Args {
    /// JSON catalogue container
    catalogue: PathBuf,

    /// Snapshot the subgroup is selected at (defaults to the last one)
    #[arg(short, long)]
    snapshot: Option<i64>,

    /// Position of the subgroup among that snapshot's rows
    #[arg(short = 'n', long, default_value_t = 0)]
    subgroup: usize,

    /// JSON file overriding column and attribute names
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Property to follow along the track (repeatable)
    #[arg(short, long = "property")]
    properties: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eagle_database=info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let layout = match &args.layout {
        Some(path) => CatalogueLayout::from_json_path(path)?,
        None => CatalogueLayout::default(),
    };
    let catalogue = Catalogue::with_layout(open_json(&args.catalogue)?, layout)?;

    let snapshot = match args.snapshot {
        Some(snapshot) => snapshot,
        None => catalogue.last_snapshot()?,
    };

    let mut subgroup = catalogue.track_subgroup(args.subgroup, snapshot)?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  Subgroup {} at snapshot {}", args.subgroup, snapshot);
    println!("═══════════════════════════════════════════════════════════════\n");

    println!("Identity:");
    println!("  GalaxyID    = {}", subgroup.galaxy_id());
    println!("  NodeIndex   = {}", subgroup.node_index());
    println!("  TopLeafID   = {}", subgroup.top_leaf_id());
    println!("  LastProgID  = {}", subgroup.last_progenitor_id());
    println!("  Progenitors = {}", subgroup.progenitor_ids().count().saturating_sub(1));
    println!();

    let redshift = subgroup.get_property_evolution(Property::Redshift)?.to_f64()?;
    let age = subgroup.get_property_evolution(Property::Age)?.to_f64()?;
    let track = subgroup.main_merger_tree().clone();

    println!("Track ({} entries, {} on the main branch):", track.len(), subgroup.main_progenitors().len());
    println!("  {:>4}  {:>10}  {:>7}  {:>16}  {:>8}  {:>8}", "k", "GalaxyID", "SnapNum", "NodeIndex", "z", "t [Gyr]");
    for (k, entry) in track.iter().enumerate() {
        let marker = if subgroup.break_index() == Some(k) { "  ← break" } else { "" };
        println!(
            "  {:>4}  {:>10}  {:>7}  {:>16}  {:>8.3}  {:>8.3}{}",
            k, entry.galaxy_id, entry.snapshot, entry.node_index, redshift[k], age[k], marker
        );
    }
    println!();

    match subgroup.last_resolved_snapshot() {
        Some(snap) => println!("Last resolved snapshot: {}", snap),
        None => println!("Track is unbroken"),
    }

    for name in &args.properties {
        println!("\n{}:", name);
        match subgroup.get_property_evolution(name.as_str())? {
            Evolution::Int(values) => {
                for (k, v) in values.iter().enumerate() {
                    println!("  {:>4}  {}", k, v);
                }
            }
            Evolution::Float(values) => {
                for (k, v) in values.iter().enumerate() {
                    println!("  {:>4}  {:.6e}", k, v);
                }
            }
            Evolution::Vector(values) => {
                for (k, row) in values.rows().into_iter().enumerate() {
                    println!("  {:>4}  ({:.4}, {:.4}, {:.4})", k, row[0], row[1], row[2]);
                }
            }
        }
    }

    Ok(())
}
