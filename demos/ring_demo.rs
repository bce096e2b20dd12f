//! Walk through a ring's life: three nodes join, keys are assigned, a fourth
//! node joins and one of the first three leaves. Prints which arc of keys
//! each change hands over, and how evenly the keys spread over the nodes.

use std::collections::HashMap;

use clap::Parser;
use histo::Histogram;
use slotring::{Migration, Result, Ring, StorageNode, DEFAULT_TOTAL_SLOTS};
use tracing::Level;

const DEFAULT_KEYS: usize = 10_000;

#[derive(Parser)]
struct Cli {
    /// Size of the ring's modular space
    #[arg(short, long, default_value_t = DEFAULT_TOTAL_SLOTS)]
    total_slots: u64,
    /// Number of synthetic keys to place
    #[arg(short, long, default_value_t = DEFAULT_KEYS)]
    keys: usize,
    /// Log every ring mutation
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(error) = run(cli.total_slots, cli.keys) {
        eprintln!("ring_demo: {error}");
        std::process::exit(1);
    }
}

fn run(total_slots: u64, key_count: usize) -> Result<()> {
    let mut ring = Ring::new(total_slots)?;

    let a = StorageNode::new("A", "10.0.0.1");
    let b = StorageNode::new("B", "10.0.0.2");
    let c = StorageNode::new("C", "10.0.0.3");
    let d = StorageNode::new("D", "10.0.0.4");

    for node in [&a, &b, &c] {
        let position = ring.add_node(node.clone())?;
        println!("{node} joined at {position}");
    }

    println!("K1 -> {}", ring.assign("K1")?);
    println!("K2 -> {}", ring.assign("K2")?);

    let keys: Vec<String> = (0..key_count).map(|i| format!("key-{i}")).collect();
    print_load(&ring, &keys);

    let before = ring.clone();
    let migration = ring.add_node_with_migration(d)?;
    print_migration("join", &migration, ring.total_slots());
    print_moves(&before, &ring, &keys);

    println!("K1 -> {}", ring.assign("K1")?);
    println!("K2 -> {}", ring.assign("K2")?);

    let before = ring.clone();
    let migration = ring.remove_node_with_migration(&b)?;
    print_migration("leave", &migration, ring.total_slots());
    print_moves(&before, &ring, &keys);

    print_load(&ring, &keys);

    match ring.remove_node(&b) {
        Ok(_) => println!("{b} was removed twice?!"),
        Err(error) => println!("removing {b} again: {error}"),
    }

    Ok(())
}

fn print_migration(event: &str, migration: &Migration, total_slots: u64) {
    let from = migration
        .from
        .as_ref()
        .map_or("nobody".to_string(), |n| n.to_string());
    let to = migration
        .to
        .as_ref()
        .map_or("nobody".to_string(), |n| n.to_string());

    println!(
        "\n{event}: keys in {} ({:.2}% of the ring) move from {from} to {to}",
        migration.arc,
        migration.arc.len(total_slots) as f64 * 100.0 / total_slots as f64,
    );
}

fn print_moves(before: &Ring, after: &Ring, keys: &[String]) {
    let moves = Ring::diff(before, after, keys.iter().map(String::as_str));

    println!(
        "{} of {} keys changed owner ({:.2}%)",
        moves.len(),
        keys.len(),
        moves.len() as f64 * 100.0 / keys.len().max(1) as f64
    );
}

fn print_load(ring: &Ring, keys: &[String]) {
    let mut load: HashMap<&StorageNode, u64> = ring.nodes().map(|n| (n, 0)).collect();

    for key in keys {
        if let Ok(owner) = ring.assign(key) {
            *load.entry(owner).or_default() += 1;
        }
    }

    let mut histogram = Histogram::with_buckets(5);

    println!("\nKeys per node:");
    for node in ring.nodes() {
        let count = load.get(node).copied().unwrap_or_default();
        histogram.add(count);

        println!("  {node}: {count}");
    }

    println!("{histogram}");
}
