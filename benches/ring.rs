//! Micro-benchmarks for Ring operations: add_node, assign, and remove_node
//! at varying ring sizes. Reports nanoseconds-per-operation.
//!
//! Run: `cargo bench --bench ring`

use std::time::Instant;

use slotring::{Ring, StorageNode};

const SIZES: [usize; 3] = [10, 1_000, 10_000];
const LOOKUPS: usize = 100_000;

fn main() {
    println!("ring\n");

    bench_add();
    bench_assign();
    bench_remove();
}

fn nodes(count: usize) -> Vec<StorageNode> {
    (0..count)
        .map(|i| {
            let host = format!("10.{}.{}.{}", i >> 16, (i >> 8) & 0xff, i & 0xff);
            StorageNode::new(format!("node-{i}"), host)
        })
        .collect()
}

fn filled(nodes: &[StorageNode]) -> Ring {
    let mut ring = Ring::new(u64::MAX).unwrap();
    for node in nodes {
        ring.add_node(node.clone()).unwrap();
    }
    ring
}

fn bench_add() {
    println!("add_node");

    for size in SIZES {
        let nodes = nodes(size);
        let mut ring = Ring::new(u64::MAX).unwrap();

        let start = Instant::now();
        for node in nodes.iter().cloned() {
            ring.add_node(node).unwrap();
        }
        let per_op = start.elapsed().as_nanos() / size as u128;

        println!("{size:>6} nodes: {per_op}ns/op");
    }
}

fn bench_assign() {
    println!("\nassign");

    let keys: Vec<String> = (0..LOOKUPS).map(|i| format!("key-{i}")).collect();

    for size in SIZES {
        let ring = filled(&nodes(size));

        let start = Instant::now();
        for key in &keys {
            std::hint::black_box(ring.assign(key).unwrap());
        }
        let per_op = start.elapsed().as_nanos() / LOOKUPS as u128;

        println!("{size:>6} nodes: {per_op}ns/op");
    }
}

fn bench_remove() {
    println!("\nremove_node");

    for size in SIZES {
        let nodes = nodes(size);
        let mut ring = filled(&nodes);

        let start = Instant::now();
        for node in &nodes {
            ring.remove_node(node).unwrap();
        }
        let per_op = start.elapsed().as_nanos() / size as u128;

        println!("{size:>6} nodes: {per_op}ns/op");
    }
}
