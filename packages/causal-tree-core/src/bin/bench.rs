use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use causal_tree_core::{CausalTree, Id};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(serde::Serialize)]
struct Output {
    implementation: &'static str,
    workload: String,
    timestamp: String,
    name: String,
    total_ops: u64,
    duration_ms: f64,
    ops_per_sec: f64,
    extra: Extra,
    source_file: Option<String>,
}

#[derive(serde::Serialize)]
struct Extra {
    count: u64,
    replicas: u64,
    visible: usize,
}

/// Each replica types `count` characters after the shared prefix, deletes every tenth one, and
/// then every replica merges every other one.
fn run(count: u64, replicas: u64) -> causal_tree_core::Result<(CausalTree<char>, u64)> {
    let mut seed = CausalTree::new(0);
    let prefix = seed.add_sequence(None, "shared prefix ".chars())?;

    let mut trees: Vec<CausalTree<char>> = Vec::new();
    for entity in 1..=replicas {
        let mut tree = CausalTree::new(entity);
        tree.merge(&seed)?;
        let mut last: Option<Id> = prefix;
        for i in 0..count {
            let id = tree.add_node(last, char::from(b'a' + (i % 26) as u8))?;
            if i % 10 == 9 {
                tree.remove_node(id);
            }
            last = Some(id);
        }
        trees.push(tree);
    }

    let mut merges = 0;
    for dst in 0..trees.len() {
        for src in 0..trees.len() {
            if dst == src {
                continue;
            }
            let source = trees[src].clone();
            trees[dst].merge(&source)?;
            merges += 1;
        }
    }
    let ops = count * replicas + merges;
    Ok((trees.swap_remove(0), ops))
}

fn main() -> causal_tree_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut count: u64 = 200;
    let mut replicas: u64 = 2;
    let mut out_file: Option<PathBuf> = None;
    for arg in env::args().skip(1) {
        if let Some(val) = arg.strip_prefix("--count=") {
            count = val.parse().unwrap_or(count);
        } else if let Some(val) = arg.strip_prefix("--replicas=") {
            replicas = val.parse().unwrap_or(replicas).max(1);
        } else if let Some(val) = arg.strip_prefix("--out=") {
            out_file = Some(PathBuf::from(val));
        }
    }

    let start = Instant::now();
    let (tree, total_ops) = run(count, replicas)?;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(count, replicas, duration_ms, "benchmark finished");

    let workload = format!("type-merge-{}x{}", replicas, count);
    let output = Output {
        implementation: "causal-tree-core",
        workload: workload.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        name: workload,
        total_ops,
        duration_ms,
        ops_per_sec: if duration_ms > 0.0 {
            total_ops as f64 / duration_ms * 1000.0
        } else {
            f64::INFINITY
        },
        extra: Extra {
            count,
            replicas,
            visible: tree.visible_len(),
        },
        source_file: out_file.as_ref().map(|p| p.display().to_string()),
    };

    let json = serde_json::to_string_pretty(&output).expect("serialize");
    if let Some(path) = out_file {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdirs");
        }
        fs::write(&path, &json).expect("write output");
    }
    println!("{}", json);
    Ok(())
}
