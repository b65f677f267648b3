//! Load records and build the index once, reporting what went in.

use anyhow::Result;
use colored::Colorize;
use kgrag_core::GraphReader;
use std::path::PathBuf;

use crate::config::Config;
use crate::setup;

pub fn run(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(|| config.graph.data_file.clone());
    let (graph, load) = setup::graph(&path)?;

    println!("{} Loaded {}", "→".blue(), path.display());
    println!(
        "  nodes merged: {}  edges merged: {}",
        load.nodes_merged.to_string().cyan(),
        load.edges_merged.to_string().cyan()
    );
    if load.entities_skipped + load.edges_skipped > 0 {
        println!(
            "  {} skipped {} entities without id, {} relationships with a missing endpoint",
            "•".yellow(),
            load.entities_skipped,
            load.edges_skipped
        );
    }
    println!(
        "  graph: {} nodes, {} edges",
        graph.node_count()?,
        graph.edge_count()?
    );

    let embedder = setup::embedder(&config.embedding)?;
    let engine = setup::engine(config, embedder.clone(), graph)?;
    let snapshot = setup::runtime()?.block_on(engine.build_index())?;
    let report = snapshot.catalog.report();

    println!();
    println!(
        "{} Indexed {} of {} nodes with {} ({} dims) in {} ms",
        "✓".green(),
        report.indexed.to_string().cyan(),
        report.scanned,
        snapshot.catalog.model().cyan(),
        snapshot.catalog.dimension(),
        snapshot.build_time.as_millis()
    );
    if report.skipped_untextual > 0 {
        println!("  {} {} nodes have no text", "•".yellow(), report.skipped_untextual);
    }
    if report.failed > 0 {
        println!("  {} {} embeddings failed", "✗".red(), report.failed);
    }

    Ok(())
}
