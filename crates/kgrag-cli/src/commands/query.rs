//! Answer a question from the command line.

use anyhow::Result;
use colored::Colorize;
use kgrag_rag::{Strategy, NO_RELEVANT_INFORMATION};
use std::time::Instant;

use crate::config::Config;
use crate::setup;

pub fn run(config: &Config, question: &str, top_k: Option<usize>, strategy: Option<Strategy>) -> Result<()> {
    let top_k = top_k.unwrap_or(config.retrieval.top_k);
    let strategy = strategy.unwrap_or(config.retrieval.strategy);

    let (graph, _) = setup::graph(&config.graph.data_file)?;
    let embedder = setup::embedder(&config.embedding)?;
    let engine = setup::engine(config, embedder.clone(), graph)?;

    let started = Instant::now();
    let answers = setup::runtime()?.block_on(async {
        if strategy == Strategy::Precomputed {
            engine.build_index().await?;
        }
        engine.query(question, top_k, strategy).await
    })?;

    println!(
        "{} {} ({}, k={}):",
        "→".blue(),
        question.cyan().bold(),
        strategy,
        top_k
    );
    println!();

    if answers.len() == 1 && answers[0] == NO_RELEVANT_INFORMATION {
        println!("  {} {}", "•".yellow(), NO_RELEVANT_INFORMATION);
    } else {
        for (i, answer) in answers.iter().enumerate() {
            let rank = format!("{}.", i + 1);
            println!("  {} {}", rank.blue(), answer);
        }
    }

    println!();
    println!(
        "{} {:.2}s",
        "✓".green(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
