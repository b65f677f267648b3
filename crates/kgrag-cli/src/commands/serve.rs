//! Serve the HTTP API.

use anyhow::Result;
use colored::Colorize;
use kgrag_web::AppState;
use std::sync::Arc;

use crate::config::Config;
use crate::setup;

pub fn run(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);

    let (graph, _) = setup::graph(&config.graph.data_file)?;
    let embedder = setup::embedder(&config.embedding)?;
    let engine = Arc::new(setup::engine(config, embedder.clone(), graph.clone())?);
    let state = AppState::new(engine, graph).with_data_path(&config.graph.data_file);

    setup::runtime()?.block_on(async move {
        state.engine.build_index().await?;
        println!("{} Listening on http://{}", "→".blue(), addr.cyan());
        kgrag_web::serve(state, &addr).await
    })
}
