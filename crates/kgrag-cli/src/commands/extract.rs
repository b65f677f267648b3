//! Extract graph records from raw text or a PDF.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use kgrag_core::StructuredData;
use kgrag_embeddings::LineChunker;
use kgrag_llm::LlmBackend;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::Config;
use crate::pdf::{self, PageRange};
use crate::setup;

pub fn run(
    config: &Config,
    input: Option<PathBuf>,
    pages: PageRange,
    output: Option<PathBuf>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| config.graph.input_file.clone());
    let output = output.unwrap_or_else(|| config.graph.data_file.clone());

    let text = read_source(&input, pages)?;
    let chunks = LineChunker::new(config.graph.chunk_size).chunk(&text);
    if chunks.is_empty() {
        bail!("{} is empty", input.display());
    }

    let backend = setup::backend(&config.llm)?;
    println!(
        "{} Extracting from {} chunks with {}...",
        "→".blue(),
        chunks.len(),
        backend.name().cyan()
    );

    let texts: Vec<String> = chunks.into_iter().map(|c| c.text).collect();
    let data = setup::runtime()?.block_on(extract_chunks(backend.as_ref(), &texts));

    if data.is_empty() {
        bail!("No records extracted from {}", input.display());
    }

    std::fs::write(&output, data.to_json_pretty()?)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} {} entities, {} relationships -> {}",
        "✓".green(),
        data.entities.len().to_string().cyan(),
        data.relationships.len().to_string().cyan(),
        output.display()
    );
    Ok(())
}

fn read_source(input: &Path, pages: PageRange) -> Result<String> {
    if pdf::is_pdf(input) {
        let text = pdf::extract_text(input, pages)?;
        println!(
            "{} Read {} characters from {}",
            "→".blue(),
            text.chars().count(),
            input.display()
        );
        return Ok(text);
    }

    if pages != PageRange::default() {
        warn!(input = %input.display(), "Page range ignored for non-PDF input");
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

/// Run extraction chunk by chunk, namespacing each chunk's ids.
///
/// A chunk whose response cannot be parsed is skipped.
pub async fn extract_chunks(backend: &dyn LlmBackend, chunks: &[String]) -> StructuredData {
    let mut all = StructuredData::new();
    for (i, chunk) in chunks.iter().enumerate() {
        println!("  Processing chunk {}/{}...", i + 1, chunks.len());
        match backend.extract(chunk).await {
            Ok(data) => all.merge(data.namespaced(&format!("c{i}-"))),
            Err(e) => warn!(chunk = i, error = %e, "Extraction failed, chunk skipped"),
        }
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgrag_llm::MockBackend;

    #[test]
    fn chunks_are_namespaced_and_failures_skipped() {
        let backend = MockBackend::new()
            .with_response(
                "Zanzibar",
                r#"{"entities": [{"id": "1", "name": "Zanzibar"}, {"id": "2", "name": "Clove trade"}],
                    "relationships": [{"from": "1", "to": "2", "type": "affected_by"}]}"#,
            )
            .with_response(
                "Quokka",
                "```json\n{\"entities\": [{\"id\": \"1\", \"name\": \"Quokka\"}]}\n```",
            );
        let chunks = vec![
            "Zanzibar and the clove trade".to_string(),
            "nothing to see".to_string(),
            "Quokka island".to_string(),
        ];

        let runtime = setup::runtime().unwrap();
        let data = runtime.block_on(extract_chunks(&backend, &chunks));

        let ids: Vec<&str> = data.entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c0-1", "c0-2", "c2-1"]);
        assert_eq!(data.relationships[0].from, "c0-1");
        assert_eq!(data.relationships[0].to, "c0-2");
    }
}
