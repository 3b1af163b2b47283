mod config;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use config::PipelineConfig;
use extract::{CohereClient, Extractor};
use ingest::{Chunker, ChunkerConfig, Fetcher};
use loader::GraphLoader;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let source = std::env::args()
        .nth(1)
        .context("usage: kg-pipeline <url-or-file>")?;
    let config = PipelineConfig::from_env()?;

    let chunker = Chunker::new(ChunkerConfig {
        max_chars: config.max_chars,
        overlap: config.overlap,
    })?;

    let chunks = if source.starts_with("http://") || source.starts_with("https://") {
        let fetcher = Fetcher::new(Duration::from_secs(30), ingest::DEFAULT_USER_AGENT);
        ingest::ingest_url(&fetcher, &chunker, &source).await?
    } else {
        ingest::ingest_file(&chunker, Path::new(&source)).await?
    };

    let client = CohereClient::new(config.cohere_api_key.clone(), config.cohere_model.clone());
    let extractor = Extractor::new(client);

    let mut entities = Vec::new();
    let mut relationships = Vec::new();
    let mut skipped = 0usize;

    for chunk in &chunks {
        match extractor
            .extract_chunk(chunk.chunk_id.clone(), chunk.doc_id.clone(), &chunk.text)
            .await
        {
            Ok(extracted) => {
                info!(
                    chunk = %chunk.chunk_id,
                    entities = extracted.extraction.entities.len(),
                    relationships = extracted.extraction.relationships.len(),
                    "chunk extracted"
                );
                entities.extend(extracted.extraction.entities);
                relationships.extend(extracted.extraction.relationships);
            }
            Err(e) => {
                // A bad chunk should not sink the document.
                warn!(chunk = %chunk.chunk_id, error = %e, "extraction failed, skipping chunk");
                if let Some(raw) = e.raw_output() {
                    warn!(chunk = %chunk.chunk_id, raw, "raw model output");
                }
                skipped += 1;
            }
        }
    }

    info!(
        chunks = chunks.len(),
        skipped,
        entities = entities.len(),
        relationships = relationships.len(),
        "extraction pass complete"
    );

    let resolved = resolve::resolve(
        &entities,
        &relationships,
        resolve::DEFAULT_SIMILARITY_THRESHOLD,
    );
    info!(
        canonical_entities = resolved.entities.len(),
        relationships = resolved.relationships.len(),
        "entity resolution complete"
    );

    let graph = GraphLoader::connect(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await?;
    graph.init_schema().await?;
    graph
        .load_graph(&resolved.entities, &resolved.relationships)
        .await?;

    let stats = graph.stats().await?;
    info!(
        entities = stats.entity_count,
        relationships = stats.relationship_count,
        "knowledge graph totals"
    );

    Ok(())
}
