pub mod cache;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod retry;
pub mod schema;

pub use cache::ResponseCache;
pub use error::{ExtractError, Result};
pub use llm::CohereClient;
pub use retry::RetryPolicy;
pub use schema::{Entity, ExtractedChunk, ExtractionResult, Relationship};

use std::collections::HashSet;

use tracing::debug;

const DEFAULT_CACHE_ENTRIES: usize = 10_000;

pub struct Extractor {
    llm: CohereClient,
    retry: RetryPolicy,
    cache: ResponseCache,
}

impl Extractor {
    pub fn new(llm: CohereClient) -> Self {
        Self {
            llm,
            retry: RetryPolicy::default(),
            cache: ResponseCache::new(DEFAULT_CACHE_ENTRIES),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Extract entities and relationships from one block of text.
    pub async fn extract_from_text(&self, text: &str) -> Result<ExtractionResult> {
        let extraction_prompt = prompt::build_extraction_prompt(text);

        if let Some(hit) = self.cache.get(&extraction_prompt) {
            debug!("extraction served from cache");
            return parse_extraction(&hit);
        }

        let raw = self
            .retry
            .run("cohere chat", || self.llm.chat(&extraction_prompt))
            .await?;

        match parse_extraction(&raw) {
            Ok(result) => {
                self.cache.put(&extraction_prompt, raw);
                Ok(result)
            }
            Err(parse_err) => {
                // One in-band repair round before surfacing the raw output.
                debug!(error = %parse_err, "model output unparseable, requesting repair");
                let repair_prompt = prompt::build_repair_prompt(&raw);
                let repaired = self
                    .retry
                    .run("cohere repair", || self.llm.chat(&repair_prompt))
                    .await?;

                let result = parse_extraction(&repaired)?;
                self.cache.put(&extraction_prompt, repaired);
                Ok(result)
            }
        }
    }

    /// Extract from a chunk, namespacing entity IDs with the chunk ID so
    /// results from different chunks can be combined downstream.
    pub async fn extract_chunk(
        &self,
        chunk_id: String,
        doc_id: String,
        text: &str,
    ) -> Result<ExtractedChunk> {
        let extraction = self.extract_from_text(text).await?;
        let extraction = namespace_extraction(&chunk_id, extraction);

        Ok(ExtractedChunk {
            chunk_id,
            doc_id,
            extraction,
        })
    }
}

/// Parse a model response into an [`ExtractionResult`], tolerating markdown
/// fences and prose around the JSON object.
pub fn parse_extraction(raw: &str) -> Result<ExtractionResult> {
    let payload = json_payload(raw);

    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|_| ExtractError::MalformedOutput {
            raw: raw.to_string(),
        })?;

    serde_json::from_value(value).map_err(|source| ExtractError::SchemaMismatch {
        source,
        raw: raw.to_string(),
    })
}

/// The slice between the first `{` and the last `}`, if both exist. Models
/// wrap JSON in code fences or commentary often enough to make this
/// worthwhile before handing the payload to serde.
fn json_payload(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw.trim(),
    }
}

/// Prefix per-chunk entity IDs (`E1`, `E2`, ...) with the chunk ID, and drop
/// relationships that reference IDs the model never declared.
pub fn namespace_extraction(chunk_id: &str, mut extraction: ExtractionResult) -> ExtractionResult {
    let declared: HashSet<String> = extraction.entities.iter().map(|e| e.id.clone()).collect();

    let before = extraction.relationships.len();
    extraction
        .relationships
        .retain(|r| declared.contains(&r.source) && declared.contains(&r.target));
    let dropped = before - extraction.relationships.len();
    if dropped > 0 {
        debug!(
            chunk_id,
            dropped, "dropped relationships with undeclared endpoints"
        );
    }

    for entity in &mut extraction.entities {
        entity.id = format!("{chunk_id}:{}", entity.id);
    }
    for rel in &mut extraction.relationships {
        rel.source = format!("{chunk_id}:{}", rel.source);
        rel.target = format!("{chunk_id}:{}", rel.target);
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "entities": [
            {"id": "E1", "name": "Sherlock Holmes", "type": "PERSON"},
            {"id": "E2", "name": "Baker Street", "type": "LOCATION"}
        ],
        "relationships": [
            {"source": "E1", "relation": "lives_in", "target": "E2", "evidence_span": "Holmes of Baker Street"}
        ]
    }"#;

    #[test]
    fn parses_plain_json() {
        let result = parse_extraction(VALID).unwrap();
        assert_eq!(result.entities.len(), 2);
        assert_eq!(result.relationships.len(), 1);
        assert_eq!(result.entities[0].name, "Sherlock Holmes");
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("```json\n{VALID}\n```");
        let result = parse_extraction(&fenced).unwrap();
        assert_eq!(result.entities.len(), 2);
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let wrapped = format!("Here is the extraction you asked for:\n{VALID}\nLet me know!");
        let result = parse_extraction(&wrapped).unwrap();
        assert_eq!(result.relationships.len(), 1);
    }

    #[test]
    fn garbage_surfaces_the_raw_output() {
        let err = parse_extraction("I could not find any entities.").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedOutput { .. }));
        assert_eq!(err.raw_output(), Some("I could not find any entities."));
    }

    #[test]
    fn wrong_shape_is_a_schema_mismatch() {
        let err = parse_extraction(r#"{"entities": "none", "relationships": []}"#).unwrap_err();
        assert!(matches!(err, ExtractError::SchemaMismatch { .. }));
    }

    #[test]
    fn namespacing_prefixes_ids() {
        let extraction = parse_extraction(VALID).unwrap();
        let namespaced = namespace_extraction("abc123", extraction);

        assert_eq!(namespaced.entities[0].id, "abc123:E1");
        assert_eq!(namespaced.relationships[0].source, "abc123:E1");
        assert_eq!(namespaced.relationships[0].target, "abc123:E2");
    }

    #[test]
    fn undeclared_endpoints_are_dropped() {
        let raw = r#"{
            "entities": [{"id": "E1", "name": "Holmes"}],
            "relationships": [
                {"source": "E1", "relation": "knows", "target": "E9"},
                {"source": "E1", "relation": "knows", "target": "E1"}
            ]
        }"#;
        let namespaced = namespace_extraction("c1", parse_extraction(raw).unwrap());
        assert_eq!(namespaced.relationships.len(), 1);
        assert_eq!(namespaced.relationships[0].target, "c1:E1");
    }
}
