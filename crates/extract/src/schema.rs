use serde::{Deserialize, Serialize};

/// An entity as the model reports it. `id` is only unique within one
/// extraction; the extractor namespaces it before results are combined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub relation: String,
    pub target: String,
    #[serde(default)]
    pub evidence_span: String,
}

/// The model's structured output for one chunk, order-preserving and
/// otherwise unvalidated. Both fields are required on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedChunk {
    pub chunk_id: String,
    pub doc_id: String,
    pub extraction: ExtractionResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_is_optional() {
        let entity: Entity = serde_json::from_str(r#"{"id": "E1", "name": "Watson"}"#).unwrap();
        assert_eq!(entity.name, "Watson");
        assert!(entity.entity_type.is_none());

        let entity: Entity =
            serde_json::from_str(r#"{"id": "E1", "name": "Watson", "type": "PERSON"}"#).unwrap();
        assert_eq!(entity.entity_type.as_deref(), Some("PERSON"));
    }

    #[test]
    fn evidence_span_defaults_to_empty() {
        let rel: Relationship =
            serde_json::from_str(r#"{"source": "E1", "relation": "knows", "target": "E2"}"#)
                .unwrap();
        assert_eq!(rel.evidence_span, "");
    }

    #[test]
    fn missing_top_level_fields_are_an_error() {
        let result = serde_json::from_str::<ExtractionResult>(r#"{"entities": []}"#);
        assert!(result.is_err());
    }
}
