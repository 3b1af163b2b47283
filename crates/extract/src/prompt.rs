pub fn build_extraction_prompt(chunk_text: &str) -> String {
    format!(
        r#"Extract entities and relationships from the following text.

INSTRUCTIONS:
1. Identify the named entities (people, organizations, locations, concepts, events)
2. Extract the relationships stated between those entities
3. Output ONLY valid JSON, nothing else
4. Use the exact schema below

SCHEMA:
{{
  "entities": [
    {{"id": "E1", "name": "EntityName", "type": "PERSON|ORGANIZATION|LOCATION|CONCEPT|EVENT"}}
  ],
  "relationships": [
    {{"source": "E1", "relation": "relationship_verb", "target": "E2", "evidence_span": "quote from the text"}}
  ]
}}

RULES:
- Use sequential IDs: E1, E2, E3, etc.
- The "type" field may be omitted when no category fits
- Relation values should be short verbs: "knows", "works_with", "lives_in", "leads", etc.
- evidence_span must be a direct quote from the text
- Output ONLY the JSON object, no markdown, no explanations

TEXT:
{}

JSON OUTPUT:"#,
        chunk_text
    )
}

pub fn build_repair_prompt(invalid_output: &str) -> String {
    format!(
        r#"The following JSON is invalid:

{}

Fix this JSON. Output only valid JSON with no markdown formatting, no code blocks, no explanations. Just the raw JSON object with "entities" and "relationships" fields."#,
        invalid_output
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_and_schema_fields() {
        let prompt = build_extraction_prompt("Holmes consulted Watson.");
        assert!(prompt.contains("Holmes consulted Watson."));
        assert!(prompt.contains(r#""entities""#));
        assert!(prompt.contains(r#""relationships""#));
    }

    #[test]
    fn repair_prompt_embeds_the_invalid_output() {
        let prompt = build_repair_prompt("{broken");
        assert!(prompt.contains("{broken"));
    }
}
