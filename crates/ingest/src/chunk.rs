use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub doc_id: String,
    pub chunk_id: String,
    pub text: String,
    pub source: String,
    pub index: usize,
}

impl Chunk {
    pub fn new(doc_id: String, text: String, source: String, index: usize) -> Self {
        let chunk_id = Self::generate_chunk_id(&doc_id, &text, index);

        Self {
            doc_id,
            chunk_id,
            text,
            source,
            index,
        }
    }

    fn generate_chunk_id(doc_id: &str, text: &str, index: usize) -> String {
        let mut hasher = Sha256::new();
        hasher.update(doc_id.as_bytes());
        hasher.update(text.as_bytes());
        hasher.update(index.to_string().as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16])
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_ids_are_stable() {
        let a = Chunk::new("doc".into(), "some text".into(), "src".into(), 0);
        let b = Chunk::new("doc".into(), "some text".into(), "src".into(), 0);
        assert_eq!(a.chunk_id, b.chunk_id);
    }

    #[test]
    fn chunk_ids_differ_by_index() {
        let a = Chunk::new("doc".into(), "some text".into(), "src".into(), 0);
        let b = Chunk::new("doc".into(), "some text".into(), "src".into(), 1);
        assert_ne!(a.chunk_id, b.chunk_id);
    }
}
