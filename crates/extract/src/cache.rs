use dashmap::DashMap;
use sha2::{Digest, Sha256};

/// In-process cache of completed LLM responses, keyed by a hash of the
/// prompt. Re-running a document only pays for chunks that changed.
pub struct ResponseCache {
    responses: DashMap<String, String>,
    max_entries: usize,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            responses: DashMap::new(),
            max_entries,
        }
    }

    pub fn get(&self, prompt: &str) -> Option<String> {
        let key = hash_prompt(prompt);
        self.responses.get(&key).map(|r| r.value().clone())
    }

    pub fn put(&self, prompt: &str, response: String) {
        if self.responses.len() >= self.max_entries {
            // Simple eviction: drop a quarter of the entries when full.
            let to_remove: Vec<_> = self
                .responses
                .iter()
                .take(self.max_entries / 4)
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.responses.remove(&key);
            }
        }
        let key = hash_prompt(prompt);
        self.responses.insert(key, response);
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    hex::encode(hasher.finalize())
}
