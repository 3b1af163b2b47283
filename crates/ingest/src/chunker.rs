use anyhow::{Result, ensure};

use crate::chunk::Chunk;

pub struct ChunkerConfig {
    pub max_chars: usize,
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chars: 3000,
            overlap: 200,
        }
    }
}

pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        ensure!(config.max_chars > 0, "max_chars must be > 0");
        Ok(Self { config })
    }

    pub fn chunk(&self, doc_id: &str, text: &str, source: &str) -> Vec<Chunk> {
        self.split_with_overlap(text)
            .into_iter()
            .enumerate()
            .map(|(i, piece)| Chunk::new(doc_id.to_string(), piece, source.to_string(), i))
            .collect()
    }

    /// Split into budgeted pieces, then prefix each piece after the first
    /// with up to `overlap` characters of whole words from its predecessor.
    fn split_with_overlap(&self, text: &str) -> Vec<String> {
        let pieces = self.split_by_budget(text);

        if self.config.overlap == 0 || pieces.len() < 2 {
            return pieces;
        }

        let mut overlapped: Vec<String> = Vec::with_capacity(pieces.len());
        for (i, piece) in pieces.into_iter().enumerate() {
            if i == 0 {
                overlapped.push(piece);
                continue;
            }
            // Overlap comes from the predecessor as already emitted.
            let tail = trailing_words(&overlapped[i - 1], self.config.overlap);
            if tail.is_empty() {
                overlapped.push(piece);
            } else {
                overlapped.push(format!("{tail} {piece}"));
            }
        }
        overlapped
    }

    /// Greedily pack whole sentences into chunks of at most `max_chars`
    /// characters. A single sentence over the budget is hard-split into
    /// fixed-size pieces rather than dropped.
    fn split_by_budget(&self, text: &str) -> Vec<String> {
        let max = self.config.max_chars;
        let mut chunks = Vec::new();
        let mut cur = String::new();
        let mut cur_chars = 0usize;

        for sentence in split_sentences(text) {
            let s = sentence.trim();
            if s.is_empty() {
                continue;
            }
            let s_chars = s.chars().count();

            if cur_chars + s_chars + 1 <= max {
                if !cur.is_empty() {
                    cur.push(' ');
                    cur_chars += 1;
                }
                cur.push_str(s);
                cur_chars += s_chars;
                continue;
            }

            if !cur.is_empty() {
                chunks.push(std::mem::take(&mut cur));
                cur_chars = 0;
            }

            if s_chars > max {
                let chars: Vec<char> = s.chars().collect();
                for window in chars.chunks(max) {
                    chunks.push(window.iter().collect());
                }
            } else {
                cur.push_str(s);
                cur_chars = s_chars;
            }
        }

        if !cur.is_empty() {
            chunks.push(cur);
        }

        chunks
    }
}

/// Split after terminal punctuation, keeping the punctuation with its sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            let end = i + ch.len_utf8();
            sentences.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Whole words from the end of `text` totalling at most `budget` characters.
/// Words are never cut mid-way.
fn trailing_words(text: &str, budget: usize) -> String {
    let mut taken: Vec<&str> = Vec::new();
    let mut chars = 0usize;

    for word in text.split_whitespace().rev() {
        let word_chars = word.chars().count();
        if chars + word_chars + 1 > budget {
            break;
        }
        taken.push(word);
        chars += word_chars + 1;
    }

    taken.reverse();
    taken.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(max_chars: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkerConfig { max_chars, overlap }).unwrap()
    }

    #[test]
    fn rejects_zero_budget() {
        assert!(
            Chunker::new(ChunkerConfig {
                max_chars: 0,
                overlap: 0
            })
            .is_err()
        );
    }

    #[test]
    fn empty_text_produces_no_chunks() {
        let chunks = chunker(100, 0).chunk("doc", "", "src");
        assert!(chunks.is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunker(100, 0).chunk("doc", "One sentence. Another one.", "src");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "One sentence. Another one.");
        assert_eq!(chunks[0].doc_id, "doc");
    }

    #[test]
    fn budget_is_respected_without_overlap() {
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota. Kappa lambda mu.";
        let chunks = chunker(40, 0).chunk("doc", text, "src");
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.char_len() <= 40, "chunk too long: {:?}", chunk.text);
        }
    }

    #[test]
    fn oversized_sentence_is_hard_split() {
        let text = "abcdefghij";
        let chunks = chunker(4, 0).chunk("doc", text, "src");
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn overlap_uses_whole_words() {
        let text = "alpha beta gamma. delta epsilon zeta.";
        let chunks = chunker(20, 10).chunk("doc", text, "src");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "alpha beta gamma.");
        // "gamma." fits in the 10-char overlap budget, "beta gamma." does not.
        assert_eq!(chunks[1].text, "gamma. delta epsilon zeta.");
    }

    #[test]
    fn sentence_terminators_split() {
        let sentences = split_sentences("Stop! Really? Yes.");
        assert_eq!(sentences, vec!["Stop!", " Really?", " Yes."]);
    }
}
