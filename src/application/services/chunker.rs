use regex::Regex;

/// Default chunk budget, expressed in approximate tokens.
pub const DEFAULT_TOKENS_PER_CHUNK: usize = 300;
/// Fraction of a closed chunk carried into the next one for continuity.
pub const DEFAULT_OVERLAP_FRACTION: f64 = 0.1;

/// Estimated characters per token. Chunk budgets are measured in characters
/// as `tokens * CHARS_PER_TOKEN`; close enough for sizing without pulling in
/// a tokenizer.
const CHARS_PER_TOKEN: usize = 4;

/// Splits extracted document text into overlapping, bounded-size segments.
/// Sentences are never split: a single sentence longer than the budget is
/// emitted as its own oversized chunk.
#[derive(Debug, Clone)]
pub struct TextChunker {
    tokens_per_chunk: usize,
    overlap_fraction: f64,
    sentence_boundary: Regex,
}

impl TextChunker {
    pub fn new(tokens_per_chunk: usize, overlap_fraction: f64) -> Self {
        Self {
            tokens_per_chunk,
            overlap_fraction,
            sentence_boundary: Regex::new(r"[.!?]\s+").expect("sentence boundary regex is valid"),
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let budget = self.tokens_per_chunk * CHARS_PER_TOKEN;
        let mut chunks = Vec::new();
        let mut buffer = String::new();

        for sentence in self.split_sentences(text) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }

            let projected = if buffer.is_empty() {
                sentence.chars().count()
            } else {
                buffer.chars().count() + 1 + sentence.chars().count()
            };

            if projected > budget && !buffer.is_empty() {
                let closed = std::mem::take(&mut buffer);
                buffer = self.overlap_tail(&closed);
                chunks.push(closed);

                if !buffer.is_empty() {
                    buffer.push(' ');
                }
            } else if !buffer.is_empty() {
                buffer.push(' ');
            }

            buffer.push_str(sentence);
        }

        if !buffer.trim().is_empty() {
            chunks.push(buffer);
        }

        chunks.retain(|chunk| !chunk.is_empty());
        chunks
    }

    /// Sentence boundaries are `.`, `!` or `?` followed by whitespace. The
    /// punctuation stays with the preceding sentence.
    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for boundary in self.sentence_boundary.find_iter(text) {
            // The matched punctuation is a single ASCII byte.
            let end = boundary.start() + 1;
            if end > start {
                sentences.push(&text[start..end]);
            }
            start = boundary.end();
        }

        if start < text.len() {
            sentences.push(&text[start..]);
        }

        sentences
    }

    fn overlap_tail(&self, closed: &str) -> String {
        let chars: Vec<char> = closed.chars().collect();
        let overlap_len = (chars.len() as f64 * self.overlap_fraction) as usize;
        if overlap_len == 0 {
            return String::new();
        }
        chars[chars.len() - overlap_len..].iter().collect()
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_TOKENS_PER_CHUNK, DEFAULT_OVERLAP_FRACTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_produces_no_chunks() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n  ").is_empty());
    }

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let chunker = TextChunker::default();
        let text = "First sentence. Second sentence.";

        let chunks = chunker.chunk(text);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_text_without_terminal_punctuation() {
        let chunker = TextChunker::default();
        let chunks = chunker.chunk("no punctuation here");
        assert_eq!(chunks, vec!["no punctuation here".to_string()]);
    }

    #[test]
    fn test_sentences_are_never_split() {
        // Budget of 5 tokens = 20 characters.
        let chunker = TextChunker::new(5, 0.1);
        let sentences = [
            "Alpha beta gamma.",
            "Delta epsilon zeta.",
            "Eta theta iota kap.",
        ];
        let text = sentences.join(" ");

        let chunks = chunker.chunk(&text);
        assert!(chunks.len() > 1);

        for sentence in sentences {
            assert!(
                chunks.iter().any(|chunk| chunk.contains(sentence)),
                "sentence {:?} missing from chunks {:?}",
                sentence,
                chunks
            );
        }
    }

    #[test]
    fn test_chunks_overlap() {
        let chunker = TextChunker::new(5, 0.2);
        let text = "Aaaa bbbb cccc dddd. Eeee ffff gggg hhhh. Iiii jjjj kkkk llll.";

        let chunks = chunker.chunk(text);
        assert!(chunks.len() > 1);

        for window in chunks.windows(2) {
            let previous = &window[0];
            let next = &window[1];
            // The next chunk starts with a non-empty tail of the previous one.
            let found = (1..=previous.chars().count()).rev().any(|n| {
                let tail: String = previous
                    .chars()
                    .skip(previous.chars().count() - n)
                    .collect();
                next.starts_with(&tail)
            });
            assert!(found, "no overlap between {:?} and {:?}", previous, next);
        }
    }

    #[test]
    fn test_oversized_sentence_is_emitted_whole() {
        let chunker = TextChunker::new(2, 0.1); // 8 character budget
        let long_sentence = "this single sentence is much longer than the budget.";
        let text = format!("{} Tiny one.", long_sentence);

        let chunks = chunker.chunk(&text);
        assert!(chunks[0].contains(long_sentence));
    }

    #[test]
    fn test_no_empty_chunks() {
        let chunker = TextChunker::new(5, 0.1);
        let text = "One. Two. Three. Four. Five. Six. Seven. Eight. Nine. Ten.";

        for chunk in chunker.chunk(text) {
            assert!(!chunk.trim().is_empty());
        }
    }

    #[test]
    fn test_exclamation_and_question_boundaries() {
        let chunker = TextChunker::new(5, 0.1);
        let chunks = chunker.chunk("Really? Yes! Definitely maybe. Sure thing.");
        let joined = chunks.join(" ");

        assert!(joined.contains("Really?"));
        assert!(joined.contains("Yes!"));
        assert!(joined.contains("Definitely maybe."));
    }
}
