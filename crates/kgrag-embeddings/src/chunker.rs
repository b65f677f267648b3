//! Line-based text chunking.
//!
//! Documents are too large for a single extraction or embedding request.
//! Lines are packed greedily into chunks whose summed line length stays
//! within a character budget; a line is never split, so a single line
//! longer than the budget becomes its own chunk.

/// A chunk of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk's lines joined with `\n`.
    pub text: String,
    /// Chunk index (0-based).
    pub index: usize,
    /// Index of the chunk's first line in the source text.
    pub first_line: usize,
}

/// Greedy line packer.
#[derive(Debug, Clone)]
pub struct LineChunker {
    max_chars: usize,
}

impl Default for LineChunker {
    fn default() -> Self {
        Self { max_chars: 2000 }
    }
}

impl LineChunker {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split text into chunks. Line lengths count characters, excluding newlines.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0;
        let mut first_line = 0;

        for (line_no, line) in text.lines().enumerate() {
            let line_len = line.chars().count();
            if !current.is_empty() && current_len + line_len > self.max_chars {
                chunks.push(Chunk {
                    text: current.join("\n"),
                    index: chunks.len(),
                    first_line,
                });
                current.clear();
                current_len = 0;
            }
            if current.is_empty() {
                first_line = line_no;
            }
            current.push(line);
            current_len += line_len;
        }

        if !current.is_empty() {
            chunks.push(Chunk {
                text: current.join("\n"),
                index: chunks.len(),
                first_line,
            });
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = LineChunker::default().chunk("line one\nline two");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "line one\nline two");
        assert_eq!(chunks[0].first_line, 0);
    }

    #[test]
    fn lines_are_packed_within_budget() {
        let chunker = LineChunker::new(10);
        let chunks = chunker.chunk("aaaa\nbbbb\ncccc\ndd");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "aaaa\nbbbb");
        assert_eq!(chunks[1].text, "cccc\ndd");
        assert_eq!(chunks[1].index, 1);
        assert_eq!(chunks[1].first_line, 2);
    }

    #[test]
    fn oversized_line_is_its_own_chunk() {
        let chunker = LineChunker::new(5);
        let chunks = chunker.chunk("ab\nabcdefghij\ncd");

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["ab", "abcdefghij", "cd"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(LineChunker::default().chunk("").is_empty());
    }
}
