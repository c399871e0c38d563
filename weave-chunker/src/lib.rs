//! # weave-chunker — text chunking policies
//!
//! Splits UTF-8 text into an ordered sequence of chunk strings. The
//! `Chunker` trait lets the Memory Controller swap policies (sentence,
//! page, paragraph, sliding-window) without affecting downstream stages.

#![deny(missing_docs)]

use weave_core::error::ChunkError;

/// Splits text into an ordered sequence of chunk strings.
pub trait Chunker: Send + Sync {
    /// Chunk `text` under this policy. Empty input yields an empty
    /// sequence; chunks preserve reading order.
    fn process(&self, text: &str) -> Result<Vec<String>, ChunkError>;
}

/// The default chunking policy: accumulate `sentences_per_chunk` sentences
/// (split on `.`) per chunk, emitting a final partial chunk if any
/// sentences remain.
///
/// Mirrors `NaiveChunker`'s `getline`-on-`.` splitting: each sentence has
/// its leading whitespace stripped and the delimiter re-appended, and an
/// empty sentence (including the artifact produced when the text ends in
/// `.`) contributes nothing to the chunk or the count.
#[derive(Debug, Clone, Copy)]
pub struct SentenceChunker {
    sentences_per_chunk: usize,
}

impl SentenceChunker {
    /// Build a chunker with the given sentences-per-chunk policy.
    pub fn new(sentences_per_chunk: usize) -> Self {
        Self { sentences_per_chunk }
    }
}

impl Default for SentenceChunker {
    /// Default of 20 sentences per chunk.
    fn default() -> Self {
        Self::new(20)
    }
}

impl Chunker for SentenceChunker {
    fn process(&self, text: &str) -> Result<Vec<String>, ChunkError> {
        let mut chunks = Vec::new();
        let mut chunk = String::new();
        let mut count = 0usize;

        for sentence in text.split('.') {
            let trimmed = sentence.trim_start();
            if !trimmed.is_empty() {
                chunk.push_str(trimmed);
                chunk.push('.');
                count += 1;
            }
            if self.sentences_per_chunk != 0 && count == self.sentences_per_chunk {
                chunks.push(std::mem::take(&mut chunk));
                count = 0;
            }
        }
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        Ok(chunks)
    }
}
