use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, DocumentId};

/// Fixed-size character windows that prefer to end on whitespace.
///
/// Consecutive chunks share up to `chunk_overlap` characters, snapped
/// forward to the next word start so words are never cut in half.
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    fn validate(&self) -> Result<(), TextSplitterError> {
        if self.chunk_size == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(TextSplitterError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    fn window_end(&self, chars: &[char], start: usize) -> usize {
        let hard_end = (start + self.chunk_size).min(chars.len());
        if hard_end == chars.len() {
            return hard_end;
        }
        (start + 1..=hard_end)
            .rev()
            .find(|&i| chars[i].is_whitespace())
            .unwrap_or(hard_end)
    }
}

#[async_trait]
impl TextSplitter for RecursiveCharacterSplitter {
    async fn split(
        &self,
        text: &str,
        document_id: DocumentId,
        source: Option<&str>,
    ) -> Result<Vec<Chunk>, TextSplitterError> {
        self.validate()?;

        let chars: Vec<char> = text.chars().collect();
        let total_len = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            while start < total_len && chars[start].is_whitespace() {
                start += 1;
            }
            if start >= total_len {
                break;
            }

            let end = self.window_end(&chars, start);
            let chunk_text: String = chars[start..end].iter().collect();
            chunks.push(Chunk::new(
                chunk_text.trim_end().to_string(),
                document_id,
                source.map(str::to_string),
                start,
            ));

            if end >= total_len {
                break;
            }

            let mut next = end.saturating_sub(self.chunk_overlap).max(start + 1);
            while next < end && !chars[next - 1].is_whitespace() {
                next += 1;
            }
            start = next;
        }

        tracing::debug!(
            chunks = chunks.len(),
            chars = total_len,
            chunk_size = self.chunk_size,
            "Text split"
        );
        Ok(chunks)
    }
}
