use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

use crate::application::ports::{SubtitleLoader, SubtitleLoaderError};

use super::sanitize_dialogue_line;

static CUE_INDEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static CUE_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}:\d{2}:\d{2}[,.]\d{1,3}\s*-->\s*\d{1,2}:\d{2}:\d{2}[,.]\d{1,3}").unwrap()
});

/// Reads SubRip (`.srt`) files.
pub struct SrtLoader;

impl SrtLoader {
    /// Dialogue lines in file order, without indices, timings or markup.
    pub fn dialogue_lines(content: &str) -> Vec<String> {
        let mut dialogue = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        for line in content.trim_start_matches('\u{feff}').lines().map(str::trim) {
            if line.is_empty() {
                Self::push_cue_text(&block, &mut dialogue);
                block.clear();
            } else {
                block.push(line);
            }
        }
        Self::push_cue_text(&block, &mut dialogue);

        dialogue
    }

    /// A cue is `[index] timing text...`; the index only counts before the timing line.
    fn push_cue_text(block: &[&str], dialogue: &mut Vec<String>) {
        let text_start = match block {
            [index, timing, ..] if CUE_INDEX.is_match(index) && CUE_TIMING.is_match(timing) => 2,
            [timing, ..] if CUE_TIMING.is_match(timing) => 1,
            _ => 0,
        };

        dialogue.extend(
            block[text_start..]
                .iter()
                .map(|line| sanitize_dialogue_line(line))
                .filter(|line| !line.is_empty()),
        );
    }
}

#[async_trait]
impl SubtitleLoader for SrtLoader {
    async fn extract_dialogue(&self, data: &[u8]) -> Result<String, SubtitleLoaderError> {
        let content = std::str::from_utf8(data)
            .map_err(|e| SubtitleLoaderError::InvalidEncoding(e.to_string()))?;

        let lines = Self::dialogue_lines(content);
        if lines.is_empty() {
            return Err(SubtitleLoaderError::NoDialogue);
        }

        tracing::debug!(lines = lines.len(), "Subtitle dialogue extracted");
        Ok(lines.join(" "))
    }
}
