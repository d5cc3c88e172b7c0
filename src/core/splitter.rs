use crate::domain::model::{Chunk, ChunkLocation, LineRange};
use crate::utils::error::{QaError, Result};
use text_splitter::{Characters, ChunkConfig, TextSplitter};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Recursive character splitter: paragraphs first, then sentences, words and
/// characters, until each chunk fits `chunk_size` characters.
pub struct TextChunker {
    splitter: TextSplitter<Characters>,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let config = ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .map_err(|e| QaError::InvalidConfigValueError {
                field: "chunking.chunk_overlap".to_string(),
                value: chunk_overlap.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            splitter: TextSplitter::new(config),
        })
    }

    pub fn split(&self, text: &str) -> Vec<Chunk> {
        // Offsets arrive in increasing order; only newlines since the last
        // chunk start are counted.
        let mut cursor = 0;
        let mut line = 1;

        self.splitter
            .chunk_indices(text)
            .map(|(offset, chunk)| {
                if offset < cursor {
                    cursor = 0;
                    line = 1;
                }
                line += text[cursor..offset].matches('\n').count();
                cursor = offset;

                let from = line;
                let to = from + chunk.matches('\n').count();
                Chunk {
                    content: chunk.to_string(),
                    loc: ChunkLocation {
                        lines: LineRange { from, to },
                    },
                }
            })
            .collect()
    }
}
