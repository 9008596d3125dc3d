use std::collections::VecDeque;

use crate::domain::{ports::TextSplitter, DomainError};
use crate::infrastructure::config::SplitterConfig;

use super::TokenizerLength;

/// Measures how much of the chunk budget a piece of text uses.
pub trait LengthFunction: Send + Sync {
    fn length(&self, text: &str) -> Result<usize, DomainError>;

    /// Rejects input the measure cannot handle. Called once per `split_text`.
    fn check(&self, _text: &str) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Counts Unicode scalar values.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharLength;

impl LengthFunction for CharLength {
    fn length(&self, text: &str) -> Result<usize, DomainError> {
        Ok(text.chars().count())
    }
}

/// Splits on the first separator present in the text, recursing into pieces
/// that are still too long with the remaining separators, then greedily merges
/// the small pieces back into chunks of at most `chunk_size` with up to
/// `chunk_overlap` carried over between neighbours.
///
/// Separators are matched literally and stay attached to the start of the
/// piece that follows them. An empty separator splits into characters.
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
    strip_whitespace: bool,
    length: Box<dyn LengthFunction>,
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, DomainError> {
        if chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be positive"));
        }
        if chunk_overlap > chunk_size {
            return Err(DomainError::validation(format!(
                "chunk_overlap ({chunk_overlap}) is larger than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: SplitterConfig::default().separators,
            strip_whitespace: true,
            length: Box::new(CharLength),
        })
    }

    pub fn from_config(config: &SplitterConfig) -> Result<Self, DomainError> {
        let splitter = Self::new(config.chunk_size, config.chunk_overlap)?
            .with_separators(config.separators.clone())
            .with_strip_whitespace(config.strip_whitespace);

        match &config.tokenizer {
            Some(tokenizer) => Ok(splitter.with_length(TokenizerLength::from_config(tokenizer)?)),
            None => Ok(splitter),
        }
    }

    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }

    pub fn with_length(mut self, length: impl LengthFunction + 'static) -> Self {
        self.length = Box::new(length);
        self
    }

    fn split_recursive(
        &self,
        text: &str,
        separators: &[String],
    ) -> Result<Vec<String>, DomainError> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut small = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            let len = self.length.length(&piece)?;
            if len < self.chunk_size {
                small.push((piece, len));
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge_splits(std::mem::take(&mut small)));
            }
            if remaining.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, remaining)?);
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge_splits(small));
        }

        Ok(chunks)
    }

    /// Pieces carry their separators, so merging is plain concatenation.
    fn merge_splits(&self, splits: Vec<(String, usize)>) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<(String, usize)> = VecDeque::new();
        let mut total = 0;

        for (piece, len) in splits {
            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        size = total,
                        chunk_size = self.chunk_size,
                        "created a chunk longer than the configured size"
                    );
                }
                if !current.is_empty() {
                    if let Some(doc) = self.join(&current) {
                        docs.push(doc);
                    }
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some((_, dropped)) => total -= dropped,
                            None => break,
                        }
                    }
                }
            }
            total += len;
            current.push_back((piece, len));
        }

        if let Some(doc) = self.join(&current) {
            docs.push(doc);
        }
        docs
    }

    fn join(&self, pieces: &VecDeque<(String, usize)>) -> Option<String> {
        let joined: String = pieces.iter().map(|(piece, _)| piece.as_str()).collect();
        let joined = if self.strip_whitespace {
            joined.trim().to_string()
        } else {
            joined
        };
        (!joined.is_empty()).then_some(joined)
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>, DomainError> {
        self.length.check(text)?;
        self.split_recursive(text, &self.separators)
    }
}

fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(text[start..idx].to_string());
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(text[start..].to_string());
    }
    pieces
}
