use std::path::Path;

use tokenizers::Tokenizer;

use super::LengthFunction;
use crate::domain::DomainError;
use crate::infrastructure::config::{SpecialTokens, TokenizerConfig};

/// Measures text in tokens of a `tokenizers` vocabulary.
///
/// Text containing a special token that is disallowed (and not explicitly
/// allowed) is rejected instead of being silently encoded.
pub struct TokenizerLength {
    tokenizer: Tokenizer,
    special_tokens: Vec<String>,
    allowed_special: SpecialTokens,
    disallowed_special: SpecialTokens,
}

impl TokenizerLength {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            DomainError::io(format!("failed to load tokenizer {}: {e}", path.display()))
        })?;

        let mut special_tokens: Vec<String> = tokenizer
            .get_added_tokens_decoder()
            .values()
            .filter(|token| token.special)
            .map(|token| token.content.clone())
            .collect();
        special_tokens.sort();

        Ok(Self {
            tokenizer,
            special_tokens,
            allowed_special: SpecialTokens::None,
            disallowed_special: SpecialTokens::All,
        })
    }

    pub fn from_config(config: &TokenizerConfig) -> Result<Self, DomainError> {
        let length = Self::from_file(&config.path)?
            .with_special_tokens(config.allowed_special.clone(), config.disallowed_special.clone());

        tracing::debug!(
            tokenizer = %config.path.display(),
            special_tokens = length.special_tokens.len(),
            "token length function loaded"
        );
        Ok(length)
    }

    pub fn with_special_tokens(mut self, allowed: SpecialTokens, disallowed: SpecialTokens) -> Self {
        self.allowed_special = allowed;
        self.disallowed_special = disallowed;
        self
    }
}

impl LengthFunction for TokenizerLength {
    fn length(&self, text: &str) -> Result<usize, DomainError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| DomainError::internal(format!("tokenization failed: {e}")))?;
        Ok(encoding.get_ids().len())
    }

    fn check(&self, text: &str) -> Result<(), DomainError> {
        let found = self.special_tokens.iter().find(|token| {
            self.disallowed_special.contains(token)
                && !self.allowed_special.contains(token)
                && text.contains(token.as_str())
        });

        match found {
            Some(token) => Err(DomainError::validation(format!(
                "text contains disallowed special token {token:?}"
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::ports::TextSplitter;
    use crate::infrastructure::splitter::RecursiveCharacterSplitter;
    use std::io::Write;

    const TOKENIZER_JSON: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [
    {"id": 0, "content": "<|endoftext|>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
  ],
  "normalizer": null,
  "pre_tokenizer": {"type": "Whitespace"},
  "post_processor": null,
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": {"<|endoftext|>": 0, "[UNK]": 1, "hello": 2, "world": 3},
    "unk_token": "[UNK]"
  }
}"#;

    pub(crate) fn tokenizer_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TOKENIZER_JSON.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_counts_tokens() {
        let file = tokenizer_file();
        let length = TokenizerLength::from_file(file.path()).unwrap();

        assert_eq!(length.length("hello world").unwrap(), 2);
        assert_eq!(length.length("hello brave new world").unwrap(), 4);
    }

    #[test]
    fn test_disallowed_special_token_rejected() {
        let file = tokenizer_file();
        let length = TokenizerLength::from_file(file.path()).unwrap();

        assert!(matches!(
            length.check("hello <|endoftext|>"),
            Err(DomainError::Validation(_))
        ));
        assert!(length.check("hello world").is_ok());
    }

    #[test]
    fn test_allowed_special_token_passes() {
        let file = tokenizer_file();
        let length = TokenizerLength::from_file(file.path())
            .unwrap()
            .with_special_tokens(
                SpecialTokens::Only(vec!["<|endoftext|>".to_string()]),
                SpecialTokens::All,
            );

        assert!(length.check("hello <|endoftext|>").is_ok());
    }

    #[test]
    fn test_splitter_measures_in_tokens() {
        let file = tokenizer_file();
        let length = TokenizerLength::from_file(file.path()).unwrap();
        let splitter = RecursiveCharacterSplitter::new(3, 1)
            .unwrap()
            .with_length(length);

        let chunks = splitter
            .split_text("hello world hello world hello")
            .unwrap();
        assert_eq!(
            chunks,
            vec!["hello world hello", "hello world hello"]
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            TokenizerLength::from_file("/nonexistent/tokenizer.json"),
            Err(DomainError::Io(_))
        ));
    }
}
