use serde::{Deserialize, Serialize};

/// First line of every freshly reset transcript.
pub const SEED_LINE: &str = "Here is the conversation so far.";

/// One participant's view of a conversation.
///
/// Lines are appended in the order they are received and never rewritten;
/// only [`Transcript::reset`] discards them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            lines: vec![SEED_LINE.to_string()],
        }
    }

    pub fn reset(&mut self) {
        self.lines.clear();
        self.lines.push(SEED_LINE.to_string());
    }

    pub fn push(&mut self, speaker: &str, utterance: &str) {
        self.lines.push(format!("{speaker}: {utterance}"));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Joins every line followed by `prefix` with newlines.
    pub fn render(&self, prefix: &str) -> String {
        self.render_with_preamble(None, prefix)
    }

    /// Like [`Transcript::render`], with `preamble` as the leading line.
    pub fn render_with_preamble(&self, preamble: Option<&str>, prefix: &str) -> String {
        preamble
            .into_iter()
            .chain(self.lines.iter().map(String::as_str))
            .chain(std::iter::once(prefix))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
