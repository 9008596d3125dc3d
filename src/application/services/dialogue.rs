use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{LlmService, ToolAgent},
    DomainError, Transcript,
};

/// What produces a participant's next utterance.
#[derive(Clone)]
pub enum Responder {
    /// One chat completion: role instruction as system prompt, transcript as
    /// the user turn.
    Model(Arc<dyn LlmService>),
    /// A tool-calling agent given the role instruction and transcript as a
    /// single input.
    ToolAgent(Arc<dyn ToolAgent>),
}

/// A named participant in a dialogue.
///
/// The participant only knows its own transcript. Turn order is up to the
/// caller: [`DialogueAgent::send`] reads the transcript, and
/// [`DialogueAgent::receive`] is the only way to extend it.
pub struct DialogueAgent {
    name: String,
    system_message: String,
    prefix: String,
    responder: Responder,
    transcript: Transcript,
}

impl DialogueAgent {
    pub fn new(
        name: impl Into<String>,
        system_message: impl Into<String>,
        llm: Arc<dyn LlmService>,
    ) -> Self {
        Self::with_responder(name, system_message, Responder::Model(llm))
    }

    pub fn with_tools(
        name: impl Into<String>,
        system_message: impl Into<String>,
        agent: Arc<dyn ToolAgent>,
    ) -> Self {
        Self::with_responder(name, system_message, Responder::ToolAgent(agent))
    }

    pub fn with_responder(
        name: impl Into<String>,
        system_message: impl Into<String>,
        responder: Responder,
    ) -> Self {
        let name = name.into();
        Self {
            prefix: format!("{name}: "),
            name,
            system_message: system_message.into(),
            responder,
            transcript: Transcript::new(),
        }
    }

    /// Overrides the default `"{name}: "` prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn uses_tools(&self) -> bool {
        matches!(self.responder, Responder::ToolAgent(_))
    }

    pub fn reset(&mut self) {
        self.transcript.reset();
    }

    /// Produces the next utterance from the current transcript.
    #[instrument(skip(self), fields(name = %self.name, lines = self.transcript.len()))]
    pub async fn send(&self) -> Result<String, DomainError> {
        match &self.responder {
            Responder::Model(llm) => {
                let prompt = self.transcript.render(&self.prefix);
                llm.complete_with_system(&self.system_message, &prompt).await
            }
            Responder::ToolAgent(agent) => {
                let input = self
                    .transcript
                    .render_with_preamble(Some(&self.system_message), &self.prefix);
                agent.run(&input).await
            }
        }
    }

    pub fn receive(&mut self, speaker: &str, utterance: &str) {
        self.transcript.push(speaker, utterance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SEED_LINE;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLlm {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl LlmService for RecordingLlm {
        async fn complete_with_system(
            &self,
            system: &str,
            prompt: &str,
        ) -> Result<String, DomainError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            Ok("I agree.".to_string())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmService for FailingLlm {
        async fn complete_with_system(
            &self,
            _system: &str,
            _prompt: &str,
        ) -> Result<String, DomainError> {
            Err(DomainError::external("quota exceeded"))
        }
    }

    #[derive(Default)]
    struct RecordingToolAgent {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ToolAgent for RecordingToolAgent {
        async fn run(&self, input: &str) -> Result<String, DomainError> {
            self.inputs.lock().unwrap().push(input.to_string());
            Ok("According to my search, yes.".to_string())
        }
    }

    #[test]
    fn test_receive_appends_lines_in_order() {
        let mut agent = DialogueAgent::new("Alice", "You are Alice.", Arc::new(RecordingLlm::default()));
        let turns = [("Bob", "hi"), ("Carol", "hello"), ("Bob", "how are you?")];

        for (speaker, message) in turns {
            agent.receive(speaker, message);
        }

        let lines = agent.transcript().lines();
        assert_eq!(lines.len(), 1 + turns.len());
        assert_eq!(lines[0], SEED_LINE);
        for (line, (speaker, message)) in lines[1..].iter().zip(turns) {
            assert_eq!(line, &format!("{speaker}: {message}"));
        }
    }

    #[test]
    fn test_reset_restores_seed_line() {
        let mut agent = DialogueAgent::new("Alice", "You are Alice.", Arc::new(RecordingLlm::default()));
        agent.receive("Bob", "hi");
        agent.receive("Alice", "hello");

        agent.reset();
        assert_eq!(agent.transcript().lines(), [SEED_LINE.to_string()]);

        agent.reset();
        assert_eq!(agent.transcript().len(), 1);
    }

    #[test]
    fn test_default_and_custom_prefix() {
        let llm: Arc<dyn LlmService> = Arc::new(RecordingLlm::default());
        let agent = DialogueAgent::new("Alice", "sys", llm.clone());
        assert_eq!(agent.prefix(), "Alice: ");

        let agent = DialogueAgent::new("Alice", "sys", llm).with_prefix("Alice (moderator): ");
        assert_eq!(agent.prefix(), "Alice (moderator): ");
    }

    #[tokio::test]
    async fn test_send_builds_prompt_without_mutating_transcript() {
        let llm = Arc::new(RecordingLlm::default());
        let mut agent = DialogueAgent::new("Alice", "You are Alice.", llm.clone());
        agent.receive("Bob", "Is water wet?");
        let before = agent.transcript().clone();

        let reply = agent.send().await.unwrap();

        assert_eq!(reply, "I agree.");
        assert_eq!(agent.transcript(), &before);

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "You are Alice.");
        assert_eq!(
            calls[0].1,
            "Here is the conversation so far.\nBob: Is water wet?\nAlice: "
        );
    }

    #[tokio::test]
    async fn test_send_propagates_model_failure() {
        let mut agent = DialogueAgent::new("Alice", "sys", Arc::new(FailingLlm));
        agent.receive("Bob", "hi");

        let err = agent.send().await.unwrap_err();
        assert!(matches!(err, DomainError::ExternalService(_)));
        assert_eq!(agent.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_tool_agent_receives_single_input() {
        let tools = Arc::new(RecordingToolAgent::default());
        let mut agent = DialogueAgent::with_tools("Researcher", "You cite sources.", tools.clone());
        agent.receive("Moderator", "Topic: coffee");
        assert!(agent.uses_tools());

        let first = agent.send().await.unwrap();
        let second = agent.send().await.unwrap();

        assert_eq!(first, "According to my search, yes.");
        assert_eq!(first, second);
        assert_eq!(agent.transcript().len(), 2);

        let inputs = tools.inputs.lock().unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(
            inputs[0],
            "You cite sources.\nHere is the conversation so far.\nModerator: Topic: coffee\nResearcher: "
        );
        assert_eq!(inputs[0], inputs[1]);
    }

    #[tokio::test]
    async fn test_tool_agent_reset_and_receive() {
        let mut agent = DialogueAgent::with_tools(
            "Researcher",
            "sys",
            Arc::new(RecordingToolAgent::default()),
        );
        agent.receive("Moderator", "hello");
        agent.reset();
        agent.receive("Moderator", "again");

        assert_eq!(
            agent.transcript().lines(),
            [SEED_LINE.to_string(), "Moderator: again".to_string()]
        );
    }
}
