use tracing::instrument;

use super::DialogueAgent;
use crate::domain::DomainError;

/// Picks the index of the next speaker from the step counter and the
/// participants.
pub type SpeakerSelector = Box<dyn Fn(usize, &[DialogueAgent]) -> usize + Send + Sync>;

/// Cycles through the participants in order. Returns 0 when there are none.
pub fn round_robin(step: usize, agents: &[DialogueAgent]) -> usize {
    step.checked_rem(agents.len()).unwrap_or(0)
}

/// Drives a dialogue: each step one participant speaks and every participant,
/// the speaker included, receives the utterance.
pub struct DialogueSimulator {
    agents: Vec<DialogueAgent>,
    step: usize,
    select_next_speaker: SpeakerSelector,
}

impl DialogueSimulator {
    pub fn new(agents: Vec<DialogueAgent>) -> Self {
        Self::with_selector(agents, round_robin)
    }

    pub fn with_selector(
        agents: Vec<DialogueAgent>,
        selector: impl Fn(usize, &[DialogueAgent]) -> usize + Send + Sync + 'static,
    ) -> Self {
        Self {
            agents,
            step: 0,
            select_next_speaker: Box::new(selector),
        }
    }

    pub fn agents(&self) -> &[DialogueAgent] {
        &self.agents
    }

    pub fn step_count(&self) -> usize {
        self.step
    }

    pub fn reset(&mut self) {
        for agent in &mut self.agents {
            agent.reset();
        }
        self.step = 0;
    }

    /// Broadcasts `message` from `name` to every participant.
    pub fn inject(&mut self, name: &str, message: &str) {
        self.broadcast(name, message);
        self.step += 1;
    }

    /// Runs one turn and returns `(speaker, message)`.
    ///
    /// A failed `send` leaves every transcript and the step counter untouched.
    #[instrument(skip(self), fields(step = self.step))]
    pub async fn step(&mut self) -> Result<(String, String), DomainError> {
        if self.agents.is_empty() {
            return Err(DomainError::validation("dialogue has no participants"));
        }

        let idx = (self.select_next_speaker)(self.step, &self.agents);
        let speaker = self.agents.get(idx).ok_or_else(|| {
            DomainError::validation(format!(
                "speaker index {idx} out of range for {} participants",
                self.agents.len()
            ))
        })?;

        let message = speaker.send().await?;
        let name = speaker.name().to_string();
        tracing::info!(speaker = %name, "turn completed");

        self.broadcast(&name, &message);
        self.step += 1;

        Ok((name, message))
    }

    fn broadcast(&mut self, name: &str, message: &str) {
        for agent in &mut self.agents {
            agent.receive(name, message);
        }
    }
}
