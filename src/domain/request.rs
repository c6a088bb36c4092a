use super::audience::{Persona, Tone};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRequest {
    pub id: Uuid,
    pub message: String,
    pub persona: Persona,
    pub tone: Tone,
}

impl EvaluationRequest {
    pub fn new(message: impl Into<String>, persona: Persona, tone: Tone) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            persona,
            tone,
        }
    }

    // Length constraints are always expressed against the user's first
    // message, in characters rather than bytes.
    pub fn original_length(&self) -> usize {
        self.message.chars().count()
    }
}
