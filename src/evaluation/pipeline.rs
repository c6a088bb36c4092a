use super::extractor::{extract_rewritten_message, extract_scores, Extraction};
use super::llm_client::{CompletionRequest, LLMClient};
use super::prompt::{PromptBuilder, PromptMode, PromptTemplate};
use crate::domain::{DomainScoreSet, EvaluationRequest, Persona, Tone};
use crate::utils::excerpt;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct EvaluationPipeline<C: LLMClient> {
    llm: Arc<C>,
    prompt_builder: PromptBuilder,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassOutcome {
    pub raw_response: String,
    pub scores: Option<DomainScoreSet>,
    pub aggregate: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutcome {
    pub request_id: Uuid,
    pub message: String,
    pub persona: Persona,
    pub tone: Tone,
    pub completed_at: DateTime<Utc>,
    pub original: Option<PassOutcome>,
    pub rewritten_message: Option<String>,
    pub improved: Option<PassOutcome>,
}

impl<C: LLMClient> EvaluationPipeline<C> {
    pub fn new(llm: Arc<C>, template: PromptTemplate) -> Self {
        Self {
            llm,
            prompt_builder: PromptBuilder::new(template),
        }
    }

    pub fn run(&self, request: &EvaluationRequest) -> EvaluationOutcome {
        let original_length = request.original_length();
        let original = self.run_pass(
            request,
            &request.message,
            PromptMode::Original,
            original_length,
        );

        let rewritten_message = original.as_ref().and_then(|pass| {
            match extract_rewritten_message(&pass.raw_response) {
                Extraction::Found(text) => Some(text),
                Extraction::Absent(reason) => {
                    warn!(
                        request = %request.id,
                        %reason,
                        "message amélioré introuvable, second passage ignoré"
                    );
                    None
                }
            }
        });

        let improved = rewritten_message.as_ref().and_then(|rewritten| {
            self.run_pass(request, rewritten, PromptMode::Improved, original_length)
        });

        EvaluationOutcome {
            request_id: request.id,
            message: request.message.clone(),
            persona: request.persona,
            tone: request.tone,
            completed_at: Utc::now(),
            original,
            rewritten_message,
            improved,
        }
    }

    fn run_pass(
        &self,
        request: &EvaluationRequest,
        message: &str,
        mode: PromptMode,
        original_length: usize,
    ) -> Option<PassOutcome> {
        let (system_prompt, user_prompt) = self.prompt_builder.build(
            message,
            request.persona,
            request.tone,
            mode,
            original_length,
        );
        let call = CompletionRequest {
            mode,
            system_prompt,
            user_prompt,
        };

        let raw_response = match self.llm.complete(&call) {
            Ok(text) => text,
            Err(err) => {
                error!(
                    request = %request.id,
                    ?mode,
                    error = %format!("{err:#}"),
                    "échec lors de l'appel au service de complétion"
                );
                return None;
            }
        };

        let scores = match extract_scores(&raw_response) {
            Extraction::Found(scores) => Some(scores),
            Extraction::Absent(reason) => {
                warn!(
                    request = %request.id,
                    ?mode,
                    %reason,
                    response = %excerpt(&raw_response, 120),
                    "scores introuvables dans la réponse"
                );
                None
            }
        };
        let aggregate = scores.as_ref().map(DomainScoreSet::aggregate);

        info!(
            request = %request.id,
            ?mode,
            scores = scores.as_ref().map(DomainScoreSet::len).unwrap_or(0),
            aggregate = ?aggregate,
            "passage d'évaluation terminé"
        );

        Some(PassOutcome {
            raw_response,
            scores,
            aggregate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::llm_client::MockLLMClient;

    fn original_response() -> String {
        concat!(
            "| Domain | Score |\n",
            "| Relational Anchoring | 6 |\n",
            "Aggregate Cognitive Resonance Score: 6.0\n",
            "Executive summary: the message is serviceable.\n",
            "Improved_Message: \"Better hello for you\"\n",
            "Scores_JSON: {\"Relational Anchoring\": 6, \"Narrative Integration\": 5}\n"
        )
        .to_string()
    }

    fn improved_response() -> String {
        concat!(
            "Executive summary: clearly stronger.\n",
            "Scores_JSON: {\"Relational Anchoring\": 9, \"Narrative Integration\": 8}\n"
        )
        .to_string()
    }

    fn pipeline_with(mock: &MockLLMClient) -> EvaluationPipeline<MockLLMClient> {
        EvaluationPipeline::new(Arc::new(mock.clone()), PromptTemplate::default())
    }

    #[test]
    fn two_pass_run_extracts_scores_and_rewrite() {
        let mock = MockLLMClient::default();
        mock.push_response(original_response());
        mock.push_response(improved_response());

        let request = EvaluationRequest::new(
            "Hello, please read our update.",
            Persona::CareerMillennials,
            Tone::Direct,
        );
        let outcome = pipeline_with(&mock).run(&request);

        let original = outcome.original.expect("original pass should exist");
        let scores = original.scores.expect("original scores should exist");
        assert_eq!(scores.get("Relational Anchoring"), Some(6.0));
        assert_eq!(original.aggregate, Some(11.0 / 9.0));

        assert_eq!(
            outcome.rewritten_message.as_deref(),
            Some("Better hello for you")
        );
        let improved = outcome.improved.expect("improved pass should exist");
        assert_eq!(
            improved.scores.expect("improved scores").get("Relational Anchoring"),
            Some(9.0)
        );
        assert_eq!(mock.remaining(), 0);
    }

    #[test]
    fn missing_rewrite_skips_second_pass() {
        let mock = MockLLMClient::default();
        mock.push_response("Scores_JSON: {\"Relational Anchoring\": 6}".to_string());
        mock.push_response(improved_response());

        let request =
            EvaluationRequest::new("Hello.", Persona::CaregivingWomen, Tone::Empathetic);
        let outcome = pipeline_with(&mock).run(&request);

        assert!(outcome.original.is_some());
        assert!(outcome.rewritten_message.is_none());
        assert!(outcome.improved.is_none());
        // the second canned response was never consumed
        assert_eq!(mock.remaining(), 1);
    }

    #[test]
    fn remote_failure_degrades_to_empty_outcome() {
        let mock = MockLLMClient::default();
        let request =
            EvaluationRequest::new("Hello.", Persona::ChronicIllnessPatients, Tone::Clinical);
        let outcome = pipeline_with(&mock).run(&request);

        assert!(outcome.original.is_none());
        assert!(outcome.rewritten_message.is_none());
        assert!(outcome.improved.is_none());
        assert_eq!(outcome.message, "Hello.");
    }

    #[test]
    fn extraction_failure_keeps_raw_response() {
        let mock = MockLLMClient::default();
        mock.push_response("Improved_Message: \"Still better\"\nno structured scores here");
        mock.push_response("free prose without any block");

        let request =
            EvaluationRequest::new("Hello.", Persona::ClinicalProviders, Tone::Inspirational);
        let outcome = pipeline_with(&mock).run(&request);

        let original = outcome.original.expect("original pass should exist");
        assert!(original.scores.is_none());
        assert!(original.aggregate.is_none());
        assert!(original.raw_response.contains("Still better"));

        assert_eq!(outcome.rewritten_message.as_deref(), Some("Still better"));
        let improved = outcome.improved.expect("improved pass still recorded");
        assert!(improved.scores.is_none());
    }
}
