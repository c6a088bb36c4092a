mod extractor;
mod llm_client;
mod pipeline;
mod prompt;

pub use extractor::{
    extract_rewritten_message, extract_scores, AbsentReason, Extraction, IMPROVED_MESSAGE_MARKER,
    SCORES_JSON_MARKER,
};
pub use llm_client::{
    CompletionRequest, LLMClient, MockLLMClient, OpenAiLLMClient, DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
pub use pipeline::{EvaluationOutcome, EvaluationPipeline, PassOutcome};
pub use prompt::{PromptBuilder, PromptMode, PromptTemplate};
