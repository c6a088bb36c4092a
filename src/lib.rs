pub mod domain;
pub mod evaluation;
pub mod report;
pub mod utils;

pub use domain::{Domain, DomainScoreSet, EvaluationRequest, Persona, Tone};
pub use evaluation::{
    EvaluationOutcome, EvaluationPipeline, Extraction, LLMClient, MockLLMClient, OpenAiLLMClient,
    PromptBuilder, PromptTemplate,
};
pub use report::render_report;
