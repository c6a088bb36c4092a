mod audience;
mod request;
mod rubric;

pub use audience::{Persona, Tone};
pub use request::EvaluationRequest;
pub use rubric::{Domain, DomainMetadata, DomainScoreSet, DOMAIN_COUNT};
