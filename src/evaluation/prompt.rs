use super::extractor::{IMPROVED_MESSAGE_MARKER, SCORES_JSON_MARKER};
use crate::domain::{Domain, Persona, Tone};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    Original,
    Improved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub system: String,
    pub rubric: String,
}

impl PromptTemplate {
    pub fn default() -> Self {
        let rubric_lines: Vec<String> = Domain::all()
            .iter()
            .map(|domain| {
                let meta = domain.metadata();
                format!("- {}: {}", meta.label, meta.description)
            })
            .collect();

        let system = concat!(
            "You are a senior communication strategist specializing in psycholinguistics. ",
            "You evaluate messages with the Cognitive-Linguistic Deep Analysis Model ",
            "and you follow output format instructions to the letter."
        )
        .to_string();

        let rubric = format!(
            "Score each of the following domains from 0 to 10:\n{}",
            rubric_lines.join("\n")
        );

        Self { system, rubric }
    }

    fn scores_json_skeleton() -> String {
        let fields: Vec<String> = Domain::all()
            .iter()
            .map(|domain| format!("\"{}\": <score>", domain.metadata().label))
            .collect();
        format!("{{{}}}", fields.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: PromptTemplate,
}

impl PromptBuilder {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    // `original_length` is always the character count of the user's first
    // message, even when the message under evaluation is the rewritten one.
    pub fn build(
        &self,
        message: &str,
        persona: Persona,
        tone: Tone,
        mode: PromptMode,
        original_length: usize,
    ) -> (String, String) {
        let system = self.template.system.clone();
        let skeleton = PromptTemplate::scores_json_skeleton();

        let user = match mode {
            PromptMode::Original => format!(
                concat!(
                    "Evaluate the following ORIGINAL MESSAGE with the Cognitive-Linguistic Deep Analysis Model.\n",
                    "Persona: {persona}\n",
                    "Tone: {tone}\n\n",
                    "{rubric}\n\n",
                    "Then:\n",
                    "- give a one-line rationale per domain,\n",
                    "- compute the Aggregate Cognitive Resonance Score,\n",
                    "- write a short strategic executive summary,\n",
                    "- propose an improved version of the message. ",
                    "The improved version must stay within ±15% of {length} characters.\n\n",
                    "Finish your answer with exactly these two lines, in this order:\n",
                    "{improved_marker} \"<the improved message, wrapped in double quotes>\"\n",
                    "{scores_marker} {skeleton}\n",
                    "The {scores_marker} line must be a single line holding one JSON object ",
                    "mapping the 9 domain names to their scores.\n\n",
                    "ORIGINAL MESSAGE:\n{message}"
                ),
                persona = persona.label(),
                tone = tone.label(),
                rubric = self.template.rubric,
                length = original_length,
                improved_marker = IMPROVED_MESSAGE_MARKER,
                scores_marker = SCORES_JSON_MARKER,
                skeleton = skeleton,
                message = message,
            ),
            PromptMode::Improved => format!(
                concat!(
                    "Evaluate the following IMPROVED MESSAGE with the Cognitive-Linguistic Deep Analysis Model.\n",
                    "Persona: {persona}\n",
                    "Tone: {tone}\n\n",
                    "{rubric}\n\n",
                    "Then:\n",
                    "- give a one-line rationale per domain,\n",
                    "- compute the Aggregate Cognitive Resonance Score,\n",
                    "- write a short strategic executive summary.\n\n",
                    "Finish your answer with exactly this line:\n",
                    "{scores_marker} {skeleton}\n",
                    "The {scores_marker} line must be a single line holding one JSON object ",
                    "mapping the 9 domain names to their scores.\n\n",
                    "IMPROVED MESSAGE:\n{message}"
                ),
                persona = persona.label(),
                tone = tone.label(),
                rubric = self.template.rubric,
                scores_marker = SCORES_JSON_MARKER,
                skeleton = skeleton,
                message = message,
            ),
        };

        (system, user)
    }
}
