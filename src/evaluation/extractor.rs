use crate::domain::DomainScoreSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub const IMPROVED_MESSAGE_MARKER: &str = "Improved_Message:";
pub const SCORES_JSON_MARKER: &str = "Scores_JSON:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentReason {
    MissingMarker,
    NoJsonObject,
    MalformedJson,
    EmptyCapture,
}

impl fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            AbsentReason::MissingMarker => "marqueur absent de la réponse",
            AbsentReason::NoJsonObject => "aucun objet JSON dans la réponse",
            AbsentReason::MalformedJson => "objet JSON malformé dans la réponse",
            AbsentReason::EmptyCapture => "capture vide après le marqueur",
        };
        write!(f, "{}", message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    Found(T),
    Absent(AbsentReason),
}

impl<T> Extraction<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Extraction::Found(value) => Some(value),
            Extraction::Absent(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found(_))
    }

    pub fn reason(&self) -> Option<AbsentReason> {
        match self {
            Extraction::Found(_) => None,
            Extraction::Absent(reason) => Some(*reason),
        }
    }
}

pub fn extract_scores(response: &str) -> Extraction<DomainScoreSet> {
    let value = match locate_scores_json(response) {
        Some(value) => value,
        None => {
            let reason = if response.contains('{') {
                AbsentReason::MalformedJson
            } else {
                AbsentReason::NoJsonObject
            };
            return Extraction::Absent(reason);
        }
    };

    let object = match value.as_object() {
        Some(object) => object,
        None => return Extraction::Absent(AbsentReason::MalformedJson),
    };

    match DomainScoreSet::from_json_object(object) {
        Some(scores) => Extraction::Found(scores),
        None => Extraction::Absent(AbsentReason::MalformedJson),
    }
}

fn locate_scores_json(text: &str) -> Option<Value> {
    if let Some(idx) = text.find(SCORES_JSON_MARKER) {
        let tail = &text[idx + SCORES_JSON_MARKER.len()..];
        if let Some(value) = first_json_object(tail) {
            return Some(value);
        }
    }

    first_json_object(text).or_else(|| fenced_json_object(text))
}

fn first_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
    if let Some(Ok(value)) = stream.next() {
        if value.is_object() {
            return Some(value);
        }
    }

    // widest-slice retry, for objects split across the prose
    let end = text.rfind('}')?;
    if start < end {
        if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
            if value.is_object() {
                return Some(value);
            }
        }
    }
    None
}

fn fenced_json_object(text: &str) -> Option<Value> {
    for fence in ["```json", "```"] {
        if let Some(start) = text.find(fence) {
            let body = &text[start + fence.len()..];
            if let Some(end) = body.find("```") {
                if let Ok(value) = serde_json::from_str::<Value>(body[..end].trim()) {
                    if value.is_object() {
                        return Some(value);
                    }
                }
            }
        }
    }
    None
}

static QUOTED_CAPTURE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\s*"([^"]*)""#).unwrap());
static NEXT_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[A-Z][A-Za-z_ ]*:").unwrap());

pub fn extract_rewritten_message(response: &str) -> Extraction<String> {
    let idx = match response.find(IMPROVED_MESSAGE_MARKER) {
        Some(idx) => idx,
        None => return Extraction::Absent(AbsentReason::MissingMarker),
    };
    let tail = &response[idx + IMPROVED_MESSAGE_MARKER.len()..];

    if let Some(captures) = QUOTED_CAPTURE.captures(tail) {
        let candidate = captures[1].trim();
        return if candidate.is_empty() {
            Extraction::Absent(AbsentReason::EmptyCapture)
        } else {
            Extraction::Found(candidate.to_string())
        };
    }

    let span = match NEXT_MARKER.find(tail) {
        Some(marker) => &tail[..marker.start()],
        None => tail,
    };
    let cleaned = span
        .trim()
        .trim_start_matches(|c: char| c == '>' || c == '"' || c == '“')
        .trim_end_matches(|c: char| c == '"' || c == '”')
        .trim();

    if cleaned.is_empty() {
        Extraction::Absent(AbsentReason::EmptyCapture)
    } else {
        Extraction::Found(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_from_labeled_json_block() {
        let response = concat!(
            "Narrative summary of the evaluation.\n\n",
            "Scores_JSON: {\"Relational Anchoring\": 8, \"Narrative Integration\": 6}\n"
        );
        let scores = match extract_scores(response) {
            Extraction::Found(scores) => scores,
            Extraction::Absent(reason) => panic!("scores should be found, got {reason:?}"),
        };
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get("Relational Anchoring"), Some(8.0));
        assert_eq!(scores.get("Narrative Integration"), Some(6.0));
    }

    #[test]
    fn scores_preserve_response_key_order() {
        let response = "Scores_JSON: {\"Zeta\": 1, \"Alpha\": 2, \"Mu\": 3}";
        let scores = extract_scores(response).found().unwrap();
        let labels: Vec<&str> = scores.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn scores_without_marker_fall_back_to_any_object() {
        let response = "Here is the rubric result {\"Relational Anchoring\": 7.5} as requested.";
        let scores = extract_scores(response).found().unwrap();
        assert_eq!(scores.get("Relational Anchoring"), Some(7.5));
    }

    #[test]
    fn scores_from_fenced_block() {
        let response = "The scores follow.\n```json\n{\"Relational Anchoring\": 9}\n```\n";
        let scores = extract_scores(response).found().unwrap();
        assert_eq!(scores.get("Relational Anchoring"), Some(9.0));
    }

    #[test]
    fn scores_absent_without_json() {
        let extraction = extract_scores("no structured block in this answer");
        assert_eq!(extraction.reason(), Some(AbsentReason::NoJsonObject));
    }

    #[test]
    fn scores_absent_for_truncated_json() {
        let extraction = extract_scores("Scores_JSON: {\"Relational Anchoring\": 8,");
        assert_eq!(extraction.reason(), Some(AbsentReason::MalformedJson));
    }

    #[test]
    fn scores_absent_for_non_numeric_values() {
        let extraction = extract_scores("Scores_JSON: {\"Relational Anchoring\": \"high\"}");
        assert_eq!(extraction.reason(), Some(AbsentReason::MalformedJson));
    }

    #[test]
    fn out_of_range_scores_pass_through_unclamped() {
        let response = "Scores_JSON: {\"Relational Anchoring\": 14, \"Narrative Integration\": -2}";
        let scores = extract_scores(response).found().unwrap();
        assert_eq!(scores.get("Relational Anchoring"), Some(14.0));
        assert_eq!(scores.get("Narrative Integration"), Some(-2.0));
    }

    #[test]
    fn quoted_rewritten_message() {
        let response = concat!(
            "Summary first.\n",
            "Improved_Message: \"Hello world\"\n",
            "Scores_JSON: {\"Relational Anchoring\": 8}\n"
        );
        assert_eq!(
            extract_rewritten_message(response),
            Extraction::Found("Hello world".to_string())
        );
    }

    #[test]
    fn unquoted_rewritten_message_stops_at_next_marker() {
        let response = concat!(
            "Improved_Message:   Hello world  \n\n",
            "Scores_JSON: {\"Relational Anchoring\": 8}\n"
        );
        assert_eq!(
            extract_rewritten_message(response),
            Extraction::Found("Hello world".to_string())
        );
    }

    #[test]
    fn unquoted_rewritten_message_runs_to_end_of_text() {
        let response = "Improved_Message: Hello world";
        assert_eq!(
            extract_rewritten_message(response),
            Extraction::Found("Hello world".to_string())
        );
    }

    #[test]
    fn blockquote_prefix_is_trimmed() {
        let response = "Improved_Message:\n> Hello world\nScores_JSON: {}";
        assert_eq!(
            extract_rewritten_message(response),
            Extraction::Found("Hello world".to_string())
        );
    }

    #[test]
    fn rewritten_message_absent_without_marker() {
        let extraction = extract_rewritten_message("no marker in this answer");
        assert_eq!(extraction.reason(), Some(AbsentReason::MissingMarker));
    }

    #[test]
    fn rewritten_message_absent_for_empty_capture() {
        let extraction = extract_rewritten_message("Improved_Message:\nScores_JSON: {}");
        assert_eq!(extraction.reason(), Some(AbsentReason::EmptyCapture));
    }

    #[test]
    fn empty_quotes_are_an_empty_capture() {
        let extraction = extract_rewritten_message("Improved_Message: \"\" and then prose");
        assert_eq!(extraction.reason(), Some(AbsentReason::EmptyCapture));
    }
}
