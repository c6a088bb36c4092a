use crate::domain::DomainScoreSet;
use crate::evaluation::{EvaluationOutcome, PassOutcome};

const BAR_WIDTH: usize = 10;

pub fn render_report(outcome: &EvaluationOutcome) -> String {
    let mut out = String::new();

    push_section(&mut out, "Message original");
    out.push_str(&format!("Persona : {}\n", outcome.persona.label()));
    out.push_str(&format!("Ton : {}\n", outcome.tone.label()));
    out.push_str(&format!(
        "Généré le : {}\n\n",
        outcome.completed_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push_str(&outcome.message);
    out.push('\n');

    push_section(&mut out, "Évaluation du message original");
    render_pass(&mut out, outcome.original.as_ref());

    push_section(&mut out, "Message amélioré");
    match &outcome.rewritten_message {
        Some(text) => {
            out.push_str(text);
            out.push('\n');
        }
        None => out.push_str("(aucune version améliorée extraite)\n"),
    }

    push_section(&mut out, "Évaluation du message amélioré");
    render_pass(&mut out, outcome.improved.as_ref());

    let original_scores = outcome.original.as_ref().and_then(|p| p.scores.as_ref());
    let improved_scores = outcome.improved.as_ref().and_then(|p| p.scores.as_ref());
    if let (Some(original), Some(improved)) = (original_scores, improved_scores) {
        push_section(&mut out, "Comparaison des scores par domaine");
        out.push_str(&format!(
            "Score agrégé : {:.1} → {:.1} ({:+.1})\n\n",
            original.aggregate(),
            improved.aggregate(),
            improved.aggregate() - original.aggregate()
        ));
        render_comparison(&mut out, original, improved);
    }

    out
}

fn push_section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.chars().count()));
    out.push('\n');
}

fn render_pass(out: &mut String, pass: Option<&PassOutcome>) {
    let pass = match pass {
        Some(pass) => pass,
        None => {
            out.push_str("Évaluation indisponible (échec de l'appel au service distant).\n");
            return;
        }
    };

    match &pass.scores {
        Some(scores) => {
            if let Some(aggregate) = pass.aggregate {
                out.push_str(&format!("Score agrégé : {aggregate:.1}/10\n"));
            }
            for (label, score) in scores.iter() {
                out.push_str(&format!("  - {label} : {score:.1}\n"));
            }
        }
        None => out.push_str("(scores introuvables dans la réponse)\n"),
    }

    out.push_str("\nRéponse complète :\n");
    out.push_str(pass.raw_response.trim_end());
    out.push('\n');
}

// Rows follow the original score set's key order; a domain missing from the
// improved set is charted at 0, like the original dashboard's comparison frame.
fn render_comparison(out: &mut String, original: &DomainScoreSet, improved: &DomainScoreSet) {
    for (label, score) in original.iter() {
        let improved_score = improved.get(label).unwrap_or(0.0);
        out.push_str(&format!(
            "{label:<34} original  {} {score:>4.1}\n",
            bar(score)
        ));
        out.push_str(&format!(
            "{:<34} amélioré  {} {improved_score:>4.1}\n",
            "",
            bar(improved_score)
        ));
    }
}

fn bar(score: f64) -> String {
    let filled = (score.clamp(0.0, 10.0).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}
