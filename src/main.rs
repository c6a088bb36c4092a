use anyhow::Context;
use clap::{Parser, Subcommand};
use resonance::domain::{Domain, EvaluationRequest, Persona, Tone};
use resonance::evaluation::{
    extract_rewritten_message, extract_scores, EvaluationPipeline, Extraction, OpenAiLLMClient,
    PromptTemplate, DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
use resonance::report::render_report;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "resonance", version, about = "Analyse cognitive-linguistique de messages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    Analyze {
        #[arg(long, conflicts_with = "file")]
        message: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value = "caregiving_women")]
        persona: String,
        #[arg(long, default_value = "empathetic")]
        tone: String,
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,
        #[arg(long)]
        json: bool,
    },
    Extract {
        #[arg(long)]
        file: PathBuf,
    },
    Domains,
    Personas,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Analyze {
            message,
            file,
            persona,
            tone,
            endpoint,
            model,
            api_key,
            json,
        } => {
            let message = match (message, file) {
                (Some(message), _) => message,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("impossible de lire le message depuis {:?}", path))?,
                (None, None) => anyhow::bail!("fournir --message ou --file"),
            };
            let message = message.trim().to_string();
            anyhow::ensure!(!message.is_empty(), "le message ne peut pas être vide");

            let persona = Persona::from_str(&persona)?;
            let tone = Tone::from_str(&tone)?;
            let request = EvaluationRequest::new(message, persona, tone);
            info!(request = %request.id, %persona, %tone, "analyse du message");

            let llm = OpenAiLLMClient::new(endpoint, model, api_key)?;
            let pipeline = EvaluationPipeline::new(Arc::new(llm), PromptTemplate::default());
            let outcome = pipeline.run(&request);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", render_report(&outcome));
            }
        }
        Commands::Extract { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("impossible de lire la réponse depuis {:?}", file))?;
            let report = serde_json::json!({
                "scores": extraction_json(&extract_scores(&raw))?,
                "rewritten_message": extraction_json(&extract_rewritten_message(&raw))?,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Domains => {
            for domain in Domain::all() {
                let meta = domain.metadata();
                println!("{:<34} {:<34} {}", meta.name, meta.label, meta.description);
            }
        }
        Commands::Personas => {
            println!("Personas :");
            for persona in Persona::all() {
                println!("  {:<28} {}", persona.name(), persona.label());
            }
            println!("Tons :");
            for tone in Tone::all() {
                println!("  {:<28} {}", tone.name(), tone.label());
            }
        }
    }

    Ok(())
}

fn extraction_json<T: Serialize>(extraction: &Extraction<T>) -> anyhow::Result<serde_json::Value> {
    Ok(match extraction {
        Extraction::Found(value) => serde_json::json!({ "found": serde_json::to_value(value)? }),
        Extraction::Absent(reason) => serde_json::json!({ "absent": reason }),
    })
}
