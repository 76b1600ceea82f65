//! Run one agent instruction from the command line.
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/jot \
//!     jot-agent "file my shopping notes into a Groceries folder"
//! ```
//!
//! Backend selection and credentials come from ~/.config/jot/inference.toml
//! or JOT_* environment variables; see jot-inference.

use anyhow::{bail, Context};

use jot_agent::Agent;
use jot_core::GenerationBackend;
use jot_db::Database;
use jot_inference::{BackendKind, InferenceConfig, OllamaBackend, OpenAIBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let instruction = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if instruction.trim().is_empty() {
        bail!("usage: jot-agent <instruction>");
    }

    let config = InferenceConfig::load().context("Failed to load inference configuration")?;
    let backend: Box<dyn GenerationBackend> = match config.default {
        BackendKind::Ollama => {
            let section = config.ollama.clone().unwrap_or_default();
            Box::new(OllamaBackend::from_config(&section))
        }
        BackendKind::OpenAI => {
            let section = config.openai.clone().unwrap_or_default();
            Box::new(OpenAIBackend::new(section)?)
        }
    };

    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL is not set (e.g. postgres://localhost/jot)")?;
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    let agent = Agent::new(&db, backend);
    let report = agent.handle(&instruction).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}
