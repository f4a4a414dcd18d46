//! `chorus ask` — Interactive or single-question mode.

use chorus_core::error::PipelineError;
use chorus_core::query::Query;
use chorus_core::synthesis::SynthesizedResult;
use chorus_engine::Pipeline;
use chorus_memory::ANONYMOUS_USER;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use super::{KNOWLEDGE_KEY, load_config, snapshot_store};

pub struct AskOptions {
    pub user: Option<String>,
    pub expertise: Option<String>,
    pub json: bool,
}

impl AskOptions {
    fn query(&self, text: &str) -> Query {
        let mut query = Query::new(text);
        if let Some(user) = &self.user {
            query = query.with_user(user.clone());
        }
        if let Some(expertise) = &self.expertise {
            query = query.with_preference("expertise", expertise.clone());
        }
        query
    }
}

pub async fn run(message: Option<String>, options: AskOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    if config.capabilities.is_empty() {
        eprintln!();
        eprintln!("  ERROR: No capabilities configured!");
        eprintln!();
        eprintln!("  Add at least one backend to your config file:");
        eprintln!("    {}", chorus_config::AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        eprintln!("    [[capabilities]]");
        eprintln!("    name = \"openai\"");
        eprintln!("    model = \"gpt-4o-mini\"");
        eprintln!();
        return Err("No capabilities configured. See above for setup instructions.".into());
    }

    let pipeline = Pipeline::from_config(&config);
    let store = snapshot_store(&config);
    let user_id = options.user.clone().unwrap_or_else(|| ANONYMOUS_USER.to_string());

    if let Err(e) = pipeline.knowledge().restore(&store, KNOWLEDGE_KEY).await {
        warn!(error = %e, "Knowledge snapshot not loaded");
    }
    if let Err(e) = pipeline.memory().restore(&store, &user_id).await {
        warn!(error = %e, "Conversation memory not loaded");
    }

    if let Some(msg) = message {
        eprint!("  Thinking...");
        let outcome = pipeline.handle(&options.query(&msg)).await;
        eprint!("\r              \r");
        let result = outcome.map_err(describe)?;
        print_result(&result, options.json)?;
    } else {
        println!();
        println!("  ╔══════════════════════════════════════════════╗");
        println!("  ║          Chorus — Interactive Mode           ║");
        println!("  ╚══════════════════════════════════════════════╝");
        println!();
        for capability in pipeline.orchestrator().capabilities() {
            println!("  Capability: {} ({})", capability.tag, capability.model);
        }
        println!("  Knowledge:  {} entries", pipeline.knowledge().len());
        println!("  User:       {user_id}");
        println!();
        println!("  Type your question and press Enter.");
        println!("  Type 'exit' or Ctrl+C to quit.");
        println!();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("  You > ");
            use std::io::Write;
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            if text == "exit" || text == "quit" {
                break;
            }

            eprint!("  ...");
            let outcome = pipeline.handle(&options.query(text)).await;
            eprint!("\r     \r");
            match outcome {
                Ok(result) => {
                    println!();
                    print_result(&result, options.json)?;
                    println!();
                }
                Err(e) => eprintln!("  Error: {}", describe(e)),
            }
        }

        print_usage(&pipeline);
    }

    if let Err(e) = pipeline.memory().snapshot(&store, &user_id).await {
        warn!(error = %e, "Conversation memory not saved");
    }

    Ok(())
}

fn describe(error: PipelineError) -> String {
    match &error {
        PipelineError::AllCapabilitiesFailed { failures, .. } => {
            let detail: Vec<String> = failures.iter().map(ToString::to_string).collect();
            format!("[{}] {error}: {}", error.reason_code(), detail.join("; "))
        }
        _ => format!("[{}] {error}", error.reason_code()),
    }
}

fn print_result(result: &SynthesizedResult, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("{}", result.text);
    println!();
    println!(
        "  ─ {} via {} · confidence {:.2} · {} tokens · ${:.6}",
        result.strategy, result.source, result.confidence, result.total_tokens, result.estimated_cost_usd
    );
    for failure in &result.capability_failures {
        println!("  ─ skipped {failure}");
    }
    Ok(())
}

fn print_usage(pipeline: &Pipeline) {
    let rows = pipeline.ledger().snapshot();
    if rows.is_empty() {
        return;
    }
    println!();
    println!("📊 Session usage");
    println!("─────────────────────────────────────────────────────");
    for row in &rows {
        println!(
            "  {:<16} {:<28} {:>4} calls {:>8} tokens ${:.6}",
            row.backend, row.model, row.calls, row.tokens, row.cost_usd
        );
    }
    let totals = pipeline.ledger().totals();
    println!(
        "  {:<45} {:>4} calls {:>8} tokens ${:.6}",
        "total", totals.calls, totals.tokens, totals.cost_usd
    );
}
