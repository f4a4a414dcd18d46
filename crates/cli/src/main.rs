//! Chorus CLI — the main entry point.
//!
//! Commands:
//! - `onboard`       — Initialize config directory and default config
//! - `ask`           — Interactive or single-question mode
//! - `classify`      — Show how a query would be classified
//! - `knowledge`     — Search and manage the knowledge index
//! - `usage`         — Model pricing and cost estimates
//! - `capabilities`  — List configured generation backends

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "chorus",
    about = "Chorus — ask several models at once, get one answer",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Ask a question
    Ask {
        /// Ask a single question instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// User id that keys conversation memory
        #[arg(short, long, env = "CHORUS_USER")]
        user: Option<String>,

        /// Comma-separated expertise used to rank background knowledge
        #[arg(long)]
        expertise: Option<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a query without calling any backend
    Classify {
        text: String,

        /// Number of prior context turns to assume
        #[arg(long, default_value_t = 0)]
        context_turns: usize,
    },

    /// Knowledge index management
    Knowledge {
        #[command(subcommand)]
        action: KnowledgeAction,
    },

    /// Pricing and cost estimates
    Usage {
        #[command(subcommand)]
        action: UsageAction,
    },

    /// List configured capabilities
    Capabilities {
        /// Run each provider's health check
        #[arg(long)]
        check: bool,
    },
}

#[derive(Subcommand)]
enum KnowledgeAction {
    /// Search the index
    Search {
        query: String,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
        /// Domain hint (e.g. programming, business)
        #[arg(short, long)]
        domain: Option<String>,
    },
    /// Add an entry and persist the index
    Add {
        title: String,
        body: String,
        #[arg(short, long)]
        domain: Option<String>,
        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
        #[arg(short, long, default_value_t = 0.5)]
        quality: f64,
    },
    /// List every entry
    List,
    /// Index statistics
    Stats,
}

#[derive(Subcommand)]
enum UsageAction {
    /// List model pricing
    Pricing,
    /// Estimate the cost of a total token count
    Estimate { model: String, tokens: u32 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Ask {
            message,
            user,
            expertise,
            json,
        } => {
            let options = commands::ask::AskOptions {
                user,
                expertise,
                json,
            };
            commands::ask::run(message, options).await?
        }
        Commands::Classify {
            text,
            context_turns,
        } => commands::classify::run(&text, context_turns)?,
        Commands::Knowledge { action } => match action {
            KnowledgeAction::Search {
                query,
                limit,
                domain,
            } => commands::knowledge::search(&query, limit, domain.as_deref()).await?,
            KnowledgeAction::Add {
                title,
                body,
                domain,
                tags,
                quality,
            } => {
                commands::knowledge::add(&title, &body, domain.as_deref(), tags.as_deref(), quality)
                    .await?
            }
            KnowledgeAction::List => commands::knowledge::list().await?,
            KnowledgeAction::Stats => commands::knowledge::stats().await?,
        },
        Commands::Usage { action } => match action {
            UsageAction::Pricing => commands::usage::pricing()?,
            UsageAction::Estimate { model, tokens } => commands::usage::estimate(&model, tokens)?,
        },
        Commands::Capabilities { check } => commands::capabilities::run(check).await?,
    }

    Ok(())
}
