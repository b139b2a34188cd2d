use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clipix_config::{ClipixConfig, ConfigLoader};
use clipix_core::Stats;
use clipix_runtime::Assistant;

mod chat;
mod setup;
mod train;
mod trainer;

/// 🤖 Clipix: a personal assistant that learns from every answer
#[derive(Parser)]
#[command(name = "clipix", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to clipix.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive training menu
    Trainer,
    /// Interactive chat in the terminal
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// The question
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Start the HTTP API for the mobile client
    Serve {
        /// Address to listen on (overrides server.listen)
        #[arg(short = 'L', long)]
        listen: Option<String>,
    },
    /// Extract facts from every document in the documents folder
    Train {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Teach the assistant a fact
    Teach {
        /// Category to file the fact under (e.g. science, history)
        category: String,
        /// The fact
        #[arg(required = true, trailing_var_arg = true)]
        fact: Vec<String>,
    },
    /// Show knowledge base statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a config value in clipix.toml (dot-notation key)
    Set {
        /// Config key in dot notation (e.g. assistant.search_strategy)
        key: String,
        /// Value to set
        value: String,
    },
    /// Write a starter clipix.toml and create the documents folders
    Init {
        /// Overwrite an existing clipix.toml
        #[arg(long)]
        force: bool,
    },
    /// Check configuration and data files
    Doctor,
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    pub async fn run(self) -> clipix_core::Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level
                .as_deref()
                .unwrap_or(config.logging.level.as_str())
        };
        init_tracing(&config.logging.format, log_level);

        match self.command {
            Commands::Trainer => trainer::cmd_trainer(config_loader).await,
            Commands::Chat => chat::cmd_chat(config).await,
            Commands::Ask { question } => chat::cmd_ask(config, &question.join(" ")).await,
            Commands::Serve { listen } => Self::cmd_serve(config, listen).await,
            Commands::Train { yes } => train::cmd_train(&load_assistant(&config), yes),
            Commands::Teach { category, fact } => {
                Self::cmd_teach(config, &category, &fact.join(" "))
            }
            Commands::Stats { json } => Self::cmd_stats(config, json),
            Commands::Config { json } => Self::cmd_config(config, json),
            Commands::Set { key, value } => Self::cmd_config_set(&config_loader, &key, &value),
            Commands::Init { force } => setup::cmd_init(config_loader.path(), force),
            Commands::Doctor => setup::cmd_doctor(&config),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    async fn cmd_serve(mut config: ClipixConfig, listen: Option<String>) -> clipix_core::Result<()> {
        if let Some(listen) = listen {
            config.server.listen = listen;
        }

        println!("🤖 Clipix v{}", env!("CARGO_PKG_VERSION"));
        let started = Instant::now();
        let assistant = Assistant::from_config(&config);
        let load_time = started.elapsed();

        println!("   Knowledge: {} facts", assistant.total_facts());
        println!("   Google Search: {}", enabled_label(assistant.search_enabled()));
        println!("   DeepSeek: {}", enabled_label(assistant.llm_enabled()));
        println!("   Listening on http://{}", config.server.listen);
        if config.server.api_key.is_none() && !is_loopback(&config.server.listen) {
            eprintln!("⚠️  No server.api_key set; /api/* is open to anyone who can reach this address.");
        }
        println!();

        clipix_server::start_server(config.server, Arc::new(assistant), load_time).await
    }

    fn cmd_teach(config: ClipixConfig, category: &str, fact: &str) -> clipix_core::Result<()> {
        let assistant = load_assistant(&config);
        let outcome = assistant.teach(category, fact)?;
        println!("✅ Added to '{}': {}", outcome.category, outcome.fact);
        println!("   Knowledge base now holds {} facts", outcome.total_facts);
        Ok(())
    }

    fn cmd_stats(config: ClipixConfig, json: bool) -> clipix_core::Result<()> {
        let stats = load_assistant(&config).stats();
        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print_stats(&stats);
        }
        Ok(())
    }

    fn cmd_config(config: ClipixConfig, json: bool) -> clipix_core::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| clipix_core::ClipixError::Config(e.to_string()))?
            );
        }
        Ok(())
    }

    fn cmd_config_set(loader: &ConfigLoader, key: &str, value: &str) -> clipix_core::Result<()> {
        let old = if key.ends_with("api_key") || key.ends_with("engine_id") {
            loader.set_string(key, value)?
        } else {
            loader.set_value(key, value)?
        };
        match old {
            Some(old) => println!("✅ {key} = {value} (was {old})"),
            None => println!("✅ {key} = {value} (new)"),
        }
        Ok(())
    }

    fn cmd_completions(shell: Shell) -> clipix_core::Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "clipix", &mut std::io::stdout());
        Ok(())
    }
}

fn init_tracing(format: &str, level: &str) {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
    };
    match format {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .json()
            .with_target(true)
            .init(),
        "compact" => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .compact()
            .with_target(false)
            .init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_target(false)
            .init(),
    }
}

fn load_assistant(config: &ClipixConfig) -> Assistant {
    Assistant::from_config(config)
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled { "✅ Enabled" } else { "❌ Disabled" }
}

fn is_loopback(listen: &str) -> bool {
    listen.starts_with("127.") || listen.starts_with("localhost") || listen.starts_with("[::1]")
}

pub(crate) fn print_stats(stats: &Stats) {
    println!();
    println!("{}", console::style("📊 AI KNOWLEDGE STATISTICS").bold());
    println!("{}", "=".repeat(30));
    println!("Total Facts: {}", stats.total_facts);
    println!("Google Search: {}", enabled_label(stats.search_enabled));
    println!("DeepSeek: {}", enabled_label(stats.llm_enabled));

    if !stats.topics.is_empty() {
        println!();
        println!("📁 Topics:");
        for (topic, count) in &stats.topics {
            println!("  {topic}: {count} facts");
        }
    }
}
