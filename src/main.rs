//! AI Agents Hub - terminal entry point

use agents_hub::config::HubConfig;
use agents_hub::controller::{ChatController, TurnOutcome};
use agents_hub::llm::provider::LlmProvider;
use agents_hub::llm::providers::{provider_from_config, UnconfiguredProvider};
use agents_hub::observability::init_default_logging;
use agents_hub::registry::AgentRegistry;
use agents_hub::render::{agent_list, format_message};
use agents_hub::routing::{FallbackPolicy, MessageRouter};
use agents_hub::tools::ToolSystem;
use agents_hub::LlmSettings;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

/// Mention-based chat hub for a team of LLM agents
#[derive(Parser)]
#[command(name = "agents-hub")]
#[command(about = "Route @mention tasks to specialised LLM agents")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "AGENTS_HUB_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session on stdin
    Chat,
    /// Send one message and print the resulting transcript entries
    Ask {
        /// Message, e.g. "@recon 22/tcp open ssh"
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// List registered agents
    Agents,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging(cli.verbose);

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Chat => run_chat(config).await,
        Commands::Ask { message } => run_ask(config, message.join(" ")).await,
        Commands::Agents => list_agents(config),
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("{e}");
        process::exit(1);
    }
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<HubConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(HubConfig::load_from_file(path)?)
        }
        None => {
            for path_str in ["agents-hub.toml", "config/agents-hub.toml"] {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(HubConfig::load_from_file(&path)?);
                }
            }

            info!("No configuration file found, using defaults");
            Ok(HubConfig::default())
        }
    }
}

/// Bootstrap: provider, tools, registry, router and controller
fn build_controller(
    config: &HubConfig,
    llm: Arc<dyn LlmProvider>,
) -> Result<ChatController, Box<dyn std::error::Error>> {
    let tools = Arc::new(ToolSystem::with_builtins());
    let registry = AgentRegistry::builtin(llm, LlmSettings::from(&config.llm), tools)?;
    let router = MessageRouter::new(Arc::new(registry), FallbackPolicy::from(&config.hub));
    Ok(ChatController::new(router, config.hub.name.clone())?)
}

fn print_new_entries(controller: &ChatController, seen: &mut usize) {
    let entries = controller.messages_since(*seen);
    *seen += entries.len();
    for entry in &entries {
        println!("{}", format_message(entry));
    }
}

async fn run_chat(config: HubConfig) -> Result<(), Box<dyn std::error::Error>> {
    let llm = provider_from_config(&config)?;
    let controller = build_controller(&config, llm)?;

    let mut notifications = controller.subscribe();
    tokio::spawn(async move {
        while let Ok(notification) = notifications.recv().await {
            eprintln!("! {}: {}", notification.title, notification.description);
        }
    });

    let mut seen = 0;
    print_new_entries(&controller, &mut seen);
    println!("Type /agents to list agents, /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/agents" => {
                println!("{}", agent_list(&controller.registry().agents()));
                continue;
            }
            _ => {}
        }

        if let Some(notice) = controller.working_notice(&line) {
            println!("... {notice}");
        }
        if controller.submit(&line).await == TurnOutcome::Busy {
            warn!("Input dropped while an agent was working");
        }
        print_new_entries(&controller, &mut seen);
    }

    info!("Chat session ended");
    Ok(())
}

async fn run_ask(config: HubConfig, message: String) -> Result<(), Box<dyn std::error::Error>> {
    let llm = provider_from_config(&config)?;
    let controller = build_controller(&config, llm)?;

    // Skip the welcome message
    let mut seen = controller.transcript().len();
    let outcome = controller.submit(&message).await;
    print_new_entries(&controller, &mut seen);

    match outcome {
        TurnOutcome::Completed { .. } => Ok(()),
        TurnOutcome::Ignored => Err("Nothing to send: the message is empty".into()),
        TurnOutcome::Unrouted => Err("The message was not routed to any agent".into()),
        TurnOutcome::Failed { tag, .. } => Err(format!("{tag} failed to complete the task").into()),
        TurnOutcome::Busy => Err("Another task is in progress".into()),
    }
}

fn list_agents(config: HubConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Listing never calls the LLM, so a missing API key is fine here
    let llm: Arc<dyn LlmProvider> = match provider_from_config(&config) {
        Ok(llm) => llm,
        Err(e) => Arc::new(UnconfiguredProvider::new(e.to_string())),
    };
    let controller = build_controller(&config, llm)?;
    println!("{}", agent_list(&controller.registry().agents()));
    Ok(())
}

fn handle_config_command(config: HubConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
    }

    if let Err(e) = config.get_llm_api_key() {
        warn!("{}", e);
        println!("Warning: {e}");
    }

    println!("Configuration is valid");
    Ok(())
}
