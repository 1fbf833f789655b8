use std::sync::Arc;

use clap::{Parser, Subcommand};

use harmonbot::application::commands::{self, CommandContext};
use harmonbot::application::errors::BotError;
use harmonbot::application::messaging::{MessageDispatcher, MessageParser};
use harmonbot::application::services::{CalculatorService, CommandService, MessageService};
use harmonbot::domain::entities::Platform;
use harmonbot::infrastructure::adapters::ConsoleAdapter;
use harmonbot::infrastructure::apis::{AstronomyApi, FinanceApi, OverwatchApi};
use harmonbot::infrastructure::config::Config;
use harmonbot::infrastructure::http::ApiClient;
use harmonbot::infrastructure::sandbox::{self, Supervisor, WorkerCommand};
use harmonbot::infrastructure::storage::JsonStore;

#[derive(Parser)]
#[command(name = "harmonbot")]
#[command(about = "Discord and Twitch chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot, reading chat lines from stdin
    Run {
        /// Platform to emulate (overrides config)
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Channel incoming lines belong to
        #[arg(long)]
        channel: Option<String>,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Evaluate one expression from stdin (used by the calculator)
    #[command(name = "eval-worker", hide = true)]
    EvalWorker,
}

fn main() {
    // Logs go to stderr; stdout carries replies and worker output
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { platform, channel } => run_bot(&cli.config, platform, channel),
        Commands::Version => {
            println!("harmonbot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        Commands::EvalWorker => sandbox::worker::run(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn run_bot(config_path: &str, platform: Option<Platform>, channel: Option<String>) -> Result<(), BotError> {
    let mut config = load_config(config_path);
    if let Some(platform) = platform {
        config.bot.platform = platform;
    }
    let platform = config.bot.platform;

    let channel = channel.unwrap_or_else(|| match platform {
        Platform::Twitch => config
            .twitch
            .channels
            .first()
            .cloned()
            .unwrap_or_else(|| "console".to_string()),
        Platform::Discord => "console".to_string(),
    });

    tracing::info!("Starting {} for {} in {}", config.bot.name, platform, channel);
    for counter in config.counters_for(&channel) {
        tracing::info!("Counter {}{} tracks {}", config.bot.prefix, counter.command, counter.variable);
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let store = JsonStore::new(&config.storage.data_dir);
        store.init().await?;

        let client = Arc::new(ApiClient::new(&config.apis).map_err(|e| BotError::Network(e.to_string()))?);
        let worker = WorkerCommand::current_exe().map_err(|e| BotError::Internal(e.to_string()))?;
        let supervisor = Supervisor::new(worker, config.calculator.timeout(), config.calculator.max_workers);

        let ctx = CommandContext {
            calculator: Arc::new(CalculatorService::new(supervisor)),
            finance: Arc::new(FinanceApi::new(client.clone(), config.apis.fixer_api_key.clone())),
            astronomy: Arc::new(AstronomyApi::new(client.clone())),
            overwatch: Arc::new(OverwatchApi::new(client)),
            bot_name: config.bot.name.to_lowercase(),
        };

        let mut commands = CommandService::new(&config.bot.prefix);
        commands::register_all(&mut commands, &ctx, platform);

        let parser = MessageParser::new(&config.bot.prefix, platform);
        let dispatcher = MessageDispatcher::new(parser, commands, Arc::new(store))
            .with_counters(config.twitch.counters.clone());

        let bot = ConsoleAdapter::new(&config.bot.name, platform).with_channel(channel);
        MessageService::new(bot, dispatcher).run().await
    })
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).map_err(|e| BotError::Internal(e.to_string()))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
