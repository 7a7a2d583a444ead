mod repl;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use gyaan_chat::{ChatService, DashboardView, TurnOutcome, UiStrings};
use gyaan_config::{Config, ConfigManager, LogLevel};
use gyaan_observability::LogManager;

use crate::repl::{Mode, ReplCommand, HELP};

#[derive(Parser)]
#[command(name = "gyaan")]
#[command(about = "Class-safe, persona-driven wisdom chat")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    debug: bool,

    /// Config file path
    #[arg(long, env = "GYAAN_CONFIG", default_value = "~/.gyaan/config.json")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat
    Chat(ChatArgs),
    /// Show aggregated analytics
    Dashboard {
        /// Write the raw analytics log to this file
        #[arg(long)]
        export_analytics: Option<PathBuf>,
    },
    /// Configuration commands
    Config(ConfigArgs),
}

#[derive(Args, Clone, Default)]
struct ChatArgs {
    /// Model id
    #[arg(long)]
    model: Option<String>,

    /// Answer length target in words
    #[arg(long)]
    words: Option<u32>,

    /// Response language
    #[arg(long)]
    language: Option<String>,

    /// Turn off class-safe moderation
    #[arg(long, default_value = "false")]
    no_moderation: bool,

    /// One-minute reflection before the chat starts
    #[arg(long, default_value = "false")]
    reflect: bool,
}

#[derive(Args, Clone)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Read a value (e.g. chat.word_target, llm.model)
    Get { key: String },
    /// Set a value (e.g. chat.word_target, llm.model)
    Set { key: String, value: String },
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// Print the current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = gyaan_config::expand_tilde(&cli.config)
        .unwrap_or_else(|| PathBuf::from(&cli.config));

    match cli.command {
        Commands::Chat(args) => {
            let config = load_config(&config_path, Some(&args)).await?;
            let _log = init_logging(&config, cli.debug);
            run_chat(&config, args.reflect).await
        }
        Commands::Dashboard { export_analytics } => {
            let config = load_config(&config_path, None).await?;
            let _log = init_logging(&config, cli.debug);
            run_dashboard(&config, export_analytics.as_deref()).await
        }
        Commands::Config(args) => handle_config(args, &config_path, cli.debug).await,
    }
}

async fn load_config(path: &Path, overrides: Option<&ChatArgs>) -> anyhow::Result<Config> {
    let manager = ConfigManager::load(path).await?;
    let mut config = manager.snapshot().await;
    if let Some(args) = overrides {
        apply_overrides(&mut config, args)?;
    }
    Ok(config)
}

/// Command-line flags win over the file for this run only.
fn apply_overrides(config: &mut Config, args: &ChatArgs) -> anyhow::Result<()> {
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    if let Some(words) = args.words {
        config.chat.word_target = words;
    }
    if let Some(language) = &args.language {
        config.chat.language = language.clone();
    }
    if args.no_moderation {
        config.chat.moderation_enabled = false;
    }
    if args.reflect {
        config.chat.daily_reflection = true;
    }
    ConfigManager::validate(config)?;
    Ok(())
}

fn init_logging(config: &Config, debug: bool) -> Option<LogManager> {
    let level = debug.then_some(LogLevel::Debug);
    match LogManager::init(&config.logging, level) {
        Ok(manager) => Some(manager),
        Err(e) => {
            eprintln!("{}", format!("⚠️  Logging disabled: {}", e).yellow());
            None
        }
    }
}

async fn run_chat(config: &Config, reflect: bool) -> anyhow::Result<()> {
    let mut service = ChatService::from_config(config)?;
    let strings = service.strings();
    tracing::debug!(
        model = %config.llm.model,
        words = config.chat.word_target,
        moderation = config.chat.moderation_enabled,
        "starting chat"
    );

    println!("{}", strings.title.cyan().bold());
    println!("{}", strings.disclaimer.dimmed());
    if !config.chat.moderation_enabled {
        println!("{}", "Moderation is off for this session.".yellow());
    }
    println!("{}", "Type /help for commands, /quit to leave".dimmed());
    println!();

    if reflect || config.chat.daily_reflection {
        daily_reflection(strings).await?;
    }

    let mut session = service.start_session().await;
    if let Some(welcome) = session.turns().next() {
        print_assistant(&welcome.content);
    }

    let mut mode = Mode::Chat;
    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        match ReplCommand::parse(&input) {
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{}", HELP.dimmed()),
            ReplCommand::Mode(next) => {
                mode = next;
                match mode {
                    Mode::Dashboard => match service.dashboard().await {
                        Ok(view) => print_dashboard(strings, &view),
                        Err(e) => println!("{}", format!("❌ Could not read analytics: {}", e).red()),
                    },
                    Mode::Chat => {
                        service.refresh_preamble(&mut session);
                        println!("{}", "Back to chat.".dimmed());
                    }
                }
            }
            ReplCommand::ExportTranscript(path) => {
                let result = match service.export_transcript(&session) {
                    Ok(bytes) => write_export(&path, &bytes).await,
                    Err(e) => Err(e.into()),
                };
                report_export(strings.exp_transcript, &path, result);
            }
            ReplCommand::ExportAnalytics(path) => match service.export_analytics().await {
                Ok(Some(bytes)) => {
                    let result = write_export(&path, &bytes).await;
                    report_export(strings.exp_analytics, &path, result);
                }
                Ok(None) => println!("{}", strings.no_analytics.yellow()),
                Err(e) => println!("{}", format!("❌ {}", e).red()),
            },
            ReplCommand::Words(words) => match service.settings_mut().set_word_target(words) {
                Ok(()) => println!("{}", format!("Word target set to {}", words).dimmed()),
                Err(e) => println!("{}", format!("❌ {}", e).red()),
            },
            ReplCommand::Invalid(message) => println!("{}", message.red()),
            ReplCommand::Message(_) if mode == Mode::Dashboard => {
                println!("{}", "Dashboard mode. Use /mode chat to ask a question.".dimmed());
            }
            ReplCommand::Message(text) => {
                if text.is_empty() {
                    continue;
                }
                println!("{}", strings.thinking.dimmed());
                let outcome = service.handle_turn(&mut session, &text).await;
                print_outcome(strings, outcome);
            }
        }
        println!();
    }

    println!("{}", strings.footer.dimmed());
    println!("{}", "👋 Goodbye!".cyan());
    Ok(())
}

fn print_outcome(strings: &UiStrings, outcome: TurnOutcome) {
    match outcome {
        TurnOutcome::Ignored => {}
        TurnOutcome::Blocked { reply } => {
            println!("{}", format!("⚠️  {}", strings.blocked).yellow());
            print_assistant(&reply);
        }
        TurnOutcome::Unavailable { reason } => println!("{}", format!("❌ {}", reason).red()),
        TurnOutcome::ServiceError { message } => println!("{}", format!("❌ {}", message).red()),
        TurnOutcome::Answered { content, .. } => print_assistant(&content),
    }
}

fn print_assistant(content: &str) {
    println!("{}", "Gyaan:".green().bold());
    println!("{}", content);
}

/// Sixty short ticks, roughly one second of progress.
async fn daily_reflection(strings: &UiStrings) -> anyhow::Result<()> {
    println!("{}", format!("🕯️ {}", strings.reflect_title).bold());
    println!("{}", strings.reflect_body);

    let mut stdout = io::stdout();
    for tick in 1..=60 {
        let filled = tick / 3;
        print!("\r[{}{}] {:>3}%", "#".repeat(filled), " ".repeat(20 - filled), tick * 100 / 60);
        stdout.flush()?;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    println!();
    println!("{}", strings.reflect_done.green());
    println!();
    Ok(())
}

async fn run_dashboard(config: &Config, export: Option<&Path>) -> anyhow::Result<()> {
    let service = ChatService::from_config(config)?;
    let strings = service.strings();

    let view = service.dashboard().await?;
    print_dashboard(strings, &view);

    if let Some(path) = export {
        match service.export_analytics().await? {
            Some(bytes) => {
                let result = write_export(path, &bytes).await;
                report_export(strings.exp_analytics, path, result);
            }
            None => println!("{}", strings.no_analytics.yellow()),
        }
    }
    Ok(())
}

fn print_dashboard(strings: &UiStrings, view: &DashboardView) {
    let summary = &view.summary;
    let [questions, blocks, languages] = strings.dash_metrics;

    println!("{}", strings.dash_title.cyan().bold());
    println!("{}", strings.dash_sub.dimmed());
    println!();
    println!("  {:<10} {}", format!("{}:", questions).bold(), summary.question_count);
    println!("  {:<10} {}", format!("{}:", blocks).bold(), summary.blocked_count);
    println!("  {:<10} {}", format!("{}:", languages).bold(), format_languages(&summary.languages));
    println!(
        "{}",
        format!(
            "  {} sessions, {} records",
            summary.unique_sessions, summary.total_records
        )
        .dimmed()
    );
    if let Some(rate) = summary.block_rate() {
        println!("{}", format!("  block rate {:.1}%", rate * 100.0).dimmed());
    }
}

/// `en: 4, hi: 2`, or `-` for an empty log.
fn format_languages(languages: &BTreeMap<String, usize>) -> String {
    if languages.is_empty() {
        return "-".to_string();
    }
    languages
        .iter()
        .map(|(lang, count)| format!("{}: {}", lang, count))
        .collect::<Vec<_>>()
        .join(", ")
}

async fn write_export(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

fn report_export(label: &str, path: &Path, result: anyhow::Result<()>) {
    match result {
        Ok(()) => println!("{}", format!("✅ {} saved to {:?}", label, path).green()),
        Err(e) => println!("{}", format!("❌ {} failed: {}", label, e).red()),
    }
}

async fn handle_config(args: ConfigArgs, config_path: &Path, debug: bool) -> anyhow::Result<()> {
    if debug {
        eprintln!("{}", format!("[DEBUG] Config path: {:?}", config_path).dimmed());
    }

    match args.command {
        ConfigCommands::Get { key } => {
            let manager = ConfigManager::load(config_path).await?;
            let config = manager.snapshot().await;

            match config.get_value(&key) {
                Some(value) => println!("{}", format!("{} = {}", key, value).green()),
                None => {
                    println!("{}", format!("❌ Key not found or unset: {}", key).red());
                    std::process::exit(1);
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            let manager = ConfigManager::load(config_path).await?;
            if let Err(e) = manager.set_value(&key, &value).await {
                eprintln!("{}", format!("❌ Failed to set value: {}", e).red());
                std::process::exit(1);
            }
            println!("{}", format!("✅ Set {} = {}", key, value).green());
        }
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                println!("{}", format!("⚠️  Config already exists at {:?}", config_path).yellow());
                println!("{}", "Use --force to overwrite".dimmed());
                return Ok(());
            }

            let config = Config::default();
            if let Ok(data_dir) = config.storage.analytics_path() {
                if let Some(dir) = data_dir.parent() {
                    tokio::fs::create_dir_all(dir).await?;
                }
            }
            let manager = ConfigManager::new(config, config_path.to_path_buf());
            manager.save().await?;

            println!("{}", format!("✅ Config initialized at {:?}", config_path).green());
            println!("{}", "You can edit this file to customize your settings".dimmed());
        }
        ConfigCommands::Show => {
            let manager = ConfigManager::load(config_path).await?;
            let config = manager.snapshot().await;

            println!("{}", "📋 Current Configuration:".cyan().bold());
            println!();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
