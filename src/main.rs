//! khub - terminal front end for the Knowledge Hub directory
//!
//! # Commands
//! - `search [QUERY]`: list tools and AI apps whose names match QUERY
//! - `chat [MESSAGE]`: ask the assistant for tool recommendations
//! - `login`, `logout`, `whoami`: mock login gate
//! - `submit`, `submissions`: propose a new entry and list the local queue
//!
//! Logs go to stderr (`RUST_LOG=debug`), results to stdout.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use knowledge_hub::catalog::{CatalogEntry, EntryKind, SearchResults};
use knowledge_hub::chat::{Conversation, EXAMPLE_QUESTIONS, QUICK_TAGS};
use knowledge_hub::config::{default_data_dir, Config, DEFAULT_REPLY_DELAY_MS};
use knowledge_hub::error::{HubError, HubResult};
use knowledge_hub::notify::{notifier_for, DispatchConfig};
use knowledge_hub::recommend::{Recommendation, Recommender};
use knowledge_hub::session;
use knowledge_hub::storage::FileStore;
use knowledge_hub::submission::{self, Submission, SubmissionDraft};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info};

// ============================================================================
// CLI
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "khub", version, about = "Curated tool and AI app directory")]
struct Cli {
    /// Directory holding the local store (default: ~/.knowledge-hub)
    #[arg(long, env = "KHUB_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// JSON catalog to use instead of the built-in one
    #[arg(long, env = "KHUB_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// JSON keyword rule table to use instead of the built-in one
    #[arg(long, env = "KHUB_RULES", global = true)]
    rules: Option<PathBuf>,

    /// Skip the login gate
    #[arg(
        long,
        env = "KHUB_NO_LOGIN",
        global = true,
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_login: bool,

    /// Simulated thinking time before a chat reply, in milliseconds
    #[arg(long, env = "KHUB_REPLY_DELAY_MS", default_value_t = DEFAULT_REPLY_DELAY_MS, global = true)]
    delay_ms: u64,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List entries whose names match QUERY (all entries when omitted)
    Search { query: Option<String> },

    /// Get recommendations for MESSAGE, or chat interactively on stdin
    Chat { message: Option<String> },

    /// Remember a username (mock login, no verification)
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Forget the remembered username
    Logout,

    /// Show the remembered username
    Whoami,

    /// Propose a new tool or AI app
    Submit {
        #[arg(long, value_enum, default_value_t = CategoryArg::Tool)]
        category: CategoryArg,
        #[arg(long)]
        name: String,
        #[arg(long)]
        website: String,
        #[arg(long)]
        description: String,
        /// Tag for tools (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Usage scenario for AI apps (repeatable)
        #[arg(long = "scenario")]
        scenarios: Vec<String>,
    },

    /// List locally queued submissions
    Submissions,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CategoryArg {
    Tool,
    AiApp,
}

impl From<CategoryArg> for EntryKind {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Tool => EntryKind::Tool,
            CategoryArg::AiApp => EntryKind::AiApp,
        }
    }
}

impl Cli {
    fn to_config(&self) -> HubResult<Config> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };
        Ok(Config {
            data_dir,
            catalog_path: self.catalog.clone(),
            rules_path: self.rules.clone(),
            require_login: !self.no_login,
            reply_delay: Duration::from_millis(self.delay_ms),
            dispatch: DispatchConfig::from_env(),
        })
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> HubResult<()> {
    let config = cli.to_config()?;
    config.log_summary();

    let mut store = FileStore::open(&config.data_dir)?;

    match &cli.command {
        Command::Search { query } => {
            session::current_user(&store, config.require_login)?;
            let catalog = config.catalog()?;
            let results = catalog.search(query.as_deref().unwrap_or(""));
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_search(&results);
            }
        }

        Command::Chat { message } => {
            session::current_user(&store, config.require_login)?;
            let recommender = config.recommender()?;
            let mut chat = Conversation::new();
            match message {
                Some(message) => {
                    if !respond(&mut chat, message, &recommender, &config, cli.json)? {
                        info!("Nothing to answer for a blank message");
                    }
                }
                None => chat_loop(&mut chat, &recommender, &config, cli.json)?,
            }
        }

        Command::Login { username, password } => {
            let name = session::login(&mut store, username, password)?;
            println!("{} {}", "Logged in as".green(), name.bold());
        }

        Command::Logout => {
            if session::logout(&mut store)? {
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
        }

        Command::Whoami => match session::restore(&store) {
            Some(name) => println!("{}", name),
            None => return Err(HubError::LoginRequired),
        },

        Command::Submit {
            category,
            name,
            website,
            description,
            tags,
            scenarios,
        } => {
            let submitter = session::current_user(&store, config.require_login)?;

            let mut draft = SubmissionDraft::new((*category).into());
            draft.tool_name = name.clone();
            draft.website = website.clone();
            draft.description = description.clone();
            for tag in tags {
                if !draft.add_tag(tag) {
                    debug!("Skipping blank or duplicate tag {:?}", tag);
                }
            }
            for scenario in scenarios {
                if !draft.add_scenario(scenario) {
                    debug!("Skipping blank or duplicate scenario {:?}", scenario);
                }
            }

            let notifier = notifier_for(config.dispatch.clone());
            let receipt = submission::submit(&mut store, notifier.as_ref(), &draft, &submitter)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&receipt.submission)?);
            } else if receipt.notification.is_failure() {
                println!("{}", receipt.message().yellow());
            } else {
                println!("{}", receipt.message().green());
            }
        }

        Command::Submissions => {
            let queued = submission::queued(&store)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&queued)?);
            } else {
                print_submissions(&queued);
            }
        }
    }

    Ok(())
}

// ============================================================================
// Chat
// ============================================================================

/// Returns false when the input was blank and nothing was answered
fn respond(
    chat: &mut Conversation,
    input: &str,
    recommender: &Recommender,
    config: &Config,
    json: bool,
) -> HubResult<bool> {
    let Some(reply) = chat.send(input, recommender) else {
        return Ok(false);
    };

    if !config.reply_delay.is_zero() {
        eprintln!("{}", "AI 正在思考中...".italic().dimmed());
        thread::sleep(config.reply_delay);
    }

    if json {
        println!("{}", serde_json::to_string(reply)?);
    } else {
        println!("{}", reply.content);
        if let Some(recommendations) = &reply.recommendations {
            print_recommendations(recommendations);
        }
    }
    Ok(true)
}

fn chat_loop(
    chat: &mut Conversation,
    recommender: &Recommender,
    config: &Config,
    json: bool,
) -> HubResult<()> {
    if !json {
        print_chat_intro();
    }

    let stdin = io::stdin();
    loop {
        if !json {
            eprint!("{} ", ">".purple().bold());
            io::stderr().flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        respond(chat, &line, recommender, config, json)?;
    }

    debug!("Chat ended after {} message(s)", chat.messages().len());
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn print_chat_intro() {
    println!("{}", "AI 问答专区".bold());
    println!("输入需求，AI 将推荐合适的工具与应用");
    println!();
    println!("{}", "点击下方问题快速开始：".dimmed());
    for question in EXAMPLE_QUESTIONS {
        println!("  - {}", question);
    }
    println!("{} {}", "快捷需求".dimmed(), QUICK_TAGS.join(" | "));
    println!();
}

fn print_recommendations(recommendations: &[Recommendation]) {
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{} {}",
            format!("{}.", i + 1).purple().bold(),
            rec.name.bold()
        );
        println!("   {}", rec.url.blue().underline());
        println!("   {}", rec.reason.dimmed());
    }
}

fn print_search(results: &SearchResults<'_>) {
    let sections = [
        (EntryKind::Tool, &results.tools),
        (EntryKind::AiApp, &results.ai_apps),
    ];
    for (kind, entries) in sections {
        println!(
            "{} ({})",
            kind.section_title().bold(),
            entries.len()
        );
        for entry in entries.iter() {
            print_entry(kind, entry);
        }
        println!();
    }
    if results.is_empty() {
        println!("{}", format!("No entries match {:?}", results.query).yellow());
    }
}

fn print_entry(kind: EntryKind, entry: &CatalogEntry) {
    println!("  {}  {}", entry.name.green().bold(), entry.url.blue());
    if !entry.description.is_empty() {
        println!("      {}", entry.description);
    }
    if !entry.labels.is_empty() {
        println!(
            "      {}",
            format!("{}: {}", kind.label_name(), entry.labels.join(", ")).dimmed()
        );
    }
}

fn print_submissions(queued: &[Submission]) {
    if queued.is_empty() {
        println!("No queued submissions");
        return;
    }
    for s in queued {
        let labels = match s.category {
            EntryKind::Tool => &s.tags,
            EntryKind::AiApp => &s.scenarios,
        };
        println!(
            "{} [{}] {} {}",
            s.submitted_at.dimmed(),
            s.category.as_str(),
            s.tool_name.bold(),
            s.website.blue()
        );
        println!("    by {} - {}", s.submitter, s.description);
        if !labels.is_empty() {
            println!(
                "    {}",
                format!("{}: {}", s.category.label_name(), labels.join(", ")).dimmed()
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
