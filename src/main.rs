//! Promma main entry point
//!
//! Command-line interface for the Promma prompt library and web digest.

mod commands;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use commands::Context;
use promma::config::load_config_from_env;
use tracing_subscriber::EnvFilter;

/// Promma: a prompt library with LLM-assisted generation, search and web digests
#[derive(Parser, Debug)]
#[command(name = "promma")]
#[command(version)]
#[command(about = "A prompt library manager with AI-assisted tooling", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List prompts, optionally filtered by category or tag
    #[command(visible_alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show a prompt
    #[command(visible_alias = "v")]
    View { id: i64 },

    /// Create a prompt; asks for any field not given
    #[command(visible_alias = "add")]
    Create {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a prompt
    #[command(visible_alias = "rm")]
    Delete {
        id: i64,

        /// Skip the confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Keyword search over all prompt fields
    #[command(visible_alias = "s")]
    Search { keyword: String },

    /// List categories
    #[command(visible_alias = "cat")]
    Categories,

    /// List tags
    #[command(visible_alias = "t")]
    Tags,

    /// Generate a prompt from a description
    #[command(visible_alias = "gen")]
    Generate { input: Option<String> },

    /// Print a prompt as text, md or json
    #[command(visible_alias = "ex")]
    Export {
        id: i64,

        #[arg(default_value = "text")]
        format: String,
    },

    /// Show or set the Gemini API key
    #[command(visible_alias = "conf")]
    Config {
        /// Show the current configuration
        #[arg(long)]
        show: bool,

        /// Save this API key
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
    },

    /// Semantic search ranked by the model
    #[command(visible_alias = "ai")]
    AiSearch {
        query: String,

        #[arg(short, long, default_value_t = promma::library::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Delete every prompt
    #[command(visible_alias = "clear")]
    ClearAll {
        /// Skip the confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Summarize a web page and browse its links
    Digest {
        url: String,

        /// Extra instruction placed before the summarization prompt
        instruction: Option<String>,

        /// Follow same-domain links this many hops (0 = the page only)
        #[arg(short, long, default_value_t = 0)]
        depth: u32,

        /// Only the given page, with a smaller content limit
        #[arg(long, conflicts_with = "depth")]
        single_page: bool,
    },

    /// Browse digest history
    #[command(visible_alias = "hist")]
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Import prompts from a JSON array file
    #[command(visible_alias = "imp")]
    Import { file: std::path::PathBuf },

    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides the config file)
        #[arg(long, env = "PROMMA_BIND")]
        bind: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Show one entry, then copy or delete it
    Show { id: i64 },

    /// Delete one entry
    Delete { id: i64 },

    /// Delete every entry
    Clear {
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_dir) = load_config_from_env().context("failed to load configuration")?;
    tracing::debug!("Config directory: {}", config_dir.display());
    let ctx = Context::new(config, config_dir);

    match cli.command {
        Command::List { category, tag } => commands::prompts::list(&ctx, category, tag),
        Command::View { id } => commands::prompts::view(&ctx, id),
        Command::Create {
            title,
            description,
            content,
            category,
            tags,
        } => commands::prompts::create(
            &ctx,
            promma::storage::NewPrompt {
                title: title.unwrap_or_default(),
                description,
                content: content.unwrap_or_default(),
                category,
                tags,
            },
        ),
        Command::Delete { id, yes } => commands::prompts::delete(&ctx, id, yes),
        Command::Search { keyword } => commands::prompts::search(&ctx, &keyword),
        Command::Categories => commands::prompts::categories(&ctx),
        Command::Tags => commands::prompts::tags(&ctx),
        Command::Generate { input } => commands::ai::generate(&ctx, input).await,
        Command::Export { id, format } => commands::prompts::export(&ctx, id, &format),
        Command::Config { show, api_key } => commands::settings::run(&ctx, show, api_key),
        Command::AiSearch { query, limit } => commands::ai::search(&ctx, &query, limit).await,
        Command::ClearAll { yes } => commands::prompts::clear_all(&ctx, yes),
        Command::Digest {
            url,
            instruction,
            depth,
            single_page,
        } => commands::digest::run(&ctx, url, instruction, depth, single_page).await,
        Command::History { action } => match action {
            None => commands::history::list(&ctx),
            Some(HistoryAction::Show { id }) => commands::history::show(&ctx, id),
            Some(HistoryAction::Delete { id }) => commands::history::delete(&ctx, id),
            Some(HistoryAction::Clear { yes }) => commands::history::clear(&ctx, yes),
        },
        Command::Import { file } => commands::prompts::import(&ctx, &file),
        Command::Serve { bind } => commands::serve::run(&ctx, bind).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so they never mix with rendered output.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("promma=warn"),
            1 => EnvFilter::new("promma=info"),
            2 => EnvFilter::new("promma=debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
