use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use corpus_search::{CorpusSearch, SearchConfig, SearchError, SearchResult};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

mod command;
mod render;
mod serve;

pub use command::{ChatCommand, CommandHandler, Reply};

const DEFAULT_CONFIG_PATH: &str = "corpus-finder.toml";

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "corpus-finder")]
#[command(about = "Multi-term line search over a flat-file corpus", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Corpus root directory (overrides `root` in the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// File extension to search, without the dot (overrides `extension`)
    #[arg(long, global = true)]
    extension: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the matches
    Search(SearchArgs),

    /// List corpus files that will be searched
    Files(FilesArgs),

    /// Read /search and /limit commands from stdin until EOF or Ctrl-C
    Serve,
}

#[derive(Args)]
struct SearchArgs {
    /// Terms separated by '|': the first goes to ripgrep, the rest must all match
    query: String,

    /// Maximum lines to return (defaults to `default_limit` from the config)
    #[arg(long)]
    limit: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct FilesArgs {
    /// Print the list as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FilesOutput {
    root: PathBuf,
    extension: String,
    count: usize,
    files: Vec<PathBuf>,
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Explicit `--config` paths must exist; the default path is optional when
/// `--root` and `--extension` are given on the command line.
fn load_config(cli: &Cli) -> Result<SearchConfig> {
    let explicit = cli.config != PathBuf::from(DEFAULT_CONFIG_PATH);
    let config = if explicit || cli.config.exists() {
        SearchConfig::load(&cli.config, cli.root.clone(), cli.extension.clone())
    } else {
        SearchConfig::from_overrides(cli.root.clone(), cli.extension.clone())
    };
    config.with_context(|| format!("Failed to load config ({})", cli.config.display()))
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = load_config(&cli)?;
    log::debug!(
        "Corpus root {} (*.{})",
        config.root().display(),
        config.extension()
    );
    let search = Arc::new(CorpusSearch::with_ripgrep(config));

    match cli.command {
        Commands::Search(args) => run_search(search, args).await,
        Commands::Files(args) => run_files(search, args).await,
        Commands::Serve => serve::run(CommandHandler::new(search)).await,
    }
}

async fn run_search(search: Arc<CorpusSearch>, args: SearchArgs) -> Result<()> {
    if let Some(limit) = &args.limit {
        search.set_limit(limit).context("Invalid --limit")?;
    }

    let started = Instant::now();
    let query = args.query.clone();
    let engine = Arc::clone(&search);
    let outcome = tokio::task::spawn_blocking(move || engine.search(&query)).await?;
    let result = match outcome {
        Ok(result) => result,
        Err(SearchError::EmptyQuery) if args.json => {
            let empty = SearchResult::empty(search.limit());
            return print_stdout(&serde_json::to_string_pretty(&empty)?);
        }
        Err(SearchError::EmptyQuery) => {
            print_stdout(render::NOTHING_TO_SEARCH)?;
            return Ok(());
        }
        Err(err) => return Err(err).context("Search failed"),
    };

    if args.json {
        return print_stdout(&serde_json::to_string_pretty(&result)?);
    }

    let config = search.config();
    let messages = render::search_messages(
        &result,
        config.root(),
        config.max_count_per_file(),
        started.elapsed(),
    );
    print_stdout(&messages.join("\n\n"))
}

async fn run_files(search: Arc<CorpusSearch>, args: FilesArgs) -> Result<()> {
    let engine = Arc::clone(&search);
    let files = tokio::task::spawn_blocking(move || engine.list_files())
        .await?
        .context("Failed to list corpus files")?;

    let config = search.config();
    if args.json {
        let output = FilesOutput {
            root: config.root().to_path_buf(),
            extension: config.extension().to_string(),
            count: files.len(),
            files,
        };
        return print_stdout(&serde_json::to_string_pretty(&output)?);
    }

    let mut text = format!("Found {} files", files.len());
    for file in &files {
        text.push('\n');
        text.push_str(&file.display().to_string());
    }
    print_stdout(&text)
}
