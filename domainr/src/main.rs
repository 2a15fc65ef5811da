//! Domainr CLI Application
//!
//! Searches for available domain names built from combinations of word
//! parts and TLDs. This binary is the presentation layer over domainr-lib:
//! it reads the search from the command line or a saved session, shows the
//! found-list while the search runs, and reports the outcome.

mod logging;
mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domainr_lib::{
    bootstrap, build_request, from_backend, parse_parts, AvailabilityCache, CachingChecker,
    Config, DiskStorage, DomainrError, MemoryStorage, Paths, SearchEvent, SearchRequest,
    Searcher, Session, Storage, MAX_CONCURRENCY,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{debug, info};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domainr
#[derive(Parser, Debug)]
#[command(name = "domainr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find available domain names from combinations of word parts")]
#[command(
    long_about = "Find available domain names from combinations of word parts.\n\nEvery first part is joined with every second part and every TLD. With --tld-sub, name endings that are real TLDs are tried as the TLD too (superyachts -> super.yachts).\n\nAnswers are cached under ~/.domainr/data for a day."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// First word parts (e.g. super mega)
    #[arg(value_name = "PARTS1", help_heading = "Search")]
    pub parts: Vec<String>,

    /// Second word parts appended to every first part (comma-separated or multiple -s flags)
    #[arg(short = 's', long = "second", value_name = "PARTS2", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Search")]
    pub second: Vec<String>,

    /// TLDs to check (comma-separated or multiple -t flags)
    #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Search")]
    pub tlds: Vec<String>,

    /// Also try name endings that are known TLDs as the TLD
    #[arg(long = "tld-sub", help_heading = "Search")]
    pub tld_sub: bool,

    /// Max concurrent checks (default from config: 16, max: 100)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// Bypass the on-disk cache for this run
    #[arg(long = "no-cache", help_heading = "Performance")]
    pub no_cache: bool,

    /// Load the search from a session file
    #[arg(long = "load", value_name = "FILE", help_heading = "Session")]
    pub load: Option<PathBuf>,

    /// Save the search and its results to a session file
    #[arg(long = "save", value_name = "FILE", help_heading = "Session")]
    pub save: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Create ~/.domainr with a default config and exit
    #[arg(long = "init", help_heading = "Configuration")]
    pub init: bool,

    /// Use specific config file instead of ~/.domainr/config
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Configuration")]
    pub verbose: u8,
}

/// Where configuration and cache live for this run.
#[derive(Debug)]
struct Locations {
    paths: Paths,
    config_file: PathBuf,
    custom_config: bool,
}

/// Final report printed with `--json`.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    status: &'static str,
    domains: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    scanned: Option<usize>,
    found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        ui::print_error(e);
        process::exit(1);
    }

    if let Err(e) = logging::init_logging(args.verbose) {
        eprintln!("Warning: {}", e);
    }

    match run(args).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            ui::print_error(e);
            process::exit(1);
        }
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.init {
        return Ok(());
    }

    if args.load.is_some() {
        if !args.parts.is_empty() || !args.second.is_empty() || !args.tlds.is_empty() {
            return Err(
                "Cannot combine --load with search parts. Edit the session file instead"
                    .to_string(),
            );
        }
    } else if args.parts.is_empty() {
        return Err(
            "You must specify domain parts or load a session with --load".to_string(),
        );
    }

    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            return Err(format!("Concurrency must be between 1 and {}", MAX_CONCURRENCY));
        }
    }

    Ok(())
}

/// Main search logic. Returns the process exit code.
async fn run(args: Args) -> Result<i32, Box<dyn std::error::Error>> {
    let locations = resolve_locations(&args)?;

    if args.init {
        if bootstrap(&locations.paths)? {
            println!("Created default config at {}", locations.paths.config_file.display());
        } else {
            println!("Config already exists at {}", locations.paths.config_file.display());
        }
        println!("Enable one of [dns], [namecheap] or [godaddy] in it to start searching.");
        return Ok(0);
    }

    if !locations.custom_config && bootstrap(&locations.paths)? {
        ui::print_notice(format!(
            "Created default config at {}. Enable a search source in it and run again.",
            locations.config_file.display()
        ));
        return Ok(1);
    }

    let mut config = Config::load(&locations.config_file)?.apply_env();
    if let Some(concurrency) = args.concurrency {
        config.search.concurrency = concurrency;
    }
    let backend = config.active_backend()?;
    debug!(backend = backend.name(), config = %locations.config_file.display(), "configuration loaded");

    let request = build_search_request(&args)?;
    request.validate()?;

    let candidates = build_request(&request);
    if candidates.is_empty() {
        ui::print_notice("No possible searches!");
        return Ok(0);
    }

    let storage: Arc<dyn Storage> = if args.no_cache {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(DiskStorage::open(&locations.paths.data_dir)?)
    };
    let checker = CachingChecker::new(AvailabilityCache::new(storage), from_backend(&backend)?);
    let searcher = Searcher::new(checker, config.search_options());

    let workers = searcher.options().pool_size(candidates.len());
    info!(candidates = candidates.len(), workers, "searching");
    if !args.json {
        ui::print_header(candidates.len(), workers, backend.name());
    }

    let mut search = searcher.search(candidates);
    let mut view = ui::FoundList::new();
    let mut found = Vec::new();
    let outcome = loop {
        match search.next_event().await {
            Some(SearchEvent::Found(list)) => {
                if !args.json {
                    view.update(&list)?;
                }
                found = list;
            }
            Some(terminal) => break terminal,
            None => break SearchEvent::Cancelled,
        }
    };

    if let Some(path) = &args.save {
        match Session::from_request(&request, found.clone()).save(path) {
            Ok(()) => ui::print_notice(format!(
                "The results have been saved to: {}",
                path.display()
            )),
            Err(e) => ui::print_error(e),
        }
    }

    let code = match outcome {
        SearchEvent::Completed(_) => 0,
        _ => 1,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_report(&found, &outcome))?);
    } else {
        match &outcome {
            SearchEvent::Completed(summary) => ui::print_summary(summary),
            SearchEvent::Failed(e) => ui::print_api_error(e),
            _ => ui::print_error("Search cancelled"),
        }
    }

    Ok(code)
}

/// Resolve the config file: `--config`, then `DOMAINR_CONFIG`, then `~/.domainr/config`.
fn resolve_locations(args: &Args) -> Result<Locations, DomainrError> {
    let paths = Paths::default_location()?;
    let custom = args
        .config
        .clone()
        .or_else(|| std::env::var_os("DOMAINR_CONFIG").map(PathBuf::from));

    Ok(match custom {
        Some(config_file) => Locations {
            paths,
            config_file,
            custom_config: true,
        },
        None => Locations {
            config_file: paths.config_file.clone(),
            paths,
            custom_config: false,
        },
    })
}

/// Build the request from a session file or the command line parts.
fn build_search_request(args: &Args) -> Result<SearchRequest, DomainrError> {
    if let Some(path) = &args.load {
        let request = Session::load(path)?.to_request();
        let substitution = request.tld_substitution || args.tld_sub;
        return Ok(request.with_tld_substitution(substitution));
    }

    Ok(SearchRequest::new(
        parse_parts(&args.parts.join(" ")),
        parse_parts(&args.second.join(" ")),
        parse_parts(&args.tlds.join(" ")),
    )
    .with_tld_substitution(args.tld_sub))
}

fn json_report<'a>(found: &'a [String], outcome: &SearchEvent) -> JsonReport<'a> {
    match outcome {
        SearchEvent::Completed(summary) => JsonReport {
            status: "completed",
            domains: found,
            scanned: Some(summary.scanned),
            found: summary.found,
            error: None,
        },
        SearchEvent::Failed(e) => JsonReport {
            status: "failed",
            domains: found,
            scanned: None,
            found: found.len(),
            error: Some(e.to_string()),
        },
        _ => JsonReport {
            status: "cancelled",
            domains: found,
            scanned: None,
            found: found.len(),
            error: None,
        },
    }
}
