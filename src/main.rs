mod config;
mod engine;
mod models;
mod provider;
mod report;
mod server;
mod types;

use std::process::exit;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::{Config, Credentials};
use crate::engine::reconcile;
use crate::models::MemberIndex;
use crate::provider::{ClubApiClient, PaymentProvider};
use crate::report::{print_summary, summarize_by_member, CsvReportSink};
use crate::server::Server;

const DEFAULT_OUTPUT: &str = "club_payment_report.csv";

struct Options {
    serve: bool,
    output: String,
    bearer_token: Option<String>,
    club_id: Option<String>,
    title_filters: Vec<String>,
    save_config: bool,
    save_token: bool,
    reset_config: bool,
    log_level: LevelFilter,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            serve: false,
            output: DEFAULT_OUTPUT.to_string(),
            bearer_token: None,
            club_id: None,
            title_filters: Vec::new(),
            save_config: false,
            save_token: false,
            reset_config: false,
            log_level: LevelFilter::INFO,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: If this CLI grows any further it should move to the clap crate; for
    //      the current handful of flags a manual loop keeps the binary lean.
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("{error}");
            print_usage();
            exit(1);
        }
    };

    // In serve mode stdout carries protocol responses, so logging defaults
    // to errors only unless overridden.
    setup_logging(options.log_level);

    let config = Config::new()?;

    if options.reset_config {
        if config.reset()? {
            println!("Configuration reset successfully");
        } else {
            println!("No configuration file found");
        }
        return Ok(());
    }

    if options.serve {
        return run_server(config, &options).await;
    }

    run_report(config, options).await
}

async fn run_server(config: Config, options: &Options) -> Result<()> {
    let mut server = Server::new(config);

    if let (Some(token), Some(club)) = (&options.bearer_token, &options.club_id) {
        server = server.with_provider(Box::new(ClubApiClient::new(token.clone(), club.clone())));
    }

    server.run_stdio().await
}

async fn run_report(config: Config, options: Options) -> Result<()> {
    let saved = config.load();

    let bearer_token = options
        .bearer_token
        .or(saved.bearer_token)
        .context("a bearer token is required (pass --bearer-token or save one with --save-token)")?;
    let club_id = options
        .club_id
        .or(saved.club_id)
        .context("a club id is required (pass --club-id or save one with --save-config)")?;

    if options.save_config || options.save_token {
        let credentials = Credentials {
            bearer_token: Some(bearer_token.clone()),
            club_id: Some(club_id.clone()),
        };
        config.save(&credentials, options.save_token)?;
        if options.save_token {
            println!("Warning: bearer token saved to the config file. Keep it secure!");
        }
    }

    let client = ClubApiClient::new(bearer_token, club_id);

    info!("Fetching members...");
    let members = client.list_members().await?;
    info!("Found {} members", members.len());

    info!("Fetching payments...");
    let payments = client.list_payments().await?;
    info!("Found {} payments", payments.len());

    let index = MemberIndex::from_records(&members);
    info!("Indexed {} of {} members", index.len(), members.len());

    let (ledger, stats) = reconcile(&client, &payments, &index, &options.title_filters).await;

    let member_summary = summarize_by_member(&ledger);
    let sink = CsvReportSink::new(&options.output);
    let written = sink.write(&ledger, &member_summary)?;

    print_summary(&ledger, &stats);

    if let Some(path) = written {
        println!("\nReport exported to: {}", path.display());
        println!("Report contains {} unpaid payment records", ledger.len());
    }

    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options> {
    let mut args = args;
    let mut options = Options::default();
    let mut log_level_set = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "serve" => options.serve = true,
            "-o" | "--output" => options.output = require_value(&arg, &mut args)?,
            "--bearer-token" => options.bearer_token = Some(require_value(&arg, &mut args)?),
            "--club-id" => options.club_id = Some(require_value(&arg, &mut args)?),
            "--title-filter" => options.title_filters.push(require_value(&arg, &mut args)?),
            "--save-config" => options.save_config = true,
            "--save-token" => options.save_token = true,
            "--reset-config" => options.reset_config = true,
            "--log-level" => {
                options.log_level = parse_log_level(&require_value(&arg, &mut args)?);
                log_level_set = true;
            }
            "--version" => {
                println!("club-report {}", env!("CARGO_PKG_VERSION"));
                exit(0);
            }
            "-h" | "--help" => {
                print_usage();
                exit(0);
            }
            other => bail!("Unknown argument '{other}'"),
        }
    }

    if options.serve && !log_level_set {
        options.log_level = LevelFilter::ERROR;
    }

    Ok(options)
}

fn require_value(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String> {
    match args.next() {
        Some(value) => Ok(value),
        None => bail!("Flag '{flag}' requires a value"),
    }
}

fn print_usage() {
    eprintln!("Usage: club-report [serve] [options]");
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  (default)                generate the outstanding-payments report");
    eprintln!("  serve                    answer JSON queries over stdio");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output PATH        report CSV path (default: {DEFAULT_OUTPUT})");
    eprintln!("      --bearer-token TOKEN club API bearer token");
    eprintln!("      --club-id ID         club id");
    eprintln!("      --title-filter TERM  keep payments whose title contains TERM;");
    eprintln!("                           repeatable, all terms must match");
    eprintln!("      --save-config        save the club id for future runs");
    eprintln!("      --save-token         also save the bearer token (not recommended)");
    eprintln!("      --reset-config       delete the saved configuration");
    eprintln!("      --log-level LEVEL    error, warn, info, debug or trace");
    eprintln!("      --version            print the version");
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{level}', defaulting to 'info'");
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Report output and protocol responses own stdout, so logging goes
    //      to stderr.
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
