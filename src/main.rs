use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::anyhow;
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::aggregate::AmountField;
use crate::classify::{Bucket, Classifier, DEFAULT_MARKERS};
use crate::client::BudgetClient;
use crate::config::Config;
use crate::report::Mode;

mod aggregate;
mod classify;
mod client;
mod config;
mod model;
mod month;
mod report;

#[derive(Parser)]
#[clap(version, about = "Monthly budget breakdown by emoji bucket", long_about = None)]
struct Cli {
    /// Month to report: 'current', 'last' or YYYY-MM. Defaults to last month
    #[clap(value_parser = month::parse_token)]
    month: Option<String>,

    /// Password for the budget server
    #[clap(short, long)]
    password: Option<String>,

    /// Sync id of the budget to download
    #[clap(short = 'i', long)]
    budget_id: Option<String>,

    /// Budget server url
    #[clap(short, long)]
    server_url: Option<String>,

    /// Aggregate budgeted amounts instead of spent amounts
    #[clap(short, long)]
    budget: bool,

    /// Render a table with amounts instead of plain percentage lines
    #[clap(short, long)]
    table: bool,

    /// Drop a bucket from the report (want, need, save, work, other); repeatable
    #[clap(short = 'x', long = "exclude", value_name = "BUCKET", value_parser = classify::parse_bucket)]
    exclude: Vec<Bucket>,

    /// Keep the catch-all bucket of unmarked categories in the report
    #[clap(long)]
    include_unmatched: bool,

    /// Verbose logging
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli: Cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match Config::default_path() {
        Some(path) => Config::load_from_file(&path)?,
        None => Config::empty(),
    };

    let month = match &cli.month {
        // Already resolved to YYYY-MM by the clap value parser
        Some(resolved) => resolved.clone(),
        None => month::previous_month(),
    };
    debug!("Getting budget for month {month}");

    let server_url = cli
        .server_url
        .clone()
        .or(config.server_url)
        .ok_or_else(|| anyhow!("no server url, pass --server-url or set server_url in the config file"))?;
    let password = cli
        .password
        .clone()
        .or(config.password)
        .ok_or_else(|| anyhow!("no password, pass --password or set password in the config file"))?;
    let sync_id = cli
        .budget_id
        .clone()
        .or(config.sync_id)
        .ok_or_else(|| anyhow!("no budget id, pass --budget-id or set sync_id in the config file"))?;
    let cache_dir = config.cache_dir.unwrap_or_else(|| PathBuf::from("./.data"));

    let spinner = start_spinner(cli.verbose, "Downloading budget...");
    let mut client = match BudgetClient::initialize(&cache_dir, &server_url, &password) {
        Ok(client) => client,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };

    // Everything past login goes through report_month so the session is
    // closed exactly once, fetch errors included.
    let result = report_month(&mut client, &sync_id, &month, cli, &spinner);
    spinner.finish_and_clear();
    client.shutdown();
    result
}

fn report_month(
    client: &mut BudgetClient,
    sync_id: &str,
    month: &str,
    cli: &Cli,
    spinner: &ProgressBar,
) -> anyhow::Result<()> {
    client.fetch_budget_snapshot(sync_id)?;
    let budget_month = client.get_month(month)?;
    spinner.finish_and_clear();

    let classifier = Classifier::new(DEFAULT_MARKERS);
    let field = if cli.budget { AmountField::Budgeted } else { AmountField::Spent };

    let mut excluded = cli.exclude.clone();
    if !cli.include_unmatched && !excluded.contains(&Bucket::Unmatched) {
        excluded.push(Bucket::Unmatched);
    }

    let breakdown = aggregate::aggregate(&budget_month, &classifier, field, &excluded);
    let mode = if cli.table { Mode::Table } else { Mode::Plain };
    report::print(&breakdown, mode);
    Ok(())
}

/// Spinner for the network wait. Hidden when verbose logging is on so it
/// does not interleave with log lines.
fn start_spinner(verbose: bool, message: &str) -> ProgressBar {
    if verbose {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
