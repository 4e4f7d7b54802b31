//! actstat - Analyze GitHub Actions usage from billing CSV exports

use actstat::{
    cli::{Cli, Command},
    cost_calculator::{default_tiers, price},
    data_loader::{load_records, resolve_source},
    error::Result,
    output::get_formatter,
    report,
    types::RepoSlug,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. The --verbose flag should override RUST_LOG.
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("actstat=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("actstat=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Billing windows are anchored on today's local date
    let today = chrono::Local::now().date_naive();

    let source = resolve_source(cli.file.as_deref())?;
    info!("Reading usage report from {}", source.display());
    let records = load_records(&source)?;

    let formatter = get_formatter(cli.json);

    match cli.command {
        Some(Command::Repo(args)) => {
            info!("Running repository report for {}", args.slug);
            let breakdown = report::repo_breakdown(&records, &RepoSlug::new(args.slug));
            println!("{}", formatter.format_repo(&breakdown));
        }

        Some(Command::Cost(args)) => {
            info!("Running runner cost report");
            let period = args.resolve(today)?;
            let tiers = default_tiers();
            let costs = price(&records, &tiers, &period);
            println!("{}", formatter.format_cost(&period, &tiers, &costs));
        }

        Some(Command::Report(args)) => {
            info!("Running full usage report");
            let period = args.resolve(today)?;
            let tiers = default_tiers();
            let full = report::assemble(&records, &period, &tiers);
            println!("{}", formatter.format_report(&full, &tiers));
        }

        Some(Command::Overview) | None => {
            info!("Running usage overview");
            let overview = report::overview(&records);
            println!("{}", formatter.format_overview(&overview));
        }
    }

    Ok(())
}
