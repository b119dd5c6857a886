mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "jobscraper")]
#[command(about = "Scrape job offers from emploitic.com into CSV and JSON stores")]
struct Cli {
    /// Output format for `show`: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Job board origin (defaults to JOBSCRAPER_BASE_URL, then the live site)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch listings (and their detail pages) and merge them into the stores
    Scrape(Box<commands::scrape::ScrapeArgs>),
    /// Print the contents of a store file
    Show(commands::show::ShowArgs),
    /// Combine store files into one without duplicate rows
    Merge(commands::merge::MergeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jobscraper=info".parse()?)
                .add_directive("jobscraper_lib=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    match &cli.command {
        Commands::Scrape(args) => {
            commands::scrape::run(args.as_ref(), cli.base_url.as_deref()).await?
        }
        Commands::Show(args) => commands::show::run(args, &format)?,
        Commands::Merge(args) => commands::merge::run(args)?,
    }

    Ok(())
}
