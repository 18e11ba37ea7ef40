mod check;
mod run;
mod sites;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "seodiff-cli")]
#[command(about = "Compare SEO signals between production and staging pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check every configured prod/stage pair and publish the reports
    Run {
        /// Only run the site variant with this name
        #[arg(long)]
        site: Option<String>,

        /// Skip the spreadsheet and chat reporters
        #[arg(long)]
        dry_run: bool,

        /// Also write the full results to this JSON file
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
    },
    /// Extract signals from a single URL and print them
    Check {
        url: String,

        /// Only count headings
        #[arg(long)]
        headings_only: bool,
    },
    /// List configured site variants and their pair counts
    Sites,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = seodiff_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run {
            site,
            dry_run,
            json,
        } => {
            let sites = seodiff_core::load_sites(&config.sites_path)?;
            run::run_sites(&config, &sites, site.as_deref(), dry_run, json.as_deref()).await?;
        }
        Commands::Check { url, headings_only } => {
            check::check_url(&config, &url, headings_only).await?;
        }
        Commands::Sites => {
            let sites = seodiff_core::load_sites(&config.sites_path)?;
            sites::list_sites(&sites)?;
        }
    }

    Ok(())
}

/// Builds the page client from the timeout and user agent in `config`.
fn build_page_client(
    config: &seodiff_core::AppConfig,
) -> anyhow::Result<seodiff_scraper::PageClient> {
    seodiff_scraper::PageClient::new(config.request_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build page client: {e}"))
}
