// Incremental listing harvester
//
// Collects items the output directory has never seen, writes them to the run
// file and merges them into the master file.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use kodegen_tools_listscrape::{HarvestConfig, IdentityPolicy, harvest};

#[derive(Parser)]
#[command(
    name = "listscrape",
    about = "Incrementally harvest listings from a paginated search page",
    version
)]
struct Cli {
    /// Search results URL, with any filters already applied.
    #[arg(long, env = "LISTSCRAPE_SEARCH_URL")]
    search_url: String,

    /// Directory for the run file, master file and skip ledger.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Maximum number of new items per run.
    #[arg(short, long)]
    quota: Option<usize>,

    /// Results per search page (offset step).
    #[arg(long)]
    page_size: Option<u32>,

    /// Highest offset to request.
    #[arg(long)]
    max_offset: Option<u32>,

    /// Pagination variants tried at each offset, comma separated.
    #[arg(long, value_delimiter = ',')]
    variants: Option<Vec<u32>>,

    /// Do not visit host profile pages.
    #[arg(long)]
    no_profiles: bool,

    /// Show the browser window.
    #[arg(long)]
    headed: bool,

    /// Let the browser load images and autoplay media.
    #[arg(long)]
    full_resources: bool,

    /// Persistent browser profile directory.
    #[arg(long)]
    chrome_data_dir: Option<PathBuf>,

    /// Which identifiers count as seen on later runs.
    #[arg(long, value_enum, default_value_t = PolicyArg::Discovered)]
    mark_seen: PolicyArg,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Every discovered identifier, extracted or not
    Discovered,
    /// Only identifiers that produced a record
    Extracted,
}

impl From<PolicyArg> for IdentityPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Discovered => Self::MarkOnDiscovery,
            PolicyArg::Extracted => Self::MarkOnExtraction,
        }
    }
}

impl Cli {
    fn into_config(self) -> Result<HarvestConfig> {
        let mut builder = HarvestConfig::builder()
            .output_dir(self.output_dir)
            .search_url(self.search_url)
            .headless(!self.headed)
            .block_heavy_resources(!self.full_resources)
            .scrape_profiles(!self.no_profiles)
            .identity_policy(self.mark_seen.into());

        if let Some(quota) = self.quota {
            builder = builder.quota(quota);
        }
        if let Some(page_size) = self.page_size {
            builder = builder.page_size(page_size);
        }
        if let Some(max_offset) = self.max_offset {
            builder = builder.max_offset(max_offset);
        }
        if let Some(variants) = self.variants {
            builder = builder.variants(variants);
        }
        if let Some(dir) = self.chrome_data_dir {
            builder = builder.chrome_data_dir(dir);
        }

        builder.build().context("Invalid configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.into_config()?;
    let summary = harvest(&config).await.context("Harvest failed")?;

    println!(
        "{} new items ({} skipped), {} appended to {} ({} rows)",
        summary.extracted,
        summary.skipped,
        summary.appended,
        config.master_path().display(),
        summary.master_rows
    );
    Ok(())
}
