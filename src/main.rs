use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use modcheck::config::{self, Config};
use modcheck::logging;
use modcheck::manifest::Manifest;
use modcheck::registry::ComponentRegistry;
use modcheck::version::fetchers::HttpFetcher;
use modcheck::version::types::UpdateVerdict;

#[derive(Parser)]
#[command(name = "modcheck")]
#[command(version, about = "Check registered components for available updates")]
struct Cli {
    /// Component manifest (JSON)
    manifest: PathBuf,

    /// Config file [default: $XDG_DATA_HOME/modcheck/config.json]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print verdicts as JSON
    #[arg(long)]
    json: bool,

    /// Print every verdict, not only available updates
    #[arg(long)]
    all: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config.clone().unwrap_or_else(config::config_path))?;
    let _guard = logging::init(&config.log);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let manifest = Manifest::load(&cli.manifest)?;
    let fetcher = HttpFetcher::from_config(&config.fetch)?;
    let registry = ComponentRegistry::new(config.registry, Arc::new(fetcher));

    manifest.register_all(&registry);
    registry.wait_all().await;

    let mut verdicts = if cli.all {
        registry.verdicts()
    } else {
        registry.available_updates()
    };
    verdicts.sort_by(|a, b| a.component_id.cmp(&b.component_id));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
    } else {
        print_text(&verdicts);
    }

    Ok(())
}

fn print_text(verdicts: &[UpdateVerdict]) {
    if verdicts.is_empty() {
        println!("All components are up to date");
        return;
    }

    for verdict in verdicts {
        let marker = if verdict.is_newer { "*" } else { " " };
        println!("{} {}", marker, verdict);
        if let Some(url) = &verdict.download_url {
            println!("    download: {}", url);
        }
        if !verdict.changelog.is_empty() {
            println!("    changelog: {}", verdict.changelog);
        }
    }
}
