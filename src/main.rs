use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skypeek::{
    AssetCache, AssetManifest, AssetStore, ConfiguredLocation, HttpAssetFetcher, Lookup,
    OpenMeteoClient, Outcome, SkypeekConfig, SkypeekError, UiState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

type WeatherLookup = Lookup<OpenMeteoClient, OpenMeteoClient, ConfiguredLocation>;

#[derive(Parser, Debug)]
#[command(
    name = "skypeek",
    version,
    about = "Current weather and a five-day forecast by place name or device location"
)]
struct Cli {
    /// Configuration file (defaults to <config dir>/skypeek/config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print lookup results as JSON instead of the text view
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up the weather for a place name
    Search {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Look up the weather at the configured device location
    Here,
    /// Prompt for place names; `:here` uses the device location, `:quit` exits
    Interactive,
    /// Manage the offline asset bucket
    Assets {
        #[command(subcommand)]
        action: AssetsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AssetsCommand {
    /// Store every manifest entry in the bucket
    Install,
    /// Show which manifest entries are cached
    List,
    /// Fetch one asset, cache first, and write its body to stdout
    Fetch { url: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", error_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Friendly text for known errors, followed by the full context chain
fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SkypeekError>() {
        Some(known) => format!("{}\n  {err:#}", known.user_message()),
        None => format!("{err:#}"),
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = match cli.config {
        Some(path) => SkypeekConfig::load_from_path(Some(path))?,
        None => SkypeekConfig::load()?,
    };
    skypeek::logging::init(&config.logging, cli.verbose)?;

    let json = cli.json;
    match cli.command {
        Command::Search { name } => {
            let lookup = build_lookup(&config, json)?;
            let outcome = lookup.search(&name.join(" ")).await;
            print_screen(&lookup, json).await?;
            Ok(exit_code(&outcome))
        }
        Command::Here => {
            let lookup = build_lookup(&config, json)?;
            let outcome = lookup.locate().await;
            print_screen(&lookup, json).await?;
            Ok(exit_code(&outcome))
        }
        Command::Interactive => {
            let lookup = build_lookup(&config, json)?;
            interactive(&lookup, json).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Assets { action } => assets(&config, action).await,
    }
}

fn build_lookup(config: &SkypeekConfig, json: bool) -> Result<WeatherLookup> {
    let client = OpenMeteoClient::new(&config.weather).context("Failed to create weather client")?;
    let locator = ConfiguredLocation::from_config(&config.device);
    let lookup = Lookup::new(client.clone(), client, locator);
    if json {
        return Ok(lookup);
    }

    Ok(lookup.on_change(|screen| {
        if screen.state() == &UiState::Loading {
            print!("{screen}");
        }
    }))
}

async fn print_screen(lookup: &WeatherLookup, json: bool) -> Result<()> {
    let screen = lookup.screen();
    let screen = screen.lock().await;
    if json {
        println!("{}", serde_json::to_string(&screen.snapshot())?);
    } else {
        print!("{screen}");
    }
    Ok(())
}

fn exit_code(outcome: &Outcome) -> ExitCode {
    if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn interactive(lookup: &WeatherLookup, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_screen(lookup, json).await?;

    loop {
        print!("> ");
        std::io::stdout().flush().map_err(SkypeekError::from)?;

        let Some(line) = lines.next_line().await.map_err(SkypeekError::from)? else {
            break;
        };
        match line.trim() {
            ":quit" | ":q" => break,
            ":here" => {
                lookup.locate().await;
            }
            query => {
                if matches!(lookup.search(query).await, Outcome::Skipped) {
                    continue;
                }
            }
        }
        print_screen(lookup, json).await?;
    }
    Ok(())
}

async fn assets(config: &SkypeekConfig, action: AssetsCommand) -> Result<ExitCode> {
    let store = AssetStore::open(&config.assets.location).with_context(|| {
        format!(
            "Failed to open asset store at {}",
            config.assets.location.display()
        )
    })?;
    let bucket = store.bucket(&config.assets.bucket)?;
    let manifest = AssetManifest::app_shell(&config.assets.origin)?;
    let cache = AssetCache::new(bucket, manifest, HttpAssetFetcher::new(&config.weather)?);

    match action {
        AssetsCommand::Install => {
            let stored = cache.install().await?;
            println!(
                "Cached {stored} assets in bucket '{}'",
                config.assets.bucket
            );
        }
        AssetsCommand::List => {
            for entry in cache.status().await? {
                let mark = if entry.cached { "✓" } else { "·" };
                println!("{mark} {}", entry.url);
            }
        }
        AssetsCommand::Fetch { url } => {
            let url = cache.manifest().resolve(&url)?;
            let asset = cache
                .fetch(&url)
                .await
                .with_context(|| format!("Failed to fetch {url}"))?;
            std::io::stdout()
                .write_all(&asset.body)
                .map_err(SkypeekError::from)?;
            if !asset.is_success() {
                eprintln!("{url} returned status {}", asset.status);
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
