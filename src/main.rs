use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod config;
mod error;
mod link;
mod media;
mod output;
mod utils;

use config::Config;
use media::{Quality, VideoService};

#[derive(Parser, Debug)]
#[command(author, version, about = "Look up and download TikTok videos", long_about = None)]
struct Args {
    /// TikTok video URL. Reads one URL per line from stdin when omitted
    url: Option<String>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Download this quality after the lookup
    #[arg(short, long, value_enum)]
    download: Option<Quality>,

    /// Directory to save downloads in
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print video information as JSON
    #[arg(long)]
    json: bool,
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/tikgrab/config.toml", xdg_config_home);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/tikgrab/config.toml", home.display());
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // stdout is reserved for rendered results
    if config.get_logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

struct RunOptions {
    download: Option<Quality>,
    output_dir: PathBuf,
    json: bool,
}

async fn handle_url(
    service: &VideoService,
    input: &str,
    opts: &RunOptions,
    out: &mut impl Write,
) -> Result<()> {
    let info = service.lookup(input).await?;

    if opts.json {
        writeln!(out, "{}", output::render_json(&info)?)?;
    } else {
        write!(out, "{}", output::render_text(&info))?;
    }

    if let Some(quality) = opts.download {
        let path = service.download(&info, quality, &opts.output_dir).await?;
        writeln!(out, "{} download complete: {}", quality, path.display())?;
    }

    Ok(())
}

fn report(err: &anyhow::Error, err_out: &mut impl Write) {
    debug!("Lookup failed: {:#}", err);
    let _ = writeln!(err_out, "{}", output::render_error(err));
}

/// One lookup per input line until EOF. Failures are reported and the loop
/// moves on to the next line.
async fn run_interactive<R>(
    service: &VideoService,
    opts: &RunOptions,
    input: R,
    out: &mut impl Write,
    err_out: &mut impl Write,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    writeln!(
        err_out,
        "Paste a TikTok video URL and press Enter (Ctrl-D to quit)"
    )?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        if let Err(e) = handle_url(service, &line, opts, out).await {
            report(&e, err_out);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = match get_config_path(&args) {
        Some(config_path) => Config::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path))?,
        None => Config::default(),
    };

    init_logging(&config);

    info!("Starting tikgrab...");

    let service = VideoService::new(&config).context("Failed to initialize video service")?;
    let opts = RunOptions {
        download: args.download,
        output_dir: args
            .output
            .clone()
            .unwrap_or_else(|| config.download.output_dir.clone()),
        json: args.json,
    };

    match &args.url {
        Some(url) => match handle_url(&service, url, &opts, &mut std::io::stdout()).await {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(e) => {
                report(&e, &mut std::io::stderr());
                Ok(ExitCode::FAILURE)
            }
        },
        None => {
            run_interactive(
                &service,
                &opts,
                BufReader::new(tokio::io::stdin()),
                &mut std::io::stdout(),
                &mut std::io::stderr(),
            )
            .await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
