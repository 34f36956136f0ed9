use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use subfilter::{
    from_xml_str, subtree_filter_with_config, to_xml, to_xml_pretty, FilterConfig, MixedSelection,
};

#[derive(Debug, Parser)]
#[command(
    name = "subfilter",
    version,
    about = "Select part of an XML data tree with a subtree filter"
)]
struct Args {
    /// Data document (defaults to stdin)
    #[arg(value_name = "DATA")]
    data: Option<PathBuf>,
    /// Filter document
    #[arg(short, long, value_name = "FILTER")]
    filter: PathBuf,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Indent the output
    #[arg(short, long)]
    pretty: bool,
    /// Maximum filter recursion depth (0 means unlimited)
    #[arg(long, value_name = "N")]
    max_depth: Option<u16>,
    /// Leave matched criteria out of mixed filter levels
    #[arg(long)]
    selectors_only: bool,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Exit status for I/O, parse and depth failures; 1 means nothing was selected
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let data = read_input(args.data.as_ref())?;
    let filter = std::fs::read_to_string(&args.filter)
        .with_context(|| format!("failed to read filter file {}", args.filter.display()))?;

    let data = from_xml_str(&data).context("failed to parse data document")?;
    let filter = from_xml_str(&filter).context("failed to parse filter document")?;
    debug!(data_root = %data.name, filter_root = %filter.name, "documents parsed");

    let config = build_config(args);
    let Some(selected) =
        subtree_filter_with_config(&data, &filter, config).context("filtering failed")?
    else {
        info!("filter selected nothing");
        return Ok(ExitCode::FAILURE);
    };

    let mut rendered = if args.pretty {
        to_xml_pretty(&selected)
    } else {
        to_xml(&selected)
    };
    rendered.push('\n');

    write_output(args.output.as_ref(), rendered.as_bytes())?;
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .without_time()
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

fn build_config(args: &Args) -> FilterConfig {
    let mut config = FilterConfig::new();
    if let Some(max_depth) = args.max_depth {
        config = config.with_max_depth(max_depth);
    }
    if args.selectors_only {
        config = config.with_mixed(MixedSelection::SelectorsOnly);
    }
    config
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read data file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no data provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
