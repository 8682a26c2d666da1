//! css-weight - Command Line Entry Point

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use css_weight::{ComplexityReport, Config, ConfigRequest, CssReader, Outputter, RuleTree, USAGE};

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(ConfigRequest::Run(config)) => config,
        Ok(ConfigRequest::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    init_logging(config.log_file.as_deref())?;
    tracing::info!("css-weight {}", css_weight::VERSION);

    let path = run(&config)?;
    println!("{}", path.display());

    Ok(())
}

/// Log to `log_file` (warnings also to stderr), or to stderr alone
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_file {
        Some(log_file) => {
            let file = File::create(log_file)
                .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file).and(std::io::stderr.with_max_level(tracing::Level::WARN)))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

/// Score the configured stylesheet and write the report, returning its path
fn run(config: &Config) -> Result<PathBuf> {
    let start = Instant::now();

    let input = config.input.as_deref().context("No input file given")?;
    let mut reader = CssReader::with_file(input);
    reader
        .read_file()
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let report = match reader.parsed() {
        Some(tree) => score(&tree, config.breakdown)
            .with_context(|| format!("Failed to score {}", input.display()))?,
        None => ComplexityReport::default(),
    };

    let outputter = Outputter::new(&config.output_file);
    let path = outputter.write_data(
        &report,
        config.output_name.as_deref().unwrap_or_default(),
        config.pretty,
    )?;

    tracing::info!(
        "Scored {} selectors, {} rules and {} at-rules in {:?}",
        report.selectors.len(),
        report.weighted_rules.len(),
        report.at_rules.len(),
        start.elapsed()
    );

    Ok(path)
}

fn score(tree: &RuleTree, breakdown: bool) -> css_weight::Result<ComplexityReport> {
    let report = ComplexityReport::from_tree(Some(tree))?;
    if breakdown {
        report.with_breakdown(Some(tree))
    } else {
        Ok(report)
    }
}
