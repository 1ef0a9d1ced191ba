use anyhow::{Context, Result};
use clap::Parser;
use loadstat::{
    aggregate, compare_batches, ingest, Cli, Config, DirectorySource, RatioCi, Reporter,
    TerminalReporter,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config and apply CLI overrides
    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.apply_to_config(&mut config);
    config.validate().context("Invalid configuration")?;

    if cli.verbose {
        eprintln!("Configuration: {:?}", config);
    }

    // 1. Read and parse trial records
    let source = DirectorySource::new(cli.results_dir.clone());
    let ingestion = ingest(&source, &config.allow_list())
        .with_context(|| format!("Failed to read trial records from {}", cli.results_dir.display()))?;

    for warning in &ingestion.warnings {
        eprintln!("warning: skipping '{}': {}", warning.source, warning.error);
    }
    if cli.verbose {
        for name in &ingestion.sources {
            eprintln!("Parsed trial record '{}'", name);
        }
        eprintln!(
            "Ingested {} trial records ({} skipped)",
            ingestion.dataset.len(),
            ingestion.warnings.len()
        );
    }

    // 2. Aggregate per-batch statistics
    let stats = aggregate(&ingestion.dataset);

    // 3. Compare the two batches
    let estimator = RatioCi::new(config.stats.confidence_level);
    let comparison = compare_batches(&stats, &cli.baseline, &cli.candidate, &estimator)
        .context("Failed to compare batches")?;

    // 4. Report results
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        let reporter = if cli.no_color {
            TerminalReporter::without_colors()
        } else {
            TerminalReporter::new()
        };
        reporter.report(&comparison)?;
    }

    Ok(())
}
