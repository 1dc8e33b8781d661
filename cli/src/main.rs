//! CLI entrypoint for consilium
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use consilium_application::{
    ConsultationLogger, ConsultationParams, ConsultationStore, MarketStore, PredictionMarket,
    RunConsultationInput, RunConsultationUseCase, SpecialistRegistry, TokenLedger,
};
use consilium_domain::{CaseInput, OutcomeSet, ResolutionPayload, ResolutionSource, Specialty};
use consilium_infrastructure::{
    ConfigLoader, FileConfig, InMemoryConsultationStore, InMemoryMarketStore, InMemoryTokenLedger,
    JsonlConsultationLogger, ScriptedSpecialist,
};
use consilium_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // Keep the non-blocking writer guard alive for the whole run
    let _log_guard = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "consilium.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    info!("Starting consilium");

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    // Load the case
    let Some(case_path) = &cli.case else {
        bail!("Case file is required. See --help for the expected JSON shape.");
    };
    let case_json = std::fs::read_to_string(case_path)
        .with_context(|| format!("reading case file {}", case_path.display()))?;
    let case: CaseInput =
        serde_json::from_str(&case_json).with_context(|| "parsing case file")?;

    // Resolve the requested panel: CLI tags override the configured panel
    let requested = requested_panel(&cli.specialty, &config)?;

    // === Dependency Injection ===
    let mut registry = SpecialistRegistry::new();
    let latency = Duration::from_millis(config.panel.latency_ms);
    for specialty in &requested {
        let mut agent =
            ScriptedSpecialist::new(format!("{}-1", specialty), *specialty);
        if !latency.is_zero() {
            agent = agent.with_latency(latency);
        }
        registry.register(Arc::new(agent));
    }
    let registry = Arc::new(registry);

    let consultations = Arc::new(InMemoryConsultationStore::new());
    let market_store = Arc::new(InMemoryMarketStore::new());
    let ledger = Arc::new(InMemoryTokenLedger::new(config.market.starting_balance));
    let market = Arc::new(PredictionMarket::new(
        Arc::clone(&market_store) as Arc<dyn MarketStore>,
        Arc::clone(&ledger) as Arc<dyn TokenLedger>,
    ));

    let mut params: ConsultationParams = config.consultation_params();
    if let Some(min) = cli.min_responses {
        params = params.with_min_responses(min);
    }

    let mut use_case = RunConsultationUseCase::new(
        Arc::clone(&registry),
        Arc::clone(&consultations) as Arc<dyn ConsultationStore>,
        Arc::clone(&market),
        Arc::clone(&ledger) as Arc<dyn TokenLedger>,
        params,
    );
    if let Some(path) = &config.logging.consultation_log
        && let Some(logger) = JsonlConsultationLogger::new(path)
    {
        use_case = use_case.with_logger(Arc::new(logger) as Arc<dyn ConsultationLogger>);
    }

    // Build input
    let mut input = RunConsultationInput::new(case).with_specialties(requested.clone());
    if cli.fast || config.orchestrator.parse_mode() == consilium_domain::CollectionMode::Fast {
        input = input.fast();
    }
    if let Some(min) = cli.min_responses {
        input = input.with_min_responses(min);
    }

    // Print header
    if !cli.quiet {
        println!();
        println!("+============================================================+");
        println!("|        Consilium - Specialist Panel Consultation           |");
        println!("+============================================================+");
        println!();
        println!(
            "Panel: {}",
            requested
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    // Execute with or without progress reporting
    let output = if cli.quiet {
        use_case.execute(input).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    // Output results
    let formatted = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&output),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&output),
        OutputFormat::Json => ConsoleFormatter::format_json(&output),
    };
    println!("{}", formatted);

    // Let detached work (initiation, fees, baseline resolution) settle
    use_case.join_background().await;

    // Apply outcome feedback as an extra cascading resolution
    if let Some(outcomes_path) = &cli.outcomes {
        let source: ResolutionSource = cli
            .source
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let outcome_json = std::fs::read_to_string(outcomes_path)
            .with_context(|| format!("reading outcomes file {}", outcomes_path.display()))?;
        let outcomes: OutcomeSet =
            serde_json::from_str(&outcome_json).with_context(|| "parsing outcomes file")?;

        let payload = ResolutionPayload::from_source(source, outcomes);
        match market.resolve(&output.consultation_id, &payload).await? {
            Some(resolution) => println!("{}", ConsoleFormatter::format_resolution(&resolution)),
            None => warn!("No prediction set to resolve for {}", output.consultation_id),
        }
    }

    // Market statistics
    if cli.stats {
        let stats = market.statistics().await?;
        let mut records = Vec::new();
        for specialty in &requested {
            if let Some(agent) = registry.get(*specialty)
                && let Some(record) = market.agent_performance(agent.id()).await?
            {
                records.push(record);
            }
        }
        println!("{}", ConsoleFormatter::format_market(&stats, &records));
    }

    Ok(())
}

/// CLI specialty tags override the configured panel; both go through the
/// same alias-accepting parser.
fn requested_panel(tags: &[String], config: &FileConfig) -> Result<Vec<Specialty>> {
    if tags.is_empty() {
        let (specialties, issues) = config.panel.parse_specialties();
        for issue in issues {
            warn!("Config: {}", issue);
        }
        if specialties.is_empty() {
            bail!("No usable specialties configured");
        }
        return Ok(specialties);
    }

    let mut specialties = Vec::new();
    for tag in tags {
        let specialty: Specialty = tag
            .parse()
            .map_err(|e| anyhow::anyhow!("--specialty {}: {}", tag, e))?;
        if !specialties.contains(&specialty) {
            specialties.push(specialty);
        }
    }
    Ok(specialties)
}
