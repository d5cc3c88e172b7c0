use clap::Parser;
use docqa::domain::model::SetupOutcome;
use docqa::utils::error::{ErrorSeverity, QaError};
use docqa::utils::{logger, validation::Validate};
use docqa::{Cli, Command, DefaultEngine, LocalDocumentLoader, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match TomlConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    let overrides = cli.apply_overrides(&mut config);

    if config.json_logging() {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting docqa");
    for applied in &overrides {
        tracing::info!("🔧 {}", applied);
    }
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let documents = LocalDocumentLoader::new(
        config.documents.path.clone(),
        config.documents.extensions.clone(),
    );
    let engine = DefaultEngine::from_config(config, cli.monitor)?;

    if let Err(e) = run(&engine, &documents, &cli.command).await {
        tracing::error!(
            "❌ docqa failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(
    engine: &DefaultEngine,
    documents: &LocalDocumentLoader,
    command: &Command,
) -> Result<(), QaError> {
    match command {
        Command::Setup => match engine.setup().await? {
            SetupOutcome::Created => println!("✅ Index created"),
            SetupOutcome::AlreadyExists => println!("✅ Index already exists"),
        },
        Command::Index { .. } => {
            let report = engine.index_from(documents).await?;
            println!(
                "✅ Indexed {} documents ({} vectors in {} batches)",
                report.documents, report.vectors_upserted, report.batches
            );
        }
        Command::Ask { question, .. } => match engine.ask(question).await? {
            Some(answer) => println!("{}", answer),
            None => println!("No matching documents found; the language model was not queried."),
        },
    }
    Ok(())
}
