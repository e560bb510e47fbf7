use clap::Parser;
use ecs_describer::config::toml_config::TomlConfig;
use ecs_describer::utils::{logger, validation::Validate};
use ecs_describer::{CliConfig, DescribeRequest, DescriberError, OutputTarget};

fn exit_with(e: &DescriberError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let file = match TomlConfig::from_file(&path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        };
        if let Err(e) = file.validate() {
            exit_with(&e);
        }
        config = config.merge_file(&file);
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let request = match DescribeRequest::from_config(&config) {
        Ok(request) => request,
        Err(e) => exit_with(&e),
    };

    tracing::info!("🔍 Describing cluster {}", request.cluster);

    let snapshot = match request.run().await {
        Ok(snapshot) => snapshot,
        Err(e) => exit_with(&e),
    };

    let rendered = match config.compact {
        true => snapshot.to_json(),
        false => snapshot.to_json_pretty(),
    };
    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(e) => exit_with(&e),
    };

    let target = OutputTarget::from_path(config.output.as_deref());
    if let Err(e) = target.write(&rendered) {
        tracing::error!("Failed to write snapshot to {}", target.describe());
        exit_with(&e);
    }

    tracing::info!(
        "✅ {} services, {} tasks written to {}",
        snapshot.len(),
        snapshot.task_count(),
        target.describe()
    );

    Ok(())
}
