use anyhow::{bail, Context};
use clap::Parser;
use identity_match::config::{CliConfig, Command};
use identity_match::utils::{logger, validation::Validate};
use identity_match::{MatchError, MatchingService, NewPerson};
use std::path::Path;
use uuid::Uuid;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("identity-match failed: {:#}", e);
        eprintln!("❌ {:#}", e);

        let exit_code = match e.downcast_ref::<MatchError>() {
            Some(err) if err.is_client_error() => 2,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let config = cli
        .load_matcher_config()
        .context("failed to load configuration")?;
    config.validate()?;
    tracing::info!(service = %config.service.name, "starting identity-match");

    let service = MatchingService::in_memory(config.service_settings());
    service.register_strategies(&config.strategies).await?;

    let people = match &cli.people {
        Some(path) => load_people(&service, path).await?,
        None => Vec::new(),
    };

    match cli.command {
        Command::Compare {
            first,
            second,
            strategy,
        } => {
            let first = person_at(&people, first)?;
            let second = person_at(&people, second)?;
            let outcome = service
                .calculate_probability_by_strategy_name(first, second, &strategy)
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Rules => {
            println!("{}", serde_json::to_string_pretty(&service.available_rules())?);
        }
        Command::Strategies => {
            let summaries: Vec<_> = service
                .strategies()
                .await?
                .iter()
                .map(|s| s.summary())
                .collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        Command::People => {
            for (index, id) in people.iter().enumerate() {
                let person = service.person(*id).await?;
                println!("{}\t{}", index, serde_json::to_string(&person)?);
            }
        }
    }

    Ok(())
}

async fn load_people(service: &MatchingService, path: &Path) -> anyhow::Result<Vec<Uuid>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read people file '{}'", path.display()))?;
    let inputs: Vec<NewPerson> = serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not a JSON array of persons", path.display()))?;

    let mut ids = Vec::with_capacity(inputs.len());
    for input in inputs {
        ids.push(service.create_person(input).await?);
    }
    tracing::info!(count = ids.len(), "people loaded");
    Ok(ids)
}

fn person_at(people: &[Uuid], index: usize) -> anyhow::Result<Uuid> {
    match people.get(index) {
        Some(id) => Ok(*id),
        None => bail!(
            "no person at position {} ({} loaded, pass --people)",
            index,
            people.len()
        ),
    }
}
