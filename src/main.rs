use aidgroup::config::{CliConfig, Command, RegistryConfig};
use aidgroup::utils::{logger, validation::{Validate, ValidateWith}};
use aidgroup::{AidError, AidGroup, Result};
use clap::Parser;
use quick_xml::Reader;
use std::path::Path;

fn read_groups(path: &Path, config: &RegistryConfig) -> Result<Vec<AidGroup>> {
    let content = std::fs::read_to_string(path)?;
    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);
    AidGroup::read_all_from_xml(&mut reader, &config.parser)
}

fn print_group(group: &AidGroup, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(group)?);
    } else {
        println!("{}", group);
    }
    Ok(())
}

fn run(cli: &CliConfig, config: &RegistryConfig) -> Result<bool> {
    match &cli.command {
        Command::Parse { input, json } => {
            let groups = read_groups(input, config)?;
            tracing::info!("Parsed {} AID groups from {}", groups.len(), input.display());
            for group in &groups {
                print_group(group, *json)?;
            }
            Ok(true)
        }
        Command::Encode { input, output } => {
            let content = std::fs::read_to_string(input)?;
            let mut reader = Reader::from_str(&content);
            reader.config_mut().trim_text(true);
            let Some(group) = AidGroup::create_from_xml(&mut reader, &config.parser)? else {
                tracing::error!("No usable <aid-group> in {}", input.display());
                return Ok(false);
            };
            let bytes = group.to_parcel_bytes();
            std::fs::write(output, &bytes)?;
            tracing::info!("Wrote {} bytes to {}", bytes.len(), output.display());
            Ok(true)
        }
        Command::Decode { input, json } => {
            let bytes = std::fs::read(input)?;
            let group = AidGroup::from_parcel_bytes(&bytes)?;
            if *json {
                print_group(&group, true)?;
            } else {
                println!("{}", group.to_xml_string()?);
            }
            Ok(true)
        }
        Command::Validate { input } => {
            let groups = read_groups(input, config)?;
            let mut all_valid = true;
            for group in &groups {
                match group.validate_with(&config.validation) {
                    Ok(()) => println!("✅ {}", group),
                    Err(e) => {
                        all_valid = false;
                        tracing::warn!("Invalid group ({}): {}", group.category(), e);
                        println!("❌ {}: {}", group, e);
                    }
                }
            }
            Ok(all_valid)
        }
    }
}

fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.registry_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(AidError::Config { message: e.to_string() }.exit_code());
        }
    };

    match run(&cli, &config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Command failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
