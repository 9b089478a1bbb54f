use crate::config::RegistryConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "aidgroup")]
#[command(about = "Inspect and convert card-emulation AID group records")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML file with parser and validation settings")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    #[command(about = "Print every <aid-group> in an XML document")]
    Parse {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Convert the first <aid-group> in an XML document to a binary record")]
    Encode { input: PathBuf, output: PathBuf },
    #[command(about = "Print a binary record as XML")]
    Decode {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Check every <aid-group> against the validation rules")]
    Validate { input: PathBuf },
}

impl CliConfig {
    pub fn registry_config(&self) -> Result<RegistryConfig> {
        match &self.config {
            Some(path) => RegistryConfig::from_file(path),
            None => Ok(RegistryConfig::default()),
        }
    }
}
