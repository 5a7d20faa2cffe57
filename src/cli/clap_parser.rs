use clap::{Parser, ValueEnum};

use crate::config::{AppConfig, ExportConfig, MatchingConfig, WindowConfig};
use crate::error::ConfigError;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, ValueEnum, Debug)]
pub enum FormatOpt {
    Csv,
    Xlsx,
    Both,
}

impl FormatOpt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for FormatOpt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "record_linker",
    version,
    about = "Link transaction rows to a master registry by name and propagate addresses",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Source (transaction) table, CSV (env: LINKER_SOURCE)
    #[arg(value_name = "SOURCE", env = "LINKER_SOURCE")]
    pub source: String,
    /// Registry (master entity) table, CSV (env: LINKER_REGISTRY)
    #[arg(value_name = "REGISTRY", env = "LINKER_REGISTRY")]
    pub registry: String,
    /// Output path (env: LINKER_OUT)
    #[arg(value_name = "OUT_PATH", env = "LINKER_OUT", default_value = "linked.csv")]
    pub out_path: String,
    /// Output format
    #[arg(value_name = "FORMAT", default_value_t = FormatOpt::Csv)]
    pub format: FormatOpt,
    /// Minimum match confidence in [0,1] (env: LINKER_THRESHOLD)
    #[arg(long, env = "LINKER_THRESHOLD", default_value_t = 0.40)]
    pub threshold: f64,
    /// First source row to process, 0-based (env: LINKER_START)
    #[arg(long, env = "LINKER_START", default_value_t = 0)]
    pub start: usize,
    /// One past the last source row to process; default is the whole table
    #[arg(long, env = "LINKER_END")]
    pub end: Option<usize>,
}

impl Cli {
    pub fn to_app_config(&self) -> Result<AppConfig, ConfigError> {
        let cfg = AppConfig {
            source_path: self.source.clone(),
            registry_path: self.registry.clone(),
            matching: MatchingConfig {
                threshold: self.threshold,
            },
            window: WindowConfig {
                start: self.start,
                end: self.end,
            },
            export: ExportConfig {
                out_path: Some(self.out_path.clone()),
                format: Some(self.format.as_str().into()),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

pub fn parse_cli_to_app_config() -> Result<AppConfig, ConfigError> {
    let cli = Cli::parse();
    cli.to_app_config()
}
