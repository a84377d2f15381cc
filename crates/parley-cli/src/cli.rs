use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use parley_config::schema::AssistantMode;

/// Parley: chat with a database or a document through the analysis backend.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Backend base URL override.
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Assistant mode override.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Database,
    Document,
}

impl From<ModeArg> for AssistantMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Database => AssistantMode::Database,
            ModeArg::Document => AssistantMode::Document,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_parse() {
        let args = Args::parse_from([
            "parley",
            "--mode",
            "document",
            "--backend-url",
            "http://backend:9000",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.mode, Some(ModeArg::Document));
        assert_eq!(args.backend_url.as_deref(), Some("http://backend:9000"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
        assert!(!args.print_config);
    }

    #[test]
    fn print_config_flag() {
        let args = Args::parse_from(["parley", "--print-config", "--mode", "database"]);
        assert!(args.print_config);
        assert_eq!(args.mode, Some(ModeArg::Database));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Args::try_parse_from(["parley", "--mode", "spreadsheet"]).is_err());
    }
}
