use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "greyline", version, about = "Hybrid rule and advisory decision engine")]
pub struct Cli {
    /// Configuration file (defaults to config/greyline.* when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Rule file (overrides config file setting)
    #[arg(short, long, global = true)]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decide one request and print the response envelope
    Decide {
        /// JSON file with `request` and `signals`; stdin when omitted or `-`
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Request id to echo instead of a generated one
        #[arg(long)]
        request_id: Option<String>,

        /// Pretty-print the envelope
        #[arg(long)]
        pretty: bool,
    },

    /// Check a rule file and report condition warnings
    Validate {
        /// Rule file (YAML or JSON)
        file: PathBuf,
    },

    /// Print rule set and advisory status
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decide() {
        let cli = Cli::parse_from([
            "greyline",
            "--rules",
            "rules.yaml",
            "decide",
            "--input",
            "payload.json",
            "--request-id",
            "req-1",
        ]);

        assert_eq!(cli.rules, Some(PathBuf::from("rules.yaml")));
        match cli.command {
            Command::Decide {
                input,
                request_id,
                pretty,
            } => {
                assert_eq!(input, Some(PathBuf::from("payload.json")));
                assert_eq!(request_id.as_deref(), Some("req-1"));
                assert!(!pretty);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::parse_from(["greyline", "validate", "rules.yaml"]);
        assert!(matches!(cli.command, Command::Validate { file } if file == PathBuf::from("rules.yaml")));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(["greyline"]).is_err());
    }
}
