use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "savvy", version, about = "Savvy IT site backend and cost estimator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default)
    Start,

    /// Price a job from the command line
    Estimate(EstimateArgs),

    /// Test configuration file validity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Service category: tech-support, ai-automation, system-overhaul, coaching
    #[arg(short, long, default_value = "tech-support")]
    pub service: String,

    /// Complexity level, 1 (Minimal) to 4 (Enterprise)
    #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
    pub complexity: i32,

    /// Number of devices, 1 to 15
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub devices: i32,

    /// Immediate response
    #[arg(short, long)]
    pub emergency: bool,

    /// Print the full quote as JSON
    #[arg(long, conflicts_with = "interactive")]
    pub json: bool,

    /// Adjust the inputs line by line and watch the estimate update
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_start() {
        let cli = Cli {
            config: PathBuf::from("config.toml"),
            command: None,
        };
        assert!(matches!(cli.get_command(), Commands::Start));
    }

    #[test]
    fn test_cli_parsing_estimate() {
        let args = vec![
            "savvy",
            "estimate",
            "--service",
            "coaching",
            "--complexity",
            "3",
            "--emergency",
            "--json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Estimate(args) => {
                assert_eq!(args.service, "coaching");
                assert_eq!(args.complexity, 3);
                assert_eq!(args.devices, 1);
                assert!(args.emergency);
                assert!(args.json);
            }
            _ => panic!("Expected Estimate command"),
        }
    }

    #[test]
    fn test_cli_estimate_defaults_match_widget() {
        let cli = Cli::try_parse_from(vec!["savvy", "estimate"]).unwrap();
        match cli.get_command() {
            Commands::Estimate(args) => {
                assert_eq!(args.service, "tech-support");
                assert_eq!(args.complexity, 2);
                assert_eq!(args.devices, 1);
                assert!(!args.emergency);
            }
            _ => panic!("Expected Estimate command"),
        }
    }

    #[test]
    fn test_cli_json_conflicts_with_interactive() {
        let result = Cli::try_parse_from(vec!["savvy", "estimate", "--json", "--interactive"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parsing_config_show_with_path() {
        let args = vec!["savvy", "config", "show", "--config", "site.toml"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(matches!(
            cli.get_command(),
            Commands::Config { action: ConfigCommands::Show }
        ));
    }
}
