use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    match args.get_command() {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Estimate(estimate) => {
            savvy_it::init_tracing_with("warn", "text");
            commands::estimate::execute(&args.config, &estimate).await?;
        }
        cli::Commands::Test => {
            savvy_it::init_tracing();
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => {
            savvy_it::init_tracing();
            match action {
                cli::ConfigCommands::Show => commands::config::show(&args.config)?,
                cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
            }
        }
        cli::Commands::Version => {
            println!("Savvy IT v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
