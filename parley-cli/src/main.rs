use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use parley::orchestrator::Protocol;

mod config;
mod run;
mod teams;

use config::{LogFormat, ParleyConfig};
use teams::Team;

#[derive(Parser, Debug)]
#[command(name = "parley", version = "0.3.0")]
#[command(about = "Parley - turn database requests into validated multi-participant conversations")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one conversation for a prompt
    Run {
        /// The request to fulfill
        #[arg(long)]
        prompt: String,
        /// Team to run the conversation with
        #[arg(long, value_enum, default_value = "data-engr")]
        team: Team,
        /// Conversation protocol (sequential, broadcast); defaults per team
        #[arg(long)]
        protocol: Option<Protocol>,
    },
    /// Print the table definitions of the configured database
    Tables,
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.compact().try_init(),
    };
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ParleyConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match cli.command {
        Commands::Run {
            prompt,
            team,
            protocol,
        } => match run::run(&config, &prompt, team, protocol) {
            Ok(outcome) => {
                let result = &outcome.result;
                println!("Session:   {}", outcome.session.root_dir().display());
                println!("Success:   {}", result.success());
                if !result.success() {
                    println!("Reason:    {}", result.error_message());
                }
                println!("Tokens:    {}", result.tokens());
                println!("Cost:      ${:.2}", result.cost());
                println!("Result:    {}", outcome.cost_file.display());
                println!("\n{}", result.last_message_text());

                if result.success() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(e) => {
                tracing::error!(error = %e, team = team.as_str(), "Conversation failed");
                ExitCode::FAILURE
            }
        },
        Commands::Tables => match run::tables(&config) {
            Ok(definitions) => {
                println!("{definitions}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read table definitions");
                ExitCode::FAILURE
            }
        },
    }
}
