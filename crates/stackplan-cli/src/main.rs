//! stackplan CLI tool.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "stackplan")]
#[command(about = "Desired-state planner for hosting + database stacks", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print the plan for a stack
    Plan {
        /// Stack name (prod/production are treated as production)
        #[arg(long, env = "STACKPLAN_STACK")]
        stack: String,
        /// Path to the stack configuration file
        #[arg(long, env = "STACKPLAN_CONFIG", default_value = "stackplan.kdl")]
        config: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Include secret values in JSON output
        #[arg(long)]
        show_secrets: bool,
    },
    /// Resolve the plan and check its invariants
    Validate {
        /// Stack name
        #[arg(long, env = "STACKPLAN_STACK")]
        stack: String,
        /// Path to the stack configuration file
        #[arg(long, env = "STACKPLAN_CONFIG", default_value = "stackplan.kdl")]
        config: PathBuf,
    },
    /// Show which environments receive sensitive and standard variables
    Targets {
        /// Stack name
        #[arg(long, env = "STACKPLAN_STACK")]
        stack: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Plan {
            stack,
            config,
            format,
            show_secrets,
        } => {
            commands::plan::run(&stack, &config, format, show_secrets)?;
        }
        Commands::Validate { stack, config } => {
            commands::validate(&stack, &config)?;
        }
        Commands::Targets { stack } => {
            commands::targets(&stack);
        }
    }

    Ok(())
}
