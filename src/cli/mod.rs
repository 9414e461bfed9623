pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::app::AppContext;

#[derive(Parser)]
#[command(name = "mediahub")]
#[command(about = "MediaHub CLI - browse, submit and administer media resources")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse resources")]
    Resources {
        #[command(subcommand)]
        cmd: commands::resources::ResourceCommands,
    },

    #[command(about = "Submit a new resource")]
    Submit(commands::submit::SubmitArgs),

    #[command(about = "Resource administration (requires login)")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = AppContext::from_config(crate::config::config())?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx, output_format).await,
        Commands::Resources { cmd } => commands::resources::handle(cmd, &ctx, output_format).await,
        Commands::Submit(args) => commands::submit::handle(args, &ctx, output_format).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, &ctx, output_format).await,
    }
}
