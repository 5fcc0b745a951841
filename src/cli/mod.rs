//! Command line interface

pub mod serve;

use clap::{Parser, Subcommand};

/// Role Prompt Gateway - turn a role description into a system prompt via OpenAI, Claude or Gemini
#[derive(Parser)]
#[command(name = "role-prompt-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),
}
