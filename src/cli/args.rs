// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for Prompter.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Prompter - multi-provider LLM prompt workbench
#[derive(Parser, Debug)]
#[command(name = "prompter")]
#[command(version, about = "Multi-provider LLM prompt workbench for your terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream a completion for a block-structured system prompt
    Run(RunArgs),

    /// Validate an API key against the provider's model-listing endpoint
    #[command(name = "check-key")]
    CheckKey(CheckKeyArgs),

    /// Rewrite a system prompt's blocks into markdown or XML form
    Reformat(ReformatArgs),
}

/// Arguments for the run subcommand
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Markdown file holding the block-structured system prompt
    #[arg(long)]
    pub system_file: Option<PathBuf>,

    /// The user prompt to send
    #[arg(short, long)]
    pub prompt: String,

    /// Provider name ("Google Gemini", "OpenAI", "Open Router" or aliases
    /// gemini/openai/openrouter)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model identifier (defaults to the provider's first default model)
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature, 0.0 to 2.0
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling cutoff, 0.0 to 1.0
    #[arg(long)]
    pub top_p: Option<f32>,
}

/// Arguments for the check-key subcommand
#[derive(clap::Args, Debug)]
pub struct CheckKeyArgs {
    /// Provider whose key to test
    #[arg(long)]
    pub provider: String,

    /// Key to test (falls back to the provider's environment variable)
    #[arg(long)]
    pub key: Option<String>,
}

/// Arguments for the reformat subcommand
#[derive(clap::Args, Debug)]
pub struct ReformatArgs {
    /// Markdown file holding the block-structured system prompt
    #[arg(long)]
    pub system_file: PathBuf,

    /// Target form for block titles and content
    #[arg(long, value_enum)]
    pub to: FormatTarget,
}

/// Output forms for the reformat subcommand
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTarget {
    Markdown,
    Xml,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_parse() {
        let cli = Cli::parse_from([
            "prompter",
            "run",
            "--system-file",
            "agent.md",
            "--prompt",
            "hello",
            "--provider",
            "openai",
            "--temperature",
            "0.2",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.prompt, "hello");
                assert_eq!(args.provider.as_deref(), Some("openai"));
                assert_eq!(args.temperature, Some(0.2));
                assert!(args.model.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_key_parse() {
        let cli = Cli::parse_from(["prompter", "check-key", "--provider", "Google Gemini"]);
        match cli.command {
            Commands::CheckKey(args) => {
                assert_eq!(args.provider, "Google Gemini");
                assert!(args.key.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_reformat_parse() {
        let cli = Cli::parse_from([
            "prompter",
            "reformat",
            "--system-file",
            "agent.md",
            "--to",
            "xml",
        ]);
        match cli.command {
            Commands::Reformat(args) => assert_eq!(args.to, FormatTarget::Xml),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["prompter", "run", "--prompt", "hi", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
