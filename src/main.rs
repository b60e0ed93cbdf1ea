// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Prompter - multi-provider LLM prompt workbench
//!
//! Entry point for the Prompter CLI application.

use std::io::{self, Write};

use anyhow::{bail, Context};
use clap::Parser;

use prompter::blocks::{format, parser, serialize_blocks};
use prompter::cli::{CheckKeyArgs, Cli, Commands, FormatTarget, ReformatArgs, RunArgs};
use prompter::llm::Provider;
use prompter::session::KeyTestState;
use prompter::workbench::Workbench;

/// Environment variable a provider's API key is read from at startup
fn key_env_var(provider: Provider) -> &'static str {
    match provider {
        Provider::GoogleGemini => "GEMINI_API_KEY",
        Provider::OpenAI => "OPENAI_API_KEY",
        Provider::OpenRouter => "OPENROUTER_API_KEY",
    }
}

/// Copy any keys present in the environment into the session store
fn load_env_keys(bench: &mut Workbench) -> anyhow::Result<()> {
    for provider in Provider::ALL {
        if let Ok(key) = std::env::var(key_env_var(provider)) {
            if !key.trim().is_empty() {
                bench.save_api_key(provider, key.trim())?;
            }
        }
    }
    Ok(())
}

fn read_blocks(path: &std::path::Path) -> anyhow::Result<Vec<prompter::blocks::PromptBlock>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match parser::parse_blocks(&raw) {
        Some(blocks) => Ok(blocks),
        None => bail!(
            "{} has no block boundaries (lines starting with '# ')",
            path.display()
        ),
    }
}

async fn run_submit(args: RunArgs, bench: &mut Workbench) -> anyhow::Result<()> {
    if let Some(name) = &args.provider {
        bench.set_provider(name.parse()?);
    }
    if let Some(model) = args.model {
        bench.set_use_custom_model(true);
        bench.set_model(model);
    }
    if let Some(temperature) = args.temperature {
        bench.set_temperature(temperature);
    }
    if let Some(top_p) = args.top_p {
        bench.set_top_p(top_p);
    }
    if let Some(path) = &args.system_file {
        bench.set_blocks(read_blocks(path)?);
    }
    bench.set_user_prompt(args.prompt);

    let mut stdout = io::stdout();
    bench
        .submit(|fragment| {
            // Fragments must appear as they arrive, not on buffer boundaries
            let _ = stdout.write_all(fragment.as_bytes());
            let _ = stdout.flush();
        })
        .await?;
    println!();
    Ok(())
}

async fn run_check_key(args: CheckKeyArgs, bench: &mut Workbench) -> anyhow::Result<()> {
    let provider: Provider = args.provider.parse()?;
    let key = match args.key {
        Some(key) => key,
        None => std::env::var(key_env_var(provider)).unwrap_or_default(),
    };

    bench.test_key(provider, &key).await;
    let status = bench.key_test_status(provider);
    println!("{}: {}", provider, status.message);

    if status.state != KeyTestState::Success {
        std::process::exit(1);
    }
    Ok(())
}

fn run_reformat(args: ReformatArgs) -> anyhow::Result<()> {
    let blocks = read_blocks(&args.system_file)?;
    let converted = match args.to {
        FormatTarget::Markdown => format::to_markdown(&blocks),
        FormatTarget::Xml => format::to_xml(&blocks),
    };
    println!("{}", serialize_blocks(&converted));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // Practical debug toggle: `-v` enables workbench and wire diagnostics
    // without requiring users to know target names. `RUST_LOG` still takes
    // precedence.
    if cli.verbose > 0 {
        for directive in ["prompter::workbench=debug", "prompter::llm=debug"] {
            if let Ok(parsed) = directive.parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut bench = Workbench::new();
    load_env_keys(&mut bench)?;

    match cli.command {
        Commands::Run(args) => run_submit(args, &mut bench).await?,
        Commands::CheckKey(args) => run_check_key(args, &mut bench).await?,
        Commands::Reformat(args) => run_reformat(args)?,
    }
    Ok(())
}
