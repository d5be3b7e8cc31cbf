//! `studylens` command-line front end.
//!
//! User-facing output goes to stdout with `println!`; diagnostics go through
//! `tracing` to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use studylens_common::{CallContext, EventQuery};
use studylens_infra::{config, init_tracing, AppContext};

mod args;

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app_config = match &cli.config {
        Some(path) => config::load_from_file(Some(path.clone())),
        None => config::load(),
    }
    .context("failed to load configuration")?;
    let app = AppContext::new(app_config).context("failed to initialise services")?;

    let session = cli.session.clone().unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
    let mut ctx = CallContext::for_session(session.as_str());
    if let Some(secs) = cli.timeout_secs {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(session_id = %session, command = ?cli.command, "Running command");

    let outcome = execute(&app, &cli.command, &ctx).await;

    if cli.show_events {
        let events = app.events.query(&EventQuery::new().session(session.as_str()));
        println!("{}", serde_json::to_string_pretty(&events)?);
    }
    outcome
}

async fn execute(app: &AppContext, command: &Commands, ctx: &CallContext) -> anyhow::Result<()> {
    match command {
        Commands::AuthCheck => auth_check(app, ctx).await,
        Commands::Analyze { image, instruction } => {
            let bytes =
                fs::read(image).with_context(|| format!("failed to read {}", image.display()))?;
            let analysis = app.tutor.analyze_page(&bytes, instruction.as_deref(), ctx).await?;

            println!("== Recognized text ==");
            println!("{}", analysis.extracted_text);
            println!();
            println!("== Explanation ==");
            if analysis.explanation.is_empty() {
                println!("(no text recognized)");
            } else {
                println!("{}", analysis.explanation);
            }
            Ok(())
        }
        Commands::Ask { content, question } => {
            let material = fs::read_to_string(content)
                .with_context(|| format!("failed to read {}", content.display()))?;
            println!("{}", app.tutor.ask(&material, question, ctx).await?);
            Ok(())
        }
        Commands::Examples { content, topic } => {
            let material = fs::read_to_string(content)
                .with_context(|| format!("failed to read {}", content.display()))?;
            println!("{}", app.tutor.examples(&material, topic, ctx).await?);
            Ok(())
        }
    }
}

async fn auth_check(app: &AppContext, ctx: &CallContext) -> anyhow::Result<()> {
    println!("==> Renewing credential...");
    let credential = app.credentials.renew().await.context("credential renewal failed")?;
    println!("    token:   {}", credential.redacted());
    match credential.expires_at() {
        Some(expires_at) => println!("    expires: {}", expires_at.to_rfc3339()),
        None => println!("    expires: (not reported)"),
    }

    println!("==> Probing recognition endpoint (folder {})...", app.config.folder_id);
    let outcome = app.recognition.probe_auth(ctx).await.context("auth probe failed")?;
    if outcome.authorized() {
        println!("    OK: status {} (credential accepted)", outcome.status);
        Ok(())
    } else {
        anyhow::bail!("recognition endpoint answered {}: {}", outcome.status, outcome.body)
    }
}
