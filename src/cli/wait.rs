use std::cell::Cell;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use holdfast_robustness::query_async;
use serde::Serialize;
use tracing::info;

use crate::cli::context::CliContext;
use crate::probe::CommandSpec;

/// Exit status when the command never printed the expected output
pub const EXIT_MISMATCH: u8 = 1;

#[derive(Args, Clone, Debug)]
pub struct WaitArgs {
    /// Output the command must print, compared after trimming whitespace
    #[arg(short, long)]
    pub expect: String,

    /// Command to poll, followed by its arguments
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct WaitReport {
    pub command: String,
    pub expected: String,
    pub value: String,
    pub matched: bool,
    pub attempts: u32,
    pub elapsed_ms: u64,
    pub started_at: DateTime<Utc>,
}

pub async fn cmd_wait(args: WaitArgs, ctx: &CliContext) -> Result<ExitCode> {
    let spec = CommandSpec::from_argv(&args.command).context("No command given")?;
    let config = ctx.robustness();
    info!(
        command = %spec,
        timeout_ms = config.timeout.as_millis() as u64,
        "Waiting for expected output"
    );

    let started_at = Utc::now();
    let start = Instant::now();
    let attempts = Cell::new(0u32);
    let (probe, counter) = (&spec, &attempts);
    let expected = args.expect.trim().to_string();

    let observed = query_async(
        &config,
        move || {
            counter.set(counter.get() + 1);
            probe.observe()
        },
        expected.clone(),
    )
    .await
    .with_context(|| format!("`{spec}` could not be observed"))?;

    let report = WaitReport {
        command: spec.to_string(),
        matched: observed == expected,
        expected,
        value: observed,
        attempts: attempts.get(),
        elapsed_ms: start.elapsed().as_millis() as u64,
        started_at,
    };
    info!(
        matched = report.matched,
        attempts = report.attempts,
        elapsed_ms = report.elapsed_ms,
        "Wait finished"
    );

    match ctx.output().render(&report)? {
        Some(rendered) => println!("{rendered}"),
        None => println!("{}", report.value),
    }

    Ok(if report.matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_MISMATCH)
    })
}
