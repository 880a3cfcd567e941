use std::cell::Cell;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use holdfast_robustness::robustly_async;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::context::CliContext;
use crate::probe::CommandSpec;

/// Exit status when every attempt failed
pub const EXIT_FAILED: u8 = 1;

#[derive(Args, Clone, Debug)]
pub struct RetryArgs {
    /// Command to run, followed by its arguments
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
pub struct RetryReport {
    pub command: String,
    pub succeeded: bool,
    pub attempts: u32,
    pub elapsed_ms: u64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn cmd_retry(args: RetryArgs, ctx: &CliContext) -> Result<ExitCode> {
    let spec = CommandSpec::from_argv(&args.command).context("No command given")?;
    let config = ctx.robustness();
    info!(
        command = %spec,
        timeout_ms = config.timeout.as_millis() as u64,
        "Retrying command until it succeeds"
    );

    let started_at = Utc::now();
    let start = Instant::now();
    let attempts = Cell::new(0u32);
    let (probe, counter) = (&spec, &attempts);

    let outcome = robustly_async(&config, move || {
        counter.set(counter.get() + 1);
        probe.run()
    })
    .await
    .map_err(|err| format!("{:#}", anyhow::Error::from(err)));

    let mut report = RetryReport {
        command: spec.to_string(),
        succeeded: outcome.is_ok(),
        attempts: attempts.get(),
        elapsed_ms: start.elapsed().as_millis() as u64,
        started_at,
        stdout: None,
        error: None,
    };
    match &outcome {
        Ok(output) => report.stdout = Some(output.stdout.clone()),
        Err(err) => {
            warn!(attempts = report.attempts, "Command kept failing: {}", err);
            report.error = Some(err.clone());
        }
    }

    if let Some(rendered) = ctx.output().render(&report)? {
        println!("{rendered}");
    } else {
        match &outcome {
            Ok(output) => print!("{}", output.stdout),
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(if report.succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILED)
    })
}
