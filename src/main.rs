// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Login Rate Probe
//!
//! Sends the built-in list of common passwords for one account to a login
//! endpoint, one at a time, and reports whether the endpoint ever pushed
//! back. Point it at a development server you run, for example the bundled
//! `mock-login` binary.
//!
//! ## Configuration
//!
//! Every flag can also be set through the environment:
//!
//! - `PROBE_TARGET`: account identifier (default: user@example.com)
//! - `PROBE_ENDPOINT`: login URL (default: http://localhost:3000/api/auth/login)
//! - `PROBE_TIMEOUT_MS`: per-request timeout (default: 5000)
//! - `PROBE_DELAY_MS`: pause between attempts (default: 100)

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use login_rate_probe::{candidates, ProbeConfig, Prober};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "login-rate-probe",
    version,
    about = "Check whether a login endpoint throttles repeated failed attempts"
)]
struct Args {
    /// Account identifier sent with every attempt
    #[arg(long, env = "PROBE_TARGET", default_value = "user@example.com")]
    target: String,

    /// Login endpoint URL
    #[arg(
        long,
        env = "PROBE_ENDPOINT",
        default_value = "http://localhost:3000/api/auth/login"
    )]
    endpoint: String,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "PROBE_TIMEOUT_MS", default_value_t = 5000)]
    timeout_ms: u64,

    /// Pause between attempts in milliseconds
    #[arg(long, env = "PROBE_DELAY_MS", default_value_t = 100)]
    delay_ms: u64,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

impl Args {
    fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            target: self.target.clone(),
            endpoint: self.endpoint.clone(),
            timeout_ms: self.timeout_ms,
            delay_ms: self.delay_ms,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let config = args.probe_config();
    info!(
        account = %config.target,
        endpoint = %config.endpoint,
        timeout_ms = config.timeout_ms,
        delay_ms = config.delay_ms,
        "Loaded probe configuration"
    );

    let prober = Prober::from_config(&config).context("invalid probe configuration")?;

    let mut stdout = std::io::stdout().lock();
    let report = prober
        .run(candidates::COMMON_PASSWORDS, &mut stdout)
        .await
        .context("probe run failed")?;
    drop(stdout);

    eprint!("{report}");

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "Report written");
    }

    Ok(())
}
