use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::debug;
use std::io;
use std::process;

use crate::clap_models::Cli;
use crate::client::StepFunctionsClient;
use crate::config::ScannerConfig;
use crate::errors::throw_scan_error;
use crate::execution::scan_failed_executions;
use crate::models::cutoff::Cutoff;
use crate::models::execution::StopReason;
use crate::prompt::{ask, TokenReader};

pub async fn init_cli() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        throw_scan_error(&err);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Read config file and put command line values on top
    let config = ScannerConfig::load(cli.config.as_str())?.merge(
        cli.profile,
        cli.region,
        cli.output_dir,
        cli.page_size,
    );

    // Anything not passed as an argument is asked for interactively
    let stdin = io::stdin();
    let mut tokens = TokenReader::new(stdin.lock());
    let mut stdout = io::stdout();
    let state_machine_arn = match cli.state_machine_arn {
        Some(arn) => arn,
        None => ask(
            &mut tokens,
            &mut stdout,
            "Enter the state machine ARN to search:",
        )?,
    };
    let cutoff = match cli.cutoff {
        Some(cutoff) => cutoff,
        None => ask(&mut tokens, &mut stdout, "Enter date limit to search:")?,
    };
    let cutoff: Cutoff = cutoff.parse()?;
    drop(tokens);

    let mut client = StepFunctionsClient::connect(&config)
        .await
        .context("Error while connecting to AWS")?;

    println!(
        "🚀 Collecting failed executions of {} started after {}\n",
        state_machine_arn.bold(),
        cutoff
    );
    let summary = scan_failed_executions(&mut client, &config, &state_machine_arn, cutoff).await?;

    debug!("written files: {:?}", summary.files);
    let reason = match summary.stop_reason {
        StopReason::CutoffReached => "cutoff reached",
        StopReason::Exhausted => "no more executions",
    };
    println!(
        "\n{} {} records in {} files ({})",
        "✅ Done:".green().bold(),
        summary.records,
        summary.pages,
        reason
    );
    Ok(())
}
